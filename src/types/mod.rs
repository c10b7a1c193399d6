pub mod coerce;
pub mod requests;
pub mod responses;
