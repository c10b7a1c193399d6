pub mod cors;
pub mod json_body;

pub use cors::{cors_layer, method_not_allowed};
pub use json_body::ApiJson;
