pub mod forms;
pub mod meta;
