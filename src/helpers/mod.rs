pub mod env;
pub mod time;
