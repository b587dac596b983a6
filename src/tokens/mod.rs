pub mod service;
pub mod validators;

pub use service::{TokenKeyEntry, TokenService};
pub use validators::Validator;
