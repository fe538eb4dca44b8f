pub mod crypto;
pub mod time;
pub mod token;
pub mod validation;
