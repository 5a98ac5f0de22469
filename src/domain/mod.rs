pub mod chunk;
pub mod error;
pub mod progress;
pub mod session;
pub mod validator;
