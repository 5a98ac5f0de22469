pub mod login;
pub mod logout;
pub mod result;
pub mod status;
pub mod upload;

pub use result::CommandResult;
