//! Command implementations.

mod config;
mod request;
mod response;
mod serve;

pub use config::run_config;
pub use request::run_request;
pub use response::run_response;
pub use serve::run_serve;
