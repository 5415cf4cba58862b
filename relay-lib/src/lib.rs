pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod send;
pub mod structs;

pub use config::RelayConfig;
pub use error::RelayError;
pub use handler::RelayHandler;
pub use structs::relay::{Channel, RelayRequest, RelayResponse};
