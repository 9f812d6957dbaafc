pub mod config;
pub mod errors;
pub mod handler;
pub mod telemetry;

pub use config::GreeterConfig;
pub use errors::{GreeterError, Result};
pub use handler::{GreetingPayload, InvocationRequest, Response, handle};
