mod app;
mod config;
mod fixture;
mod http;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use fixture::FixtureError;
pub use http::{HttpError, TransportError};
pub use validation::ValidationError;
