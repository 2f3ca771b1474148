mod commands;
mod config;
mod error;
mod logging;

pub use commands::Commands;
pub use config::*;
pub use error::Error;
pub use error::ErrorMode;
pub use logging::*;
