//! Refill app: drives the form state machine against the extraction engine
//! and the durable stores. Rendering is left to whichever shell embeds it.
mod platform;

pub use platform::app::FormSession;
pub use platform::config::{AppConfig, ConfigError, CONFIG_FILENAME, ENV_API_URL};
pub use platform::logging::{initialize as initialize_logging, LogDestination};
