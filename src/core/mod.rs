pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, EngineConfig};
pub use error::{EngineError, Result};
pub use types::{EntityRef, EntityUpdater, RecordingUpdater, StatPath, StatUpdate, UpdateError};
