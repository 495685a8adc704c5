// Adapters - External system implementations

pub mod exec_mediainfo;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_mediainfo::MediaInfoRunner;
pub use toml_config::{FileConfig, TomlConfigAdapter};
pub use tracing_log::{init_logging, LogFormat};
