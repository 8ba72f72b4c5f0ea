//! # loadit-foundation
//!
//! Foundation layer for loadit:
//! - Error: 중앙 에러 타입 (`Error`, `Result`)
//! - Config: 로더 설정 (`LoaderConfig`, `ConfigLoader`)

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    load_config_from_file, merge_configs, ConfigLoader, LoaderConfig, CONFIG_DIR_NAME,
    DEFAULT_INSTALL_MARKER, DEFAULT_PRIVATE_PREFIX, DEFAULT_SOURCE_SUFFIX, PROJECT_CONFIG_FILE,
};
