//! Config - 로더 설정 관리
//!
//! - `types.rs` - LoaderConfig (TOML)
//! - `loader.rs` - user / project / 명시적 파일 병합

mod loader;
mod types;

pub use loader::{load_config_from_file, merge_configs, ConfigLoader, CONFIG_DIR_NAME, PROJECT_CONFIG_FILE};
pub use types::{
    LoaderConfig, DEFAULT_INSTALL_MARKER, DEFAULT_PRIVATE_PREFIX, DEFAULT_SOURCE_SUFFIX,
};
