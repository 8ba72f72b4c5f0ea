//! Configuration Loader
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.loadit/config.toml`
//! 2. Project-level: `<working_dir>/loadit.toml`
//! 3. 명시적으로 지정한 파일
//!
//! 각 레벨의 설정이 이전 레벨을 오버라이드합니다.

use super::types::LoaderConfig;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 사용자 설정 폴더 이름
pub const CONFIG_DIR_NAME: &str = ".loadit";

/// 프로젝트 설정 파일 이름
pub const PROJECT_CONFIG_FILE: &str = "loadit.toml";

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct ConfigLoader {
    /// 검색 경로
    search_paths: Vec<ConfigPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    /// 경로
    path: PathBuf,
    /// 우선순위 (높을수록 우선)
    priority: u8,
    /// 설명
    description: &'static str,
}

impl ConfigLoader {
    /// 새 로더 생성 (기본 검색 경로)
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        // 1. User-level (가장 낮은 우선순위)
        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(CONFIG_DIR_NAME).join("config.toml"),
                priority: 10,
                description: "User config",
            });
        }

        // 2. Project-level
        paths.push(ConfigPath {
            path: working_dir.join(PROJECT_CONFIG_FILE),
            priority: 20,
            description: "Project config",
        });

        Self { search_paths: paths }
    }

    /// 커스텀 검색 경로로 생성 (뒤쪽 경로가 우선)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConfigPath {
                path,
                priority: u8::try_from(i).unwrap_or(u8::MAX),
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// 검색 경로 추가
    pub fn add_path(&mut self, path: PathBuf, priority: u8) {
        self.search_paths.push(ConfigPath {
            path,
            priority,
            description: "Added",
        });
        self.search_paths.sort_by_key(|p| p.priority);
    }

    /// 모든 경로에서 설정 로드하여 병합
    ///
    /// 파싱에 실패한 파일은 경고 후 건너뜁니다.
    pub fn load_all(&self) -> LoaderConfig {
        let mut merged = LoaderConfig::new();

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                continue;
            }

            match load_config_from_file(&config_path.path) {
                Ok(config) => {
                    info!(
                        "Loaded {} from: {}",
                        config_path.description,
                        config_path.path.display()
                    );
                    merged = merge_configs(merged, config);
                }
                Err(e) => {
                    warn!(
                        "Failed to load config from {}: {}",
                        config_path.path.display(),
                        e
                    );
                }
            }
        }

        merged
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드
pub fn load_config_from_file(path: &Path) -> Result<LoaderConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: LoaderConfig = toml::from_str(&content)?;

    debug!(
        "Loaded config from {}: {} packages, {} search paths",
        path.display(),
        config.packages.len(),
        config.search_paths.len()
    );

    Ok(config)
}

/// 두 설정 병합 (later가 earlier를 오버라이드)
pub fn merge_configs(earlier: LoaderConfig, later: LoaderConfig) -> LoaderConfig {
    LoaderConfig {
        // 패키지: 병합
        packages: merge_unique(earlier.packages, later.packages),

        // 검색 경로: 병합
        search_paths: merge_unique(earlier.search_paths, later.search_paths),

        // 스칼라: later 우선
        raise_on_missing: later.raise_on_missing.or(earlier.raise_on_missing),
        file_pattern: later.file_pattern.or(earlier.file_pattern),
        dir_pattern: later.dir_pattern.or(earlier.dir_pattern),
        source_suffix: later.source_suffix.or(earlier.source_suffix),
        private_prefix: later.private_prefix.or(earlier.private_prefix),
        install_marker: later.install_marker.or(earlier.install_marker),

        excluded_packages: merge_unique(earlier.excluded_packages, later.excluded_packages),
    }
}

fn merge_unique<T: PartialEq>(mut earlier: Vec<T>, later: Vec<T>) -> Vec<T> {
    for item in later {
        if !earlier.contains(&item) {
            earlier.push(item);
        }
    }
    earlier
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_merge_later_overrides_scalars() {
        let earlier = LoaderConfig {
            raise_on_missing: Some(true),
            file_pattern: Some("^a".into()),
            packages: vec!["plugins".into()],
            ..Default::default()
        };
        let later = LoaderConfig {
            file_pattern: Some("^b".into()),
            packages: vec!["plugins".into(), "extras".into()],
            ..Default::default()
        };

        let merged = merge_configs(earlier, later);

        assert_eq!(merged.raise_on_missing, Some(true));
        assert_eq!(merged.file_pattern.as_deref(), Some("^b"));
        assert_eq!(merged.packages, vec!["plugins", "extras"]);
    }

    #[test]
    fn test_load_all_skips_broken_files() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.toml");
        let broken = temp.path().join("broken.toml");
        let absent = temp.path().join("absent.toml");

        std::fs::write(&good, "packages = [\"plugins\"]\nraise_on_missing = true\n").unwrap();
        std::fs::write(&broken, "packages = [").unwrap();

        let loader = ConfigLoader::with_paths(vec![good.clone(), broken, absent]);
        let config = loader.load_all();

        assert_eq!(config.packages, vec!["plugins"]);
        assert!(config.raise_on_missing());
        assert_eq!(loader.existing_files().len(), 2);
    }

    #[test]
    fn test_many_custom_paths_keep_their_order() {
        let temp = TempDir::new().unwrap();
        let mut paths: Vec<PathBuf> = (0..300)
            .map(|i| temp.path().join(format!("absent-{}.toml", i)))
            .collect();

        paths[50] = temp.path().join("early.toml");
        paths[299] = temp.path().join("late.toml");
        std::fs::write(&paths[50], "file_pattern = \"^early\"\n").unwrap();
        std::fs::write(&paths[299], "file_pattern = \"^late\"\n").unwrap();

        let mut loader = ConfigLoader::with_paths(paths);
        // 정렬을 일으키는 추가 경로
        loader.add_path(temp.path().join("absent-extra.toml"), 100);

        let config = loader.load_all();
        assert_eq!(config.file_pattern.as_deref(), Some("^late"));
    }

    #[test]
    fn test_project_config_is_picked_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "excluded_packages = [\"plugins.legacy\"]\n",
        )
        .unwrap();

        let config = ConfigLoader::new(temp.path()).load_all();
        assert!(config
            .excluded_packages
            .contains(&"plugins.legacy".to_string()));
    }
}
