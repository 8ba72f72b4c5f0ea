//! LoaderConfig - 플러그인 로더 설정

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 모듈 파일 확장자 기본값
pub const DEFAULT_SOURCE_SUFFIX: &str = "toml";

/// private 표시 접두사 기본값
pub const DEFAULT_PRIVATE_PREFIX: &str = "__";

/// 서드파티 설치 디렉토리 표시 기본값
pub const DEFAULT_INSTALL_MARKER: &str = "site-packages";

/// 로더 설정 (`loadit.toml`)
///
/// 스칼라 값은 `Option`으로 두어 상위 레벨 설정이 지정한 값만 덮어씁니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 탐색할 패키지 (dotted 이름 또는 디렉토리 경로)
    pub packages: Vec<String>,

    /// 런타임 모듈 검색 경로
    pub search_paths: Vec<PathBuf>,

    /// 누락 모듈이 있으면 전체 작업 실패
    pub raise_on_missing: Option<bool>,

    /// 파일 이름 포함 패턴 (정규식)
    pub file_pattern: Option<String>,

    /// 디렉토리 이름 포함 패턴 (정규식)
    pub dir_pattern: Option<String>,

    /// 모듈 파일 확장자
    pub source_suffix: Option<String>,

    /// private 표시 접두사
    pub private_prefix: Option<String>,

    /// 설치 디렉토리 표시 세그먼트
    pub install_marker: Option<String>,

    /// 결과에서 제외할 패키지
    pub excluded_packages: Vec<String>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise_on_missing(&self) -> bool {
        self.raise_on_missing.unwrap_or(false)
    }

    pub fn source_suffix(&self) -> &str {
        self.source_suffix.as_deref().unwrap_or(DEFAULT_SOURCE_SUFFIX)
    }

    pub fn private_prefix(&self) -> &str {
        self.private_prefix.as_deref().unwrap_or(DEFAULT_PRIVATE_PREFIX)
    }

    pub fn install_marker(&self) -> &str {
        self.install_marker.as_deref().unwrap_or(DEFAULT_INSTALL_MARKER)
    }
}
