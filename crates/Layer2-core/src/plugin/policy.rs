//! Inclusion Policy - 탐색 대상 파일/디렉토리 판정
//!
//! 모든 판정은 부수효과 없는 순수 함수입니다.

use loadit_foundation::{
    Error, LoaderConfig, Result, DEFAULT_INSTALL_MARKER, DEFAULT_PRIVATE_PREFIX,
    DEFAULT_SOURCE_SUFFIX,
};
use regex::Regex;
use std::path::Path;

/// 모든 이름과 매칭되는 기본 패턴
const MATCH_ALL: &str = "";

/// 파일/디렉토리 포함 정책
#[derive(Debug, Clone)]
pub struct InclusionPolicy {
    /// 파일 이름 포함 패턴
    file_pattern: Regex,

    /// 디렉토리 이름 포함 패턴
    dir_pattern: Regex,

    /// 모듈 파일 확장자 (점 제외)
    source_suffix: String,

    /// private 표시 접두사
    private_prefix: String,

    /// 서드파티 설치 디렉토리 표시
    install_marker: String,
}

impl InclusionPolicy {
    /// 기본 정책 (모든 이름 허용)
    pub fn new() -> Self {
        Self {
            file_pattern: match_all(),
            dir_pattern: match_all(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            private_prefix: DEFAULT_PRIVATE_PREFIX.to_string(),
            install_marker: DEFAULT_INSTALL_MARKER.to_string(),
        }
    }

    /// 설정에서 정책 생성
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        let mut policy = Self::new()
            .with_source_suffix(config.source_suffix())
            .with_private_prefix(config.private_prefix())
            .with_install_marker(config.install_marker());

        if let Some(pattern) = &config.file_pattern {
            policy = policy.with_file_pattern(pattern)?;
        }
        if let Some(pattern) = &config.dir_pattern {
            policy = policy.with_dir_pattern(pattern)?;
        }

        Ok(policy)
    }

    /// 빌더 패턴: 파일 이름 패턴 설정
    pub fn with_file_pattern(mut self, pattern: &str) -> Result<Self> {
        self.file_pattern = compile(pattern)?;
        Ok(self)
    }

    /// 빌더 패턴: 디렉토리 이름 패턴 설정
    pub fn with_dir_pattern(mut self, pattern: &str) -> Result<Self> {
        self.dir_pattern = compile(pattern)?;
        Ok(self)
    }

    /// 빌더 패턴: 모듈 파일 확장자 설정 (`.toml` / `toml` 모두 허용)
    pub fn with_source_suffix(mut self, suffix: &str) -> Self {
        self.source_suffix = suffix.trim_start_matches('.').to_string();
        self
    }

    pub fn with_private_prefix(mut self, prefix: &str) -> Self {
        self.private_prefix = prefix.to_string();
        self
    }

    pub fn with_install_marker(mut self, marker: &str) -> Self {
        self.install_marker = marker.to_string();
        self
    }

    // ========================================================================
    // 판정
    // ========================================================================

    /// 파일 포함 여부: 확장자 일치, private 아님, 패턴 매칭
    pub fn file_allowed(&self, name: &str) -> bool {
        let has_suffix = Path::new(name)
            .extension()
            .map_or(false, |ext| ext == self.source_suffix.as_str());

        has_suffix && !self.is_private(name) && self.file_pattern.is_match(name)
    }

    /// 디렉토리 포함 여부: private 아님, 패턴 매칭
    pub fn dir_allowed(&self, name: &str) -> bool {
        !self.is_private(name) && self.dir_pattern.is_match(name)
    }

    /// 이름이 private 접두사나 `.`으로 끝나는 디렉토리 (`__cache__`, `.`, `..`)
    pub fn dir_excluded_by_suffix(&self, name: &str) -> bool {
        (!self.private_prefix.is_empty() && name.ends_with(self.private_prefix.as_str()))
            || name.ends_with('.')
    }

    fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(self.private_prefix.as_str())
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    pub fn private_prefix(&self) -> &str {
        &self.private_prefix
    }

    pub fn install_marker(&self) -> &str {
        &self.install_marker
    }
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn match_all() -> Regex {
    Regex::new(MATCH_ALL).expect("empty pattern is a valid regex")
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e))
}
