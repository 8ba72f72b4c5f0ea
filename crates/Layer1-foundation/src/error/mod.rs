//! Error types for loadit
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// loadit 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not a package: {0}")]
    NotAPackage(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // ========================================================================
    // 로드 관련
    // ========================================================================
    /// 누락 모듈 이름 없이 실패한 로드 - 런타임 내부 불일치
    #[error("Internal inconsistency while loading {module}: {message}")]
    InternalInconsistency { module: String, message: String },

    /// 모듈 초기화 실패 (import 외 에러)
    #[error("Failed to initialize module {module}: {message}")]
    ModuleInit { module: String, message: String },

    /// strict 모드에서 스윕 종료 후 누락 모듈 집계
    #[error("Failed searching plugins, missing modules: {}", .0.join(", "))]
    MissingModules(Vec<String>),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// 설정 문제로 인한 에러인지 확인 (재시도 무의미)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::NotAPackage(_) | Error::InvalidPattern { .. }
        )
    }

    /// 잘못된 정규식 에러 생성 헬퍼
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// 모듈 초기화 에러 생성 헬퍼
    pub fn module_init(module: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ModuleInit {
            module: module.into(),
            message: message.into(),
        }
    }

    /// 누락된 모듈 이름 목록 (MissingModules인 경우)
    pub fn missing_modules(&self) -> Option<&[String]> {
        match self {
            Error::MissingModules(names) => Some(names),
            _ => None,
        }
    }
}
