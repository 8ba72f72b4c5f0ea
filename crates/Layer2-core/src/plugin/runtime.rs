//! Host Runtime - 모듈 로딩 인터페이스
//!
//! 파이프라인은 런타임을 불투명한 협력자로 다룹니다.
//! 런타임은 자체 모듈 캐시를 소유하며, 파이프라인은 캐시를 초기화하지 않습니다.

use super::module_path::ModulePath;
use super::symbol::{ModuleHandle, Symbol};
use thiserror::Error;

/// 런타임 로드 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// 모듈 또는 그 의존성을 찾지 못함
    ///
    /// `name`이 없으면 어떤 모듈이 누락됐는지 알 수 없는 내부 불일치입니다.
    #[error("No module named {}", .name.as_deref().unwrap_or("<unknown>"))]
    ModuleNotFound { name: Option<String> },

    /// 모듈 초기화 실패 (파싱, 속성 누락, 순환 import 등)
    #[error("Failed to initialize {module}: {message}")]
    Init { module: String, message: String },
}

impl LoadError {
    /// 누락 모듈 에러 생성 헬퍼
    pub fn not_found(name: impl Into<String>) -> Self {
        LoadError::ModuleNotFound {
            name: Some(name.into()),
        }
    }

    /// 초기화 에러 생성 헬퍼
    pub fn init(module: impl ToString, message: impl Into<String>) -> Self {
        LoadError::Init {
            module: module.to_string(),
            message: message.into(),
        }
    }
}

/// 모듈 로딩 기능을 제공하는 호스트 런타임
pub trait HostRuntime: Send + Sync {
    /// 모듈 로드 (이미 로드된 모듈은 캐시에서 반환)
    fn load(&self, path: &ModulePath) -> Result<ModuleHandle, LoadError>;

    /// `module.Attr` 형태의 정규 이름으로 심볼 조회
    fn resolve_symbol(&self, qualified: &str) -> Result<Symbol, LoadError> {
        let qualified = ModulePath::new(qualified);
        let module_path = qualified.parent().ok_or_else(|| {
            LoadError::init(&qualified, "expected a qualified name of the form module.Attr")
        })?;

        let module = self.load(&module_path)?;
        module.get(qualified.tail()).cloned().ok_or_else(|| {
            LoadError::init(
                &module_path,
                format!("cannot import name '{}'", qualified.tail()),
            )
        })
    }
}
