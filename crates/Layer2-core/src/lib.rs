//! loadit-core: Plugin discovery and loading
//!
//! Layer2 - 플러그인 발견/로드 파이프라인 레이어
//!
//! # 주요 모듈
//!
//! - `plugin`: 경로 발견, 동적 로드, 멤버 필터, 병합, 누락 모듈 정책
//!
//! # 사용 예시
//!
//! ```ignore
//! use loadit_core::{ManifestRuntime, PackageRoot, PluginsLoader};
//!
//! // 모듈 파일 런타임 (검색 경로: 현재 디렉토리)
//! let runtime = Arc::new(ManifestRuntime::new(vec![PathBuf::from(".")]));
//!
//! // plugins 패키지에서 Plugin 하위 클래스 로드
//! let plugins = PluginsLoader::new(runtime)
//!     .with_package(PackageRoot::named("plugins"))
//!     .with_raise_on_missing(true)
//!     .load_subclasses_of("plugins.base.Plugin")?;
//! ```

pub mod plugin;

// Re-exports: Plugin
pub use plugin::{
    // Predicates
    class_predicate,
    is_strict_subclass,
    matching_members,
    subclass_predicate,
    // Runtime
    HostRuntime,
    // Policy
    InclusionPolicy,
    LoadError,
    // Loader
    LoadReport,
    ManifestRuntime,
    MissingModules,
    // Symbols
    Module,
    ModuleHandle,
    // Identifiers
    ModulePath,
    // Discovery
    PackageRoot,
    PathDiscovery,
    PluginPredicate,
    PluginSet,
    PluginsLoader,
    Symbol,
    SymbolKind,
};

// Re-exports: Foundation
pub use loadit_foundation::{Error, LoaderConfig, Result};
