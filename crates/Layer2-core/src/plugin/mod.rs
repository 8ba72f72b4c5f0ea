//! # Plugin Discovery
//!
//! 패키지 디렉토리에서 플러그인을 찾아 로드하는 파이프라인
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PluginsLoader                           │
//! │                                                             │
//! │  PackageRoot ──▶ PathDiscovery ──▶ BTreeSet<ModulePath>     │
//! │                   (InclusionPolicy)          │              │
//! │                                              ▼              │
//! │                                  HostRuntime::load          │
//! │                                   │               │         │
//! │                              ModuleHandle    LoadError      │
//! │                                   │               │         │
//! │                         matching_members   MissingModules   │
//! │                                   │               │         │
//! │                               PluginSet ──▶ apply(policy)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 모듈 식별자
//!
//! 모듈 파일 경로는 작업 디렉토리 기준 상대 경로를 점으로 이은 이름이 됩니다.
//! `plugins/net/http.toml` → `plugins.net.http`
//!
//! 다음 두 경우 서로 다른 파일이 같은 이름을 가질 수 있습니다:
//! - 작업 디렉토리 밖의 경로 (앞쪽 `..` 세그먼트는 제거됨)
//! - `a/b.toml`과 `a.b.toml`처럼 점이 들어간 파일 이름
//!
//! ## 예시
//!
//! ```ignore
//! let runtime = Arc::new(ManifestRuntime::new(vec![PathBuf::from(".")]));
//! let loader = PluginsLoader::new(runtime)
//!     .with_package(PackageRoot::named("plugins"))
//!     .with_raise_on_missing(false);
//!
//! for plugin in loader.load_subclasses_of("plugins.base.Plugin")? {
//!     println!("{}", plugin.qualified_name());
//! }
//! ```

mod aggregate;
mod discovery;
mod filter;
mod loader;
mod manifest;
mod missing;
mod module_path;
mod policy;
mod registry;
mod runtime;
mod symbol;

// Identifiers
pub use module_path::{normalize, relative_to, ModulePath};

// Symbols
pub use symbol::{Module, ModuleHandle, Symbol, SymbolDef, SymbolKind};

// Runtime
pub use manifest::{ModuleFile, SymbolDecl, PACKAGE_INIT_STEM};
pub use registry::ManifestRuntime;
pub use runtime::{HostRuntime, LoadError};

// Pipeline
pub use aggregate::PluginSet;
pub use discovery::{PackageRoot, PathDiscovery};
pub use filter::{class_predicate, is_strict_subclass, matching_members, subclass_predicate, PluginPredicate};
pub use loader::{LoadReport, PluginsLoader};
pub use missing::MissingModules;
pub use policy::InclusionPolicy;
