//! PluginsLoader - 발견, 로드, 필터, 병합 파이프라인
//!
//! ```ignore
//! use loadit_core::{ManifestRuntime, PackageRoot, PluginsLoader};
//!
//! let runtime = Arc::new(ManifestRuntime::new(vec![PathBuf::from(".")]));
//! let plugins = PluginsLoader::new(runtime)
//!     .with_package(PackageRoot::named("plugins"))
//!     .load_subclasses_of("plugins.base.Plugin")?;
//! ```

use super::aggregate::PluginSet;
use super::discovery::{PackageRoot, PathDiscovery};
use super::filter::{matching_members, subclass_predicate, PluginPredicate};
use super::missing::MissingModules;
use super::module_path::ModulePath;
use super::policy::InclusionPolicy;
use super::runtime::{HostRuntime, LoadError};
use super::symbol::Symbol;
use loadit_foundation::{Error, LoaderConfig, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// LoadReport
// ============================================================================

/// 정책 적용 전 스윕 결과
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// 처음 발견된 순서의 플러그인
    pub plugins: Vec<Symbol>,

    /// 누락된 의존성
    pub missing: MissingModules,

    /// 로드에 성공한 모듈 수
    pub modules_loaded: usize,
}

// ============================================================================
// PluginsLoader
// ============================================================================

/// 플러그인 로더
pub struct PluginsLoader {
    runtime: Arc<dyn HostRuntime>,
    packages: Vec<PackageRoot>,
    policy: InclusionPolicy,
    excluded_packages: Vec<ModulePath>,
    raise_on_missing: bool,
    predicate: Option<PluginPredicate>,
    working_dir: PathBuf,
}

impl PluginsLoader {
    /// 새 로더 생성 (작업 디렉토리는 현재 디렉토리)
    pub fn new(runtime: Arc<dyn HostRuntime>) -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            runtime,
            packages: Vec::new(),
            policy: InclusionPolicy::new(),
            excluded_packages: Vec::new(),
            raise_on_missing: false,
            predicate: None,
            working_dir,
        }
    }

    /// 설정에서 로더 생성
    pub fn from_config(runtime: Arc<dyn HostRuntime>, config: &LoaderConfig) -> Result<Self> {
        Self::from_config_in(runtime, config, std::env::current_dir()?)
    }

    /// 설정과 작업 디렉토리로 로더 생성
    pub fn from_config_in(
        runtime: Arc<dyn HostRuntime>,
        config: &LoaderConfig,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let working_dir = working_dir.into();
        let packages = config
            .packages
            .iter()
            .map(|package| PackageRoot::parse(package, &working_dir));

        let mut loader = Self::new(runtime)
            .with_working_dir(working_dir.clone())
            .with_policy(InclusionPolicy::from_config(config)?)
            .with_packages(packages)
            .with_raise_on_missing(config.raise_on_missing());

        for package in &config.excluded_packages {
            loader = loader.exclude_package(package.as_str());
        }

        Ok(loader)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_package(mut self, package: PackageRoot) -> Self {
        self.packages.push(package);
        self
    }

    pub fn with_packages(mut self, packages: impl IntoIterator<Item = PackageRoot>) -> Self {
        self.packages.extend(packages);
        self
    }

    pub fn with_policy(mut self, policy: InclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_raise_on_missing(mut self, raise: bool) -> Self {
        self.raise_on_missing = raise;
        self
    }

    pub fn with_predicate(mut self, predicate: PluginPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// 패키지와 그 하위 모듈을 결과에서 제외
    pub fn exclude_package(mut self, package: impl Into<ModulePath>) -> Self {
        let package = package.into();
        if !package.is_empty() {
            self.excluded_packages.push(package);
        }
        self
    }

    pub fn packages(&self) -> &[PackageRoot] {
        &self.packages
    }

    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    pub fn raise_on_missing(&self) -> bool {
        self.raise_on_missing
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// 모든 패키지에서 모듈 경로 발견
    pub fn discover_paths(&self) -> Result<BTreeSet<ModulePath>> {
        if self.packages.is_empty() {
            return Err(Error::Config("no packages to search".to_string()));
        }

        let discovery = PathDiscovery::new(self.policy.clone(), self.working_dir.clone());
        let mut paths = BTreeSet::new();

        for package in &self.packages {
            let dir = discovery.resolve_root(package, self.runtime.as_ref())?;
            let found = discovery.discover(&dir);
            debug!("Package {} yielded {} module paths", package, found.len());
            paths.extend(found);
        }

        paths.retain(|path| !self.is_excluded(path));
        Ok(paths)
    }

    /// 설정된 판정 함수로 플러그인 로드
    pub fn load(&self) -> Result<Vec<Symbol>> {
        let predicate = self.predicate.clone().ok_or_else(|| {
            Error::Config("no plugin predicate configured".to_string())
        })?;
        self.load_with(&predicate)
    }

    /// `ancestor`의 엄격한 하위 클래스 로드
    pub fn load_subclasses(&self, ancestor: &Symbol) -> Result<Vec<Symbol>> {
        if !ancestor.is_class() {
            return Err(Error::Config(format!(
                "{} is not a class",
                ancestor.qualified_name()
            )));
        }
        self.load_with(&subclass_predicate(ancestor.clone()))
    }

    /// `module.Attr`로 지정한 클래스의 하위 클래스 로드
    pub fn load_subclasses_of(&self, qualified: &str) -> Result<Vec<Symbol>> {
        let ancestor = self.runtime.resolve_symbol(qualified).map_err(|e| match e {
            LoadError::ModuleNotFound { .. } => {
                Error::Config(format!("cannot resolve {}: {}", qualified, e))
            }
            LoadError::Init { module, message } => Error::ModuleInit { module, message },
        })?;
        self.load_subclasses(&ancestor)
    }

    /// 누락 모듈 정책을 적용하지 않은 스윕 결과
    pub fn load_report(&self, predicate: &PluginPredicate) -> Result<LoadReport> {
        let paths = self.discover_paths()?;
        let mut plugins = PluginSet::new();
        let mut missing = MissingModules::new();
        let mut modules_loaded = 0;

        for path in &paths {
            match self.runtime.load(path) {
                Ok(module) => {
                    modules_loaded += 1;
                    let added = plugins.extend(matching_members(&module, predicate.as_ref()));
                    debug!("Module {} contributed {} plugins", path, added);
                }
                Err(LoadError::ModuleNotFound { name: Some(name) }) => {
                    debug!("Skipping {}: missing module {}", path, name);
                    missing.record(name);
                }
                Err(LoadError::ModuleNotFound { name: None }) => {
                    return Err(Error::InternalInconsistency {
                        module: path.to_string(),
                        message: "module lookup failed without naming the missing module"
                            .to_string(),
                    });
                }
                Err(LoadError::Init { module, message }) => {
                    return Err(Error::ModuleInit { module, message });
                }
            }
        }

        info!(
            "Scanned {} modules: {} plugins, {} missing modules",
            paths.len(),
            plugins.len(),
            missing.len()
        );

        Ok(LoadReport {
            plugins: plugins.into_vec(),
            missing,
            modules_loaded,
        })
    }

    fn load_with(&self, predicate: &PluginPredicate) -> Result<Vec<Symbol>> {
        let report = self.load_report(predicate)?;
        report.missing.apply(report.plugins, self.raise_on_missing)
    }

    fn is_excluded(&self, path: &ModulePath) -> bool {
        self.excluded_packages
            .iter()
            .any(|package| path.starts_with(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::filter::class_predicate;
    use crate::plugin::symbol::{Module, ModuleHandle};
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// 파일 대신 미리 만든 모듈을 돌려주는 런타임
    #[derive(Default)]
    struct FixedRuntime {
        modules: HashMap<ModulePath, ModuleHandle>,
        failures: HashMap<ModulePath, LoadError>,
    }

    impl FixedRuntime {
        fn with_module(mut self, module: Module) -> Self {
            self.modules.insert(module.path().clone(), Arc::new(module));
            self
        }

        fn with_failure(mut self, path: &str, error: LoadError) -> Self {
            self.failures.insert(ModulePath::new(path), error);
            self
        }
    }

    impl HostRuntime for FixedRuntime {
        fn load(&self, path: &ModulePath) -> std::result::Result<ModuleHandle, LoadError> {
            if let Some(error) = self.failures.get(path) {
                return Err(error.clone());
            }
            self.modules
                .get(path)
                .cloned()
                .ok_or_else(|| LoadError::not_found(path.as_str()))
        }
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_no_packages_is_config_error() {
        let loader = PluginsLoader::new(Arc::new(FixedRuntime::default()));
        let err = loader.discover_paths().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_load_without_predicate_is_config_error() {
        let temp = TempDir::new().unwrap();
        let loader = PluginsLoader::new(Arc::new(FixedRuntime::default()))
            .with_working_dir(temp.path())
            .with_package(PackageRoot::dir(temp.path()));
        assert!(matches!(loader.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_excluded_packages_are_dropped() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "plugins/a.toml");
        touch(temp.path(), "plugins/legacy/old.toml");
        touch(temp.path(), "plugins/legacy_tools.toml");

        let loader = PluginsLoader::new(Arc::new(FixedRuntime::default()))
            .with_working_dir(temp.path())
            .with_package(PackageRoot::dir("plugins"))
            .exclude_package("plugins.legacy");

        let paths: Vec<String> = loader
            .discover_paths()
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(paths, vec!["plugins.a", "plugins.legacy_tools"]);
    }

    #[test]
    fn test_unnamed_missing_module_is_fatal() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "plugins/broken.toml");

        let runtime = FixedRuntime::default()
            .with_failure("plugins.broken", LoadError::ModuleNotFound { name: None });
        let loader = PluginsLoader::new(Arc::new(runtime))
            .with_working_dir(temp.path())
            .with_package(PackageRoot::dir("plugins"));

        let err = loader.load_report(&class_predicate()).unwrap_err();
        assert!(matches!(err, Error::InternalInconsistency { module, .. } if module == "plugins.broken"));
    }

    #[test]
    fn test_init_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "plugins/bad.toml");

        let runtime = FixedRuntime::default()
            .with_failure("plugins.bad", LoadError::init("plugins.bad", "boom"));
        let loader = PluginsLoader::new(Arc::new(runtime))
            .with_working_dir(temp.path())
            .with_package(PackageRoot::dir("plugins"))
            .with_predicate(class_predicate());

        assert!(matches!(loader.load(), Err(Error::ModuleInit { .. })));
    }

    #[test]
    fn test_report_collects_missing_without_policy() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "plugins/a.toml");
        touch(temp.path(), "plugins/b.toml");
        touch(temp.path(), "plugins/c.toml");

        let path = ModulePath::new("plugins.a");
        let runtime = FixedRuntime::default()
            .with_module(Module::new(path.clone()).with_member("A", Symbol::class(path, "A", vec![])))
            .with_failure("plugins.b", LoadError::not_found("foo"))
            .with_failure("plugins.c", LoadError::not_found("foo"));
        let loader = PluginsLoader::new(Arc::new(runtime))
            .with_working_dir(temp.path())
            .with_package(PackageRoot::dir("plugins"))
            .with_raise_on_missing(true);

        let report = loader.load_report(&class_predicate()).unwrap();
        assert_eq!(report.plugins.len(), 1);
        assert_eq!(report.modules_loaded, 1);
        assert_eq!(report.missing.names(), &["foo".to_string()]);
    }

    #[test]
    fn test_non_class_ancestor_is_rejected() {
        let loader = PluginsLoader::new(Arc::new(FixedRuntime::default()));
        let function = Symbol::new(ModulePath::new("m"), "f", crate::plugin::symbol::SymbolKind::Function);
        assert!(loader.load_subclasses(&function).unwrap_err().is_configuration());
    }

    #[test]
    fn test_from_config() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("local")).unwrap();

        let config = LoaderConfig {
            packages: vec!["local".to_string(), "plugins.net".to_string()],
            raise_on_missing: Some(true),
            excluded_packages: vec!["local.old".to_string()],
            ..Default::default()
        };
        let loader =
            PluginsLoader::from_config_in(Arc::new(FixedRuntime::default()), &config, temp.path())
                .unwrap();

        assert!(loader.raise_on_missing());
        assert_eq!(
            loader.packages(),
            &[PackageRoot::dir("local"), PackageRoot::named("plugins.net")]
        );
    }

    #[test]
    fn test_from_config_rejects_bad_pattern() {
        let config = LoaderConfig {
            file_pattern: Some("(".to_string()),
            ..Default::default()
        };
        let result = PluginsLoader::from_config_in(Arc::new(FixedRuntime::default()), &config, ".");
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }
}
