//! Manifest Runtime - 모듈 파일 기반 호스트 런타임
//!
//! dotted 경로를 검색 경로 아래의 모듈 파일로 해석합니다.
//!
//! - `a/b/c.toml` -> 모듈 `a.b.c`
//! - `a/b/c/` -> 패키지 `a.b.c` (`__init__.toml`이 있으면 그 네임스페이스 사용)
//!
//! 하위 모듈을 로드하기 전에 상위 패키지를 먼저 로드합니다.
//! 로드된 모듈은 런타임이 소유한 캐시에 보관되며, 실패한 로드는 캐시하지 않습니다.
//! import 스택은 런타임 전체에서 하나이므로 단일 스레드에서 사용하는 것을 전제로 합니다.

use super::manifest::{ModuleFile, SymbolDecl, PACKAGE_INIT_STEM};
use super::module_path::ModulePath;
use super::runtime::{HostRuntime, LoadError};
use super::symbol::{Module, ModuleHandle, Symbol, SymbolKind};
use loadit_foundation::DEFAULT_SOURCE_SUFFIX;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 경로 해석 결과
#[derive(Debug, Clone)]
enum Location {
    /// 단일 모듈 파일
    File(PathBuf),
    /// 패키지 디렉토리 (초기화 파일은 선택)
    Package { dir: PathBuf, init: Option<PathBuf> },
}

/// 모듈 파일 기반 런타임
pub struct ManifestRuntime {
    /// 최상위 모듈 검색 경로 (순서대로 검색)
    search_paths: Vec<PathBuf>,

    /// 모듈 파일 확장자
    suffix: String,

    /// 로드된 모듈 캐시
    modules: RwLock<HashMap<ModulePath, ModuleHandle>>,

    /// 모듈을 가리키는 심볼 (import 바인딩 동일성 유지용)
    module_symbols: RwLock<HashMap<ModulePath, Symbol>>,

    /// 초기화 중인 모듈 (순환 import 감지)
    loading: Mutex<Vec<ModulePath>>,
}

impl ManifestRuntime {
    /// 새 런타임 생성
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            modules: RwLock::new(HashMap::new()),
            module_symbols: RwLock::new(HashMap::new()),
            loading: Mutex::new(Vec::new()),
        }
    }

    /// 빌더 패턴: 모듈 파일 확장자 설정
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.trim_start_matches('.').to_string();
        self
    }

    /// 검색 경로 추가
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// 이미 로드된 모듈인지 확인
    pub fn is_loaded(&self, path: &ModulePath) -> bool {
        self.modules.read().contains_key(path)
    }

    /// 로드된 모듈 수
    pub fn loaded_count(&self) -> usize {
        self.modules.read().len()
    }

    /// 모듈 캐시 초기화
    ///
    /// 이전에 반환된 심볼과 새로 로드된 심볼은 서로 다른 동일성을 갖습니다.
    pub fn clear_cache(&self) {
        self.modules.write().clear();
        self.module_symbols.write().clear();
    }

    // ========================================================================
    // 경로 해석
    // ========================================================================

    /// `dirs` 중 처음으로 `name`을 가진 위치 (패키지 우선)
    fn locate(&self, dirs: &[PathBuf], name: &str) -> Option<Location> {
        for dir in dirs {
            let package_dir = dir.join(name);
            if package_dir.is_dir() {
                let init = package_dir.join(format!("{}.{}", PACKAGE_INIT_STEM, self.suffix));
                let init = init.is_file().then_some(init);
                return Some(Location::Package {
                    dir: package_dir,
                    init,
                });
            }

            let file = dir.join(format!("{}.{}", name, self.suffix));
            if file.is_file() {
                return Some(Location::File(file));
            }
        }
        None
    }

    // ========================================================================
    // 초기화
    // ========================================================================

    fn enter(&self, path: &ModulePath) -> Result<(), LoadError> {
        let mut loading = self.loading.lock();
        if loading.contains(path) {
            let chain: Vec<String> = loading.iter().map(|p| p.to_string()).collect();
            return Err(LoadError::init(
                path,
                format!("circular import ({} -> {})", chain.join(" -> "), path),
            ));
        }
        loading.push(path.clone());
        Ok(())
    }

    fn leave(&self, path: &ModulePath) {
        let mut loading = self.loading.lock();
        if let Some(pos) = loading.iter().rposition(|p| p == path) {
            loading.remove(pos);
        }
    }

    fn initialize(&self, path: &ModulePath, location: Location) -> Result<Module, LoadError> {
        let mut module = Module::new(path.clone());

        let origin = match location {
            Location::File(file) => Some(file),
            Location::Package { dir, init } => {
                module = module.with_package_dir(dir);
                init
            }
        };

        let file = match &origin {
            Some(origin) => read_module_file(path, origin)?,
            None => ModuleFile::default(),
        };
        if let Some(origin) = origin {
            module = module.with_origin(origin);
        }

        for required in &file.requires {
            let required = ModulePath::new(required);
            if required.is_empty() {
                return Err(LoadError::init(path, "empty module name in requires"));
            }
            self.load(&required)?;
        }

        for (local, target) in &file.imports {
            let symbol = self.resolve_import(path, target)?;
            module.bind(local.as_str(), symbol);
        }

        for decl in file.symbols {
            let symbol = self.build_symbol(&module, decl)?;
            module.bind(symbol.name().to_string(), symbol);
        }

        Ok(module)
    }

    /// import 대상 해석: 모듈 우선, 없으면 `module.Attr`
    fn resolve_import(&self, importer: &ModulePath, target: &str) -> Result<Symbol, LoadError> {
        let target = ModulePath::new(target);
        if target.is_empty() {
            return Err(LoadError::init(importer, "empty import target"));
        }

        let parent = match self.load(&target) {
            Ok(module) => return Ok(self.module_symbol(module.path())),
            Err(LoadError::ModuleNotFound { name: Some(name) }) if name == target.as_str() => {
                match target.parent() {
                    Some(parent) => parent,
                    None => return Err(LoadError::not_found(name)),
                }
            }
            Err(e) => return Err(e),
        };

        let module = self.load(&parent)?;
        module.get(target.tail()).cloned().ok_or_else(|| {
            LoadError::init(
                importer,
                format!("cannot import name '{}' from '{}'", target.tail(), parent),
            )
        })
    }

    fn build_symbol(&self, module: &Module, decl: SymbolDecl) -> Result<Symbol, LoadError> {
        let path = module.path().clone();
        let symbol = match decl {
            SymbolDecl::Class { name, bases } => {
                let mut resolved = Vec::with_capacity(bases.len());
                for base in &bases {
                    let symbol = match module.get(base) {
                        Some(local) => local.clone(),
                        None if base.contains('.') => self.resolve_import(&path, base)?,
                        None => {
                            return Err(LoadError::init(
                                &path,
                                format!("name '{}' is not defined", base),
                            ))
                        }
                    };
                    if !symbol.is_class() {
                        return Err(LoadError::init(
                            &path,
                            format!("base '{}' of class '{}' is not a class", base, name),
                        ));
                    }
                    resolved.push(symbol);
                }
                Symbol::class(path, name, resolved)
            }
            SymbolDecl::Function { name } => Symbol::new(path, name, SymbolKind::Function),
            SymbolDecl::Value { name, value } => Symbol::new(path, name, SymbolKind::Value(value)),
        };
        Ok(symbol)
    }

    fn module_symbol(&self, path: &ModulePath) -> Symbol {
        if let Some(symbol) = self.module_symbols.read().get(path) {
            return symbol.clone();
        }

        let mut symbols = self.module_symbols.write();
        symbols
            .entry(path.clone())
            .or_insert_with(|| {
                Symbol::new(
                    path.clone(),
                    path.tail().to_string(),
                    SymbolKind::Module(path.clone()),
                )
            })
            .clone()
    }
}

impl HostRuntime for ManifestRuntime {
    fn load(&self, path: &ModulePath) -> Result<ModuleHandle, LoadError> {
        if path.is_empty() {
            return Err(LoadError::ModuleNotFound { name: None });
        }

        if let Some(module) = self.modules.read().get(path) {
            return Ok(Arc::clone(module));
        }

        let dirs = match path.parent() {
            Some(parent) => {
                let package = self.load(&parent)?;
                match package.package_dir() {
                    Some(dir) => vec![dir.to_path_buf()],
                    None => return Err(LoadError::not_found(path.as_str())),
                }
            }
            None => self.search_paths.clone(),
        };

        let location = self
            .locate(&dirs, path.tail())
            .ok_or_else(|| LoadError::not_found(path.as_str()))?;

        self.enter(path)?;
        let result = self.initialize(path, location);
        self.leave(path);

        let module = Arc::new(result?);
        debug!(
            "Loaded module {} ({} members)",
            path,
            module.len()
        );

        let mut modules = self.modules.write();
        Ok(Arc::clone(modules.entry(path.clone()).or_insert(module)))
    }
}

fn read_module_file(path: &ModulePath, origin: &Path) -> Result<ModuleFile, LoadError> {
    let content = std::fs::read_to_string(origin)
        .map_err(|e| LoadError::init(path, format!("{}: {}", origin.display(), e)))?;

    ModuleFile::parse(&content)
        .map_err(|e| LoadError::init(path, format!("invalid module file {}: {}", origin.display(), e)))
}
