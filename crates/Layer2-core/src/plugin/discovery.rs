//! Path Discovery - 패키지 디렉토리에서 모듈 경로 발견
//!
//! 디렉토리 트리를 명시적인 작업 큐로 순회합니다.
//! 제외된 디렉토리는 하위 트리 전체가 건너뛰어집니다.

use super::module_path::{normalize, relative_to, ModulePath};
use super::policy::InclusionPolicy;
use super::runtime::{HostRuntime, LoadError};
use loadit_foundation::{Error, Result};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// PackageRoot - 탐색 시작점
// ============================================================================

/// 탐색할 패키지
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageRoot {
    /// 런타임이 디렉토리로 해석하는 패키지 이름
    Named(ModulePath),

    /// 패키지 디렉토리
    Dir(PathBuf),
}

impl PackageRoot {
    pub fn named(name: impl Into<ModulePath>) -> Self {
        PackageRoot::Named(name.into())
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        PackageRoot::Dir(path.into())
    }

    /// 문자열 해석: 경로 구분자가 있거나 존재하는 디렉토리면 `Dir`, 아니면 `Named`
    pub fn parse(value: &str, working_dir: &Path) -> Self {
        let looks_like_path = value.contains('/') || value.contains(std::path::MAIN_SEPARATOR);
        if looks_like_path || working_dir.join(value).is_dir() {
            PackageRoot::Dir(PathBuf::from(value))
        } else {
            PackageRoot::Named(ModulePath::new(value))
        }
    }
}

impl fmt::Display for PackageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageRoot::Named(name) => write!(f, "{}", name),
            PackageRoot::Dir(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// PathDiscovery - 모듈 경로 발견
// ============================================================================

/// 모듈 경로 발견기
pub struct PathDiscovery {
    /// 포함 정책
    policy: InclusionPolicy,

    /// 모듈 경로 계산 기준 디렉토리
    working_dir: PathBuf,
}

impl PathDiscovery {
    pub fn new(policy: InclusionPolicy, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            working_dir: working_dir.into(),
        }
    }

    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// 패키지를 디렉토리로 해석
    pub fn resolve_root(&self, root: &PackageRoot, runtime: &dyn HostRuntime) -> Result<PathBuf> {
        let dir = match root {
            PackageRoot::Dir(path) => self.absolute(path),
            PackageRoot::Named(name) => {
                let module = runtime.load(name).map_err(|e| match e {
                    LoadError::ModuleNotFound { .. } => {
                        Error::NotAPackage(format!("{}: {}", name, e))
                    }
                    LoadError::Init { module, message } => Error::ModuleInit { module, message },
                })?;

                let dir = module.package_dir().ok_or_else(|| {
                    Error::NotAPackage(format!("{} is a module, not a package", name))
                })?;
                self.absolute(dir)
            }
        };

        if !dir.is_dir() {
            return Err(Error::NotAPackage(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        Ok(dir)
    }

    /// 디렉토리 트리에서 모듈 경로 수집
    pub fn discover(&self, root_dir: &Path) -> BTreeSet<ModulePath> {
        let mut paths = BTreeSet::new();
        let root_dir = self.absolute(root_dir);

        let relative_root = relative_to(&root_dir, &self.working_dir);
        if self
            .policy
            .dir_excluded_by_suffix(&relative_root.to_string_lossy())
        {
            debug!("Skipping excluded package root {}", relative_root.display());
            return paths;
        }

        let mut visited = HashSet::new();
        let mut pending = VecDeque::from([root_dir.clone()]);

        while let Some(dir) = pending.pop_front() {
            let canonical = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            if !visited.insert(canonical) {
                continue;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to scan directory {:?}: {}", dir, e);
                    continue;
                }
            };

            let mut entries: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
            entries.sort();

            for path in entries {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };

                if path.is_dir() {
                    if self.policy.dir_allowed(name) && !self.policy.dir_excluded_by_suffix(name) {
                        pending.push_back(path);
                    } else {
                        debug!("Pruned directory {:?}", path);
                    }
                } else if self.policy.file_allowed(name) {
                    let module_path = self.module_path_for(&path);
                    debug!("Found module {} at {:?}", module_path, path);
                    paths.insert(module_path);
                }
            }
        }

        info!(
            "Discovered {} module paths under {}",
            paths.len(),
            root_dir.display()
        );
        paths
    }

    /// 모듈 파일의 ModulePath (작업 디렉토리 기준)
    pub fn module_path_for(&self, file: &Path) -> ModulePath {
        let relative = relative_to(&self.absolute(file), &self.working_dir);
        ModulePath::from_relative_file(&relative, self.policy.install_marker())
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.working_dir.join(path))
        }
    }
}
