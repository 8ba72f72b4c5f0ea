//! 서브커맨드 구현 - paths, load

use anyhow::{bail, Result};
use loadit_core::{class_predicate, ManifestRuntime, PluginsLoader, Symbol};
use loadit_foundation::{ConfigLoader, LoaderConfig};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 명시적 설정 파일 우선순위 (사용자, 프로젝트 설정보다 높음)
const EXPLICIT_CONFIG_PRIORITY: u8 = 30;

/// 두 서브커맨드가 공유하는 로더 옵션
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Package roots: dotted package names or directories
    #[arg(value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Directory searched for top-level modules; module paths are relative to the working directory, so it must hold the same package layout (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Regex a module file name must match
    #[arg(long, value_name = "REGEX")]
    pub file_pattern: Option<String>,

    /// Regex a directory name must match to be traversed
    #[arg(long, value_name = "REGEX")]
    pub dir_pattern: Option<String>,

    /// Package to leave out of the results (repeatable)
    #[arg(long = "exclude", value_name = "PACKAGE")]
    pub excluded: Vec<String>,

    /// Fail when any module has a missing dependency
    #[arg(long)]
    pub strict: bool,

    /// Module file extension
    #[arg(long, value_name = "EXT")]
    pub suffix: Option<String>,

    /// Extra config file, applied over user and project config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl LoaderOptions {
    /// 설정 파일 병합 후 CLI 옵션 적용
    pub fn resolve_config(&self, working_dir: &Path) -> Result<LoaderConfig> {
        self.resolve_with(ConfigLoader::new(working_dir), working_dir)
    }

    /// 주어진 설정 로더에 `--config` 파일을 얹어 병합
    pub fn resolve_with(&self, mut loader: ConfigLoader, working_dir: &Path) -> Result<LoaderConfig> {
        if let Some(path) = &self.config {
            let path = working_dir.join(path);
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            loader.add_path(path, EXPLICIT_CONFIG_PRIORITY);
        }

        Ok(self.apply(loader.load_all()))
    }

    /// CLI 옵션으로 설정 덮어쓰기
    pub fn apply(&self, mut config: LoaderConfig) -> LoaderConfig {
        if !self.roots.is_empty() {
            config.packages = self.roots.clone();
        }
        if !self.search_paths.is_empty() {
            config.search_paths = self.search_paths.clone();
        }
        if self.file_pattern.is_some() {
            config.file_pattern = self.file_pattern.clone();
        }
        if self.dir_pattern.is_some() {
            config.dir_pattern = self.dir_pattern.clone();
        }
        if self.suffix.is_some() {
            config.source_suffix = self.suffix.clone();
        }
        if self.strict {
            config.raise_on_missing = Some(true);
        }
        for package in &self.excluded {
            if !config.excluded_packages.contains(package) {
                config.excluded_packages.push(package.clone());
            }
        }
        config
    }
}

/// 설정으로 런타임과 로더 구성
pub fn build_loader(config: &LoaderConfig, working_dir: &Path) -> Result<PluginsLoader> {
    let search_paths: Vec<PathBuf> = if config.search_paths.is_empty() {
        vec![working_dir.to_path_buf()]
    } else {
        config
            .search_paths
            .iter()
            .map(|path| working_dir.join(path))
            .collect()
    };
    debug!(
        "Runtime search paths: {:?} (module paths are relative to {})",
        search_paths,
        working_dir.display()
    );

    let runtime = ManifestRuntime::new(search_paths).with_suffix(config.source_suffix());
    Ok(PluginsLoader::from_config_in(
        Arc::new(runtime),
        config,
        working_dir,
    )?)
}

// ============================================================================
// paths
// ============================================================================

pub fn run_paths(options: &LoaderOptions, working_dir: &Path, as_json: bool) -> Result<()> {
    let config = options.resolve_config(working_dir)?;
    let loader = build_loader(&config, working_dir)?;
    let paths = loader.discover_paths()?;

    if as_json {
        let paths: Vec<&str> = paths.iter().map(|p| p.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for path in &paths {
            println!("{}", path);
        }
    }
    Ok(())
}

// ============================================================================
// load
// ============================================================================

pub fn run_load(
    options: &LoaderOptions,
    ancestor: Option<&str>,
    working_dir: &Path,
    as_json: bool,
) -> Result<()> {
    let config = options.resolve_config(working_dir)?;
    let loader = build_loader(&config, working_dir)?;

    let plugins = match ancestor {
        Some(ancestor) => loader.load_subclasses_of(ancestor)?,
        None => loader.with_predicate(class_predicate()).load()?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&plugins_json(&plugins))?);
    } else {
        for plugin in &plugins {
            println!("{}", plugin.qualified_name());
        }
    }
    Ok(())
}

fn plugins_json(plugins: &[Symbol]) -> serde_json::Value {
    plugins
        .iter()
        .map(|plugin| {
            json!({
                "name": plugin.name(),
                "module": plugin.module().as_str(),
                "qualified_name": plugin.qualified_name(),
            })
        })
        .collect()
}
