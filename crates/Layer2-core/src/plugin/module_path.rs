//! ModulePath - dotted 모듈 식별자

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// 네임스페이스 구분자
pub const NAMESPACE_SEPARATOR: char = '.';

/// 하나의 로드 가능한 코드 단위를 가리키는 dotted 식별자 (예: `plugins.http`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(String);

impl ModulePath {
    /// dotted 문자열에서 생성 (빈 세그먼트는 제거)
    pub fn new(dotted: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = dotted
            .as_ref()
            .split(NAMESPACE_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();
        Self(segments.join("."))
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        Self::new(joined.join("."))
    }

    /// 작업 디렉토리 기준 상대 경로의 모듈 파일에서 ModulePath 생성
    ///
    /// 1. 확장자 제거
    /// 2. 경로 구분자를 `.`으로 치환
    /// 3. 빈 세그먼트 제거 (`../x` 같은 상위 경로 포함)
    /// 4. 마지막 설치 디렉토리 마커 이전 부분 제거 (마커 뒤에 세그먼트가 있을 때만)
    pub fn from_relative_file(relative: &Path, install_marker: &str) -> Self {
        let without_suffix = relative.with_extension("");

        let mut parts = Vec::new();
        for component in without_suffix.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::ParentDir => parts.push("..".to_string()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }

        let dotted = parts.join(".");
        let segments: Vec<&str> = dotted
            .split(NAMESPACE_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();

        let last = segments.len().saturating_sub(1);
        let canonical = match segments[..last].iter().rposition(|s| *s == install_marker) {
            Some(idx) => &segments[idx + 1..],
            None => &segments[..],
        };

        Self::from_segments(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAMESPACE_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// 마지막 세그먼트
    pub fn tail(&self) -> &str {
        self.0.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or("")
    }

    /// 상위 모듈 (`a.b.c` -> `a.b`)
    pub fn parent(&self) -> Option<ModulePath> {
        self.0
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map(|(head, _)| ModulePath(head.to_string()))
    }

    /// 세그먼트 추가
    pub fn join(&self, tail: &str) -> ModulePath {
        if self.is_empty() {
            ModulePath::new(tail)
        } else {
            ModulePath::new(format!("{}.{}", self.0, tail))
        }
    }

    /// 자기 자신이거나 `package` 하위 모듈인지 (세그먼트 단위 비교)
    pub fn starts_with(&self, package: &ModulePath) -> bool {
        let mut own = self.segments();
        package.segments().all(|seg| own.next() == Some(seg))
    }

    /// 모든 접두 경로 (`a.b.c` -> `a`, `a.b`, `a.b.c`)
    pub fn prefixes(&self) -> Vec<ModulePath> {
        let segments: Vec<&str> = self.segments().collect();
        (1..=segments.len())
            .map(|n| ModulePath::from_segments(&segments[..n]))
            .collect()
    }

    /// 검색 경로 기준 파일 시스템 경로 (확장자 없음)
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        ModulePath::new(s)
    }
}

impl From<String> for ModulePath {
    fn from(s: String) -> Self {
        ModulePath::new(s)
    }
}

/// `base` 기준 `path`의 상대 경로 (어휘적 계산, 파일 시스템 접근 없음)
///
/// 두 경로 모두 같은 기준(절대 경로 또는 같은 작업 디렉토리 기준)이어야 합니다.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &path_parts[common..] {
        result.push(part.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// `.`과 `..`을 어휘적으로 정리
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_relative_file() {
        let path = ModulePath::from_relative_file(Path::new("plugins/http/client.toml"), "site-packages");
        assert_eq!(path.as_str(), "plugins.http.client");
    }

    #[test]
    fn test_parent_dir_prefix_is_stripped() {
        let path = ModulePath::from_relative_file(Path::new("../test/my_abstract.toml"), "site-packages");
        assert_eq!(path.as_str(), "test.my_abstract");
    }

    #[test]
    fn test_install_marker_prefix_is_stripped() {
        let path = ModulePath::from_relative_file(
            Path::new("venv/lib/site-packages/vendored/plugins/http.toml"),
            "site-packages",
        );
        assert_eq!(path.as_str(), "vendored.plugins.http");

        // 마지막 마커 기준
        let nested = ModulePath::from_relative_file(
            Path::new("site-packages/a/site-packages/b.toml"),
            "site-packages",
        );
        assert_eq!(nested.as_str(), "b");
    }

    #[test]
    fn test_module_named_like_marker_keeps_prefix() {
        let path = ModulePath::from_relative_file(Path::new("plugins/site-packages.toml"), "site-packages");
        assert_eq!(path.as_str(), "plugins.site-packages");

        let top = ModulePath::from_relative_file(Path::new("site-packages.toml"), "site-packages");
        assert_eq!(top.as_str(), "site-packages");
    }

    #[test]
    fn test_dotted_file_name_has_no_empty_segments() {
        let path = ModulePath::from_relative_file(Path::new("plugins/a..toml"), "site-packages");
        assert_eq!(path.as_str(), "plugins.a");
        assert_eq!(path, ModulePath::new("plugins.a."));
    }

    #[test]
    fn test_marker_must_be_whole_segment() {
        let path = ModulePath::from_relative_file(
            Path::new("my-site-packages/plugin.toml"),
            "site-packages",
        );
        assert_eq!(path.as_str(), "my-site-packages.plugin");
    }

    #[test]
    fn test_derivation_is_pure() {
        let file = Path::new("plugins/sub/b.toml");
        let first = ModulePath::from_relative_file(file, "site-packages");
        let second = ModulePath::from_relative_file(file, "site-packages");
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_files_get_distinct_paths() {
        let files = [
            "plugins/a.toml",
            "plugins/b.toml",
            "plugins/sub/a.toml",
            "other/a.toml",
        ];
        let mut seen = std::collections::HashSet::new();
        for file in files {
            assert!(seen.insert(ModulePath::from_relative_file(Path::new(file), "site-packages")));
        }
    }

    #[test]
    fn test_segments_helpers() {
        let path = ModulePath::new("a.b.c");
        assert_eq!(path.tail(), "c");
        assert_eq!(path.parent(), Some(ModulePath::new("a.b")));
        assert_eq!(ModulePath::new("a").parent(), None);
        assert_eq!(
            path.prefixes(),
            vec![ModulePath::new("a"), ModulePath::new("a.b"), path.clone()]
        );
        assert_eq!(path.to_relative_path(), Path::new("a/b/c"));
    }

    #[test]
    fn test_starts_with_is_segment_wise() {
        let path = ModulePath::new("plugins.legacy.old");
        assert!(path.starts_with(&ModulePath::new("plugins.legacy")));
        assert!(path.starts_with(&path));
        assert!(!ModulePath::new("plugins.legacy_v2").starts_with(&ModulePath::new("plugins.legacy")));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/work/plugins/a.toml"), Path::new("/work")),
            Path::new("plugins/a.toml")
        );
        assert_eq!(
            relative_to(Path::new("/other/plugins"), Path::new("/work/project")),
            Path::new("../../other/plugins")
        );
        assert_eq!(relative_to(Path::new("/work"), Path::new("/work/")), Path::new("."));
        assert_eq!(
            relative_to(Path::new("/work/./x/../plugins"), Path::new("/work")),
            Path::new("plugins")
        );
    }
}
