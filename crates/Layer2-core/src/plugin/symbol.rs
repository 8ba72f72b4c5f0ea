//! Symbol / Module - 런타임이 로드한 코드 단위와 그 멤버
//!
//! `Symbol`은 `Arc` 핸들입니다. 동일성은 `Arc::ptr_eq`로만 판단하며
//! `PartialEq`, `Hash`, `Ord`는 구현하지 않습니다. 값 심볼(`toml::Value`)은
//! 전순서나 해시를 지원하지 않기 때문입니다.

use super::module_path::ModulePath;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Symbol
// ============================================================================

/// 심볼 종류
#[derive(Debug)]
pub enum SymbolKind {
    /// 클래스 (직접 상위 클래스 목록)
    Class { bases: Vec<Symbol> },

    /// 함수
    Function,

    /// 일반 값
    Value(toml::Value),

    /// 모듈 자체를 가리키는 바인딩
    Module(ModulePath),
}

/// 심볼 정의
#[derive(Debug)]
pub struct SymbolDef {
    /// 정의된 이름
    pub name: String,

    /// 정의된 모듈
    pub module: ModulePath,

    /// 종류
    pub kind: SymbolKind,
}

/// 심볼 핸들 - 복제해도 같은 정의를 가리킴
#[derive(Clone)]
pub struct Symbol(Arc<SymbolDef>);

impl Symbol {
    pub fn new(module: ModulePath, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self(Arc::new(SymbolDef {
            name: name.into(),
            module,
            kind,
        }))
    }

    /// 클래스 심볼 생성 헬퍼
    pub fn class(module: ModulePath, name: impl Into<String>, bases: Vec<Symbol>) -> Self {
        Self::new(module, name, SymbolKind::Class { bases })
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn module(&self) -> &ModulePath {
        &self.0.module
    }

    pub fn kind(&self) -> &SymbolKind {
        &self.0.kind
    }

    /// `module.Name` 형태의 정규 이름
    pub fn qualified_name(&self) -> String {
        match &self.0.kind {
            SymbolKind::Module(path) => path.to_string(),
            _ => self.0.module.join(&self.0.name).to_string(),
        }
    }

    /// 같은 정의를 가리키는지 (동일성 비교)
    pub fn is(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.0.kind, SymbolKind::Class { .. })
    }

    /// 직접 상위 클래스 (클래스가 아니면 빈 슬라이스)
    pub fn bases(&self) -> &[Symbol] {
        match &self.0.kind {
            SymbolKind::Class { bases } => bases,
            _ => &[],
        }
    }

    /// `ancestor`의 하위 클래스인지 (자기 자신 포함, 상속 체인을 동일성으로 탐색)
    pub fn is_subclass_of(&self, ancestor: &Symbol) -> bool {
        if !self.is_class() || !ancestor.is_class() {
            return false;
        }

        let mut pending = vec![self.clone()];
        while let Some(current) = pending.pop() {
            if current.is(ancestor) {
                return true;
            }
            pending.extend(current.bases().iter().cloned());
        }
        false
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.0.kind {
            SymbolKind::Class { .. } => "class",
            SymbolKind::Function => "function",
            SymbolKind::Value(_) => "value",
            SymbolKind::Module(_) => "module",
        };
        write!(f, "<{} {}>", kind, self.qualified_name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

// ============================================================================
// Module
// ============================================================================

/// 로드된 모듈 핸들
pub type ModuleHandle = Arc<Module>;

/// 로드된 모듈 - 최상위 네임스페이스
#[derive(Debug)]
pub struct Module {
    /// 모듈 경로
    path: ModulePath,

    /// 모듈 파일 (네임스페이스 패키지는 없음)
    origin: Option<PathBuf>,

    /// 패키지 디렉토리 (패키지인 경우)
    package_dir: Option<PathBuf>,

    /// 최상위 멤버 (이름 순)
    members: BTreeMap<String, Symbol>,
}

impl Module {
    pub fn new(path: ModulePath) -> Self {
        Self {
            path,
            origin: None,
            package_dir: None,
            members: BTreeMap::new(),
        }
    }

    /// 빌더 패턴: 모듈 파일 설정
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// 빌더 패턴: 패키지 디렉토리 설정
    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_dir = Some(dir.into());
        self
    }

    /// 빌더 패턴: 멤버 바인딩
    pub fn with_member(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        self.bind(name, symbol);
        self
    }

    /// 이름에 심볼 바인딩 (같은 이름은 덮어씀)
    pub fn bind(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.members.insert(name.into(), symbol);
    }

    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn package_dir(&self) -> Option<&Path> {
        self.package_dir.as_deref()
    }

    pub fn is_package(&self) -> bool {
        self.package_dir.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.members.get(name)
    }

    /// 최상위 멤버 (이름 순)
    pub fn members(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.members.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ModulePath {
        ModulePath::new("plugins.base")
    }

    #[test]
    fn test_identity_not_equality() {
        let a1 = Symbol::class(base(), "A", vec![]);
        let a2 = Symbol::class(base(), "A", vec![]);
        let alias = a1.clone();

        assert!(a1.is(&alias));
        assert!(!a1.is(&a2));
        assert_eq!(a1.qualified_name(), a2.qualified_name());
    }

    #[test]
    fn test_subclass_chain() {
        let a = Symbol::class(base(), "A", vec![]);
        let b = Symbol::class(ModulePath::new("plugins.b"), "B", vec![a.clone()]);
        let c = Symbol::class(ModulePath::new("plugins.c"), "C", vec![b.clone()]);
        let other = Symbol::class(base(), "Other", vec![]);

        assert!(c.is_subclass_of(&a));
        assert!(b.is_subclass_of(&a));
        assert!(a.is_subclass_of(&a));
        assert!(!a.is_subclass_of(&b));
        assert!(!c.is_subclass_of(&other));
    }

    #[test]
    fn test_non_class_is_never_subclass() {
        let a = Symbol::class(base(), "A", vec![]);
        let value = Symbol::new(base(), "VERSION", SymbolKind::Value(toml::Value::from("1.0")));

        assert!(!value.is_subclass_of(&a));
        assert!(!a.is_subclass_of(&value));
    }

    #[test]
    fn test_module_members_are_name_ordered() {
        let module = Module::new(base())
            .with_member("Zeta", Symbol::new(base(), "Zeta", SymbolKind::Function))
            .with_member("Alpha", Symbol::new(base(), "Alpha", SymbolKind::Function));

        let names: Vec<&str> = module.members().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert!(!module.is_package());
        assert_eq!(format!("{:?}", module.get("Alpha").unwrap()), "<function plugins.base.Alpha>");
    }
}
