//! Member Filter - 모듈 멤버 중 조건을 만족하는 심볼 선택

use super::symbol::{Module, Symbol};
use std::sync::Arc;

/// 플러그인 판정 함수
pub type PluginPredicate = Arc<dyn Fn(&Symbol) -> bool + Send + Sync>;

/// 클래스이면서 `ancestor` 자신이 아닌 엄격한 하위 클래스
pub fn is_strict_subclass(member: &Symbol, ancestor: &Symbol) -> bool {
    member.is_class() && !member.is(ancestor) && member.is_subclass_of(ancestor)
}

/// `ancestor` 하위 클래스 판정 함수 생성
pub fn subclass_predicate(ancestor: Symbol) -> PluginPredicate {
    Arc::new(move |member: &Symbol| is_strict_subclass(member, &ancestor))
}

/// 클래스 판정 함수
pub fn class_predicate() -> PluginPredicate {
    Arc::new(|member: &Symbol| member.is_class())
}

/// 모듈 최상위 멤버 중 `predicate`를 만족하는 심볼 (멤버 이름 순)
pub fn matching_members(module: &Module, predicate: &(dyn Fn(&Symbol) -> bool + Send + Sync)) -> Vec<Symbol> {
    module
        .members()
        .filter(|(_, symbol)| predicate(*symbol))
        .map(|(_, symbol)| symbol.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::module_path::ModulePath;
    use crate::plugin::symbol::SymbolKind;

    #[test]
    fn test_subclass_predicate_excludes_ancestor() {
        let base = ModulePath::new("plugins.base");
        let a = Symbol::class(base.clone(), "A", vec![]);
        let b = Symbol::class(base.clone(), "B", vec![a.clone()]);
        let c = Symbol::class(base.clone(), "C", vec![b.clone()]);
        let unrelated = Symbol::class(base.clone(), "Unrelated", vec![]);
        let value = Symbol::new(base.clone(), "DEFAULT", SymbolKind::Value(toml::Value::from(1)));

        let module = Module::new(base)
            .with_member("A", a.clone())
            .with_member("B", b.clone())
            .with_member("C", c.clone())
            .with_member("Unrelated", unrelated)
            .with_member("DEFAULT", value);

        let predicate = subclass_predicate(a);
        let found = matching_members(&module, predicate.as_ref());

        assert_eq!(found.len(), 2);
        assert!(found[0].is(&b));
        assert!(found[1].is(&c));
    }

    #[test]
    fn test_custom_predicate() {
        let path = ModulePath::new("plugins.misc");
        let module = Module::new(path.clone())
            .with_member("run", Symbol::new(path.clone(), "run", SymbolKind::Function))
            .with_member("Klass", Symbol::class(path, "Klass", vec![]));

        let functions: PluginPredicate =
            Arc::new(|member: &Symbol| matches!(member.kind(), SymbolKind::Function));

        let found = matching_members(&module, functions.as_ref());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "run");

        assert_eq!(matching_members(&module, class_predicate().as_ref()).len(), 1);
    }
}
