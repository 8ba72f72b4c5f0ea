//! Aggregator - 모듈별 결과 병합
//!
//! 심볼 값은 해시나 전순서를 지원하지 않을 수 있으므로 집합을 쓰지 않고
//! 순서 있는 목록에서 동일성(`Symbol::is`)으로 선형 검사합니다.

use super::symbol::Symbol;

/// 처음 발견된 순서를 유지하는 중복 없는 플러그인 목록
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Symbol>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 아직 없는 심볼이면 추가 (추가됐으면 true)
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.contains(&symbol) {
            return false;
        }
        self.plugins.push(symbol);
        true
    }

    /// 여러 심볼 추가 (새로 추가된 수 반환)
    pub fn extend(&mut self, symbols: impl IntoIterator<Item = Symbol>) -> usize {
        symbols
            .into_iter()
            .map(|symbol| self.insert(symbol))
            .filter(|added| *added)
            .count()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.plugins.iter().any(|existing| existing.is(symbol))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.plugins.iter()
    }

    pub fn into_vec(self) -> Vec<Symbol> {
        self.plugins
    }
}
