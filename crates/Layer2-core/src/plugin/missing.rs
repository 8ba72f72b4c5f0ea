//! Missing-Module Policy - 스윕 중 누락된 의존성 처리
//!
//! 누락 모듈은 스윕 전체에서 모은 뒤 한 번만 처리합니다.
//! strict 모드면 부분 결과를 버리고 에러, 아니면 경고 한 줄을 남기고 결과를 반환합니다.

use super::symbol::Symbol;
use loadit_foundation::{Error, Result};
use tracing::warn;

/// 누락 모듈 이름 (중복 없음, 처음 발견된 순서)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingModules {
    names: Vec<String>,
}

impl MissingModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이름 추가 (이미 있으면 무시)
    pub fn record(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// 사용자에게 보여줄 경고 문구
    pub fn warning_message(&self) -> String {
        let joined = self.names.join(", ");
        format!(
            "Failed searching plugins in the following imported modules: {}. \
             Consider installing them into one of the runtime search paths: {}",
            joined,
            self.names.join(" ")
        )
    }

    /// 정책 적용
    ///
    /// - 누락 없음: 결과 그대로 반환
    /// - `raise_on_missing`: 결과를 버리고 `Error::MissingModules`
    /// - 그 외: 경고 한 줄 후 결과 반환
    pub fn apply(self, plugins: Vec<Symbol>, raise_on_missing: bool) -> Result<Vec<Symbol>> {
        if self.is_empty() {
            return Ok(plugins);
        }

        if raise_on_missing {
            return Err(Error::MissingModules(self.names));
        }

        warn!("{}", self.warning_message());
        Ok(plugins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::module_path::ModulePath;

    fn plugins() -> Vec<Symbol> {
        vec![Symbol::class(ModulePath::new("plugins.a"), "A", vec![])]
    }

    #[test]
    fn test_record_deduplicates_in_order() {
        let mut missing = MissingModules::new();
        missing.record("foo");
        missing.record("bar");
        missing.record("foo");

        assert_eq!(missing.names(), &["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn test_strict_mode_discards_results() {
        let mut missing = MissingModules::new();
        missing.record("foo");

        let err = missing.apply(plugins(), true).unwrap_err();
        assert_eq!(err.missing_modules(), Some(&["foo".to_string()][..]));
    }

    #[test]
    fn test_lenient_mode_returns_results() {
        let mut missing = MissingModules::new();
        missing.record("foo");
        missing.record("bar");

        let message = missing.warning_message();
        assert!(message.contains("foo, bar"));
        assert!(message.contains("Consider installing"));

        let result = missing.apply(plugins(), false).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_nothing_missing() {
        let result = MissingModules::new().apply(plugins(), true).unwrap();
        assert_eq!(result.len(), 1);
    }
}
