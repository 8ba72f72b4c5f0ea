//! Module File - 모듈 파일(TOML) 형식 정의
//!
//! ```toml
//! requires = ["requests"]
//!
//! [imports]
//! Plugin = "plugins.base.Plugin"
//!
//! [[symbols]]
//! name = "HttpPlugin"
//! kind = "class"
//! bases = ["Plugin"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// 패키지 초기화 파일 이름 (확장자 제외)
pub const PACKAGE_INIT_STEM: &str = "__init__";

/// 모듈 파일 구조
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleFile {
    /// import 가능해야 하는 모듈 목록
    #[serde(default)]
    pub requires: Vec<String>,

    /// 로컬 이름 -> `module` 또는 `module.Attr`
    #[serde(default)]
    pub imports: BTreeMap<String, String>,

    /// 이 모듈에서 정의하는 심볼 (선언 순서대로 생성)
    #[serde(default)]
    pub symbols: Vec<SymbolDecl>,
}

/// 심볼 선언
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolDecl {
    /// 클래스
    Class {
        name: String,
        /// 로컬 이름 또는 `module.Attr`
        #[serde(default)]
        bases: Vec<String>,
    },

    /// 함수
    Function { name: String },

    /// 값
    Value {
        name: String,
        #[serde(default = "default_value")]
        value: toml::Value,
    },
}

fn default_value() -> toml::Value {
    toml::Value::Boolean(true)
}

impl SymbolDecl {
    pub fn name(&self) -> &str {
        match self {
            SymbolDecl::Class { name, .. }
            | SymbolDecl::Function { name }
            | SymbolDecl::Value { name, .. } => name,
        }
    }
}

impl ModuleFile {
    /// 문자열에서 모듈 파일 파싱
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
