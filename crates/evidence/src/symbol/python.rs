//! Python 규칙

use super::endpoints::generic_endpoints;
use super::{ImportMatch, SymbolRules};

/// 모듈/함수 시그니처에 붙는 슬라이서 내부 접미사
const PYTHON_DECORATIONS: &[&str] = &[
    ".<metaClassCallHandler>",
    ".<fakeNew>",
    ".<body>",
    ".__iter__",
    ".__init__",
];

/// Python 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonRules;

impl SymbolRules for PythonRules {
    fn is_noise(&self, symbol: &str) -> bool {
        ["tmp", "self.", "_", "def "]
            .iter()
            .any(|p| symbol.starts_with(p))
    }

    /// `app/views.py:<module>.requests.get` 같은 경로형 이름을 점 표기 모듈명으로 바꿉니다.
    fn canonicalize(&self, symbol: &str) -> Option<String> {
        let last = symbol.rsplit('/').next().unwrap_or(symbol);
        let mut canonical = last.replace(".py:<module>", "").replace('/', ".");
        for decoration in PYTHON_DECORATIONS {
            canonical = canonical.replace(decoration, "");
        }
        Some(canonical)
    }

    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        generic_endpoints(code)
    }

    fn import_match(&self) -> ImportMatch {
        ImportMatch::Prefix
    }

    fn detects_udt_services(&self) -> bool {
        true
    }
}
