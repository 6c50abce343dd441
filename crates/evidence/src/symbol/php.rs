//! PHP 규칙

use super::endpoints::generic_endpoints;
use super::{ImportMatch, ImportProperty, SymbolRules};

/// PHP 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpRules;

impl SymbolRules for PhpRules {
    /// 네임스페이스 구분자(`\`)가 없고 `use` 구문도 아니면 전역 함수/내장 타입으로 봅니다.
    fn is_noise(&self, symbol: &str) -> bool {
        !symbol.contains('\\') && !symbol.starts_with("use")
    }

    fn canonicalize(&self, symbol: &str) -> Option<String> {
        let head = symbol.split("->").next().unwrap_or_default();
        Some(head.split("::").next().unwrap_or_default().to_owned())
    }

    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        generic_endpoints(code)
    }

    fn import_match(&self) -> ImportMatch {
        ImportMatch::Prefix
    }

    fn import_property(&self) -> ImportProperty {
        ImportProperty {
            name: "Namespaces",
            separator: ", ",
        }
    }

    fn scans_method_endpoints(&self) -> bool {
        false
    }

    fn detects_udt_services(&self) -> bool {
        true
    }
}
