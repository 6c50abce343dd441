//! C / C++ / Swift 규칙
//!
//! 이 언어들은 슬라이서가 이미 정규화된 이름을 내보내므로 공용 규칙 외의 잡음 패턴은 없습니다.

use super::SymbolRules;
use super::endpoints::generic_endpoints;

/// 네이티브 언어 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeRules {
    /// 사용자 정의 함수 이름에서 서비스를 추론할지 (C/C++)
    pub udt_services: bool,
}

impl SymbolRules for NativeRules {
    fn is_noise(&self, _symbol: &str) -> bool {
        false
    }

    fn canonicalize(&self, symbol: &str) -> Option<String> {
        Some(symbol.to_owned())
    }

    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        generic_endpoints(code)
    }

    fn detects_udt_services(&self) -> bool {
        self.udt_services
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_is_identity() {
        let rules = NativeRules::default();
        assert_eq!(rules.canonicalize("curl_easy_init"), Some("curl_easy_init".to_owned()));
    }

    #[test]
    fn endpoints_from_route_registration() {
        let rules = NativeRules { udt_services: true };
        assert_eq!(
            rules.extract_endpoints(r#"svr.Get("/hi", handler)"#),
            vec!["/hi".to_owned()]
        );
    }
}
