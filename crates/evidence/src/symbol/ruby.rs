//! Ruby 규칙

use super::{ImportMatch, ImportProperty, SymbolRules};

/// 라우트 DSL의 HTTP 동사. 뒤에 나오는 항목일수록 우선합니다.
const ROUTE_VERBS: &[&str] = &["get", "post", "delete", "options", "put", "head"];

/// Ruby 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyRules;

impl SymbolRules for RubyRules {
    /// 상수/클래스 참조(대문자 포함)가 아니면 잡음입니다.
    fn is_noise(&self, symbol: &str) -> bool {
        symbol == "<empty>"
            || symbol.starts_with("__core.")
            || symbol.starts_with('@')
            || symbol.to_lowercase() == symbol
    }

    fn canonicalize(&self, symbol: &str) -> Option<String> {
        if symbol == "<empty>" || symbol.starts_with("__core.") {
            return None;
        }
        let head = symbol.split("::").next().unwrap_or_default();
        Some(head.rsplit(' ').next().unwrap_or_default().to_owned())
    }

    /// `namespace`/HTTP 동사 토큰으로 접두사와 접미사를 복원해 이어 붙입니다.
    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        let code = code.replace("...", "");
        let prefix = token_after_last(&code, "namespace ")
            .or_else(|| token_after_last(&code, "collection do get "))
            .unwrap_or_default();
        let mut suffix = "";
        for verb in ROUTE_VERBS {
            if let Some(token) = token_after_last(&code, &format!("{verb} ")) {
                suffix = token;
            }
        }

        let mut endpoints: Vec<String> = Vec::new();
        if code.contains("http") && code.contains('"') {
            endpoints.extend(
                code.split('"')
                    .filter(|s| s.starts_with("http"))
                    .map(str::to_owned),
            );
        }
        if !prefix.is_empty() || !suffix.is_empty() {
            endpoints.push(format!("{}{}", strip_quotes(prefix), strip_quotes(suffix)));
        }
        endpoints.retain(|u| u.chars().count() > 1 && !u.starts_with('.') && u != "https:/");
        endpoints
    }

    fn call_node_lines(&self) -> bool {
        true
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

    fn detects_udt_services(&self) -> bool {
        true
    }
}

/// 마지막 `marker` 뒤의 첫 번째 공백 구분 토큰
fn token_after_last<'a>(code: &'a str, marker: &str) -> Option<&'a str> {
    let idx = code.rfind(marker)?;
    let rest = &code[idx + marker.len()..];
    Some(rest.split(' ').next().unwrap_or_default())
}

fn strip_quotes(s: &str) -> String {
    s.replace(['"', '\''], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{class_type_from_signature, is_filterable_type};
    use crate::types::{Language, UserDefinedTypes};

    #[test]
    fn lowercase_and_core_symbols_are_noise() {
        let udts = UserDefinedTypes::new();
        for sym in ["<empty>", "__core.Kernel.puts", "@user", "render", "params.permit"] {
            assert!(is_filterable_type(Language::Ruby, &udts, sym), "{sym}");
        }
        assert!(!is_filterable_type(Language::Ruby, &udts, "Faraday::Connection"));
    }

    #[test]
    fn canonicalize_keeps_leading_constant() {
        assert_eq!(
            class_type_from_signature(Language::Ruby, "Faraday::Connection.get"),
            Some("Faraday".to_owned())
        );
        assert_eq!(
            class_type_from_signature(Language::Ruby, "include Devise::Models"),
            Some("Devise".to_owned())
        );
        assert_eq!(class_type_from_signature(Language::Ruby, "<empty>"), None);
        assert_eq!(class_type_from_signature(Language::Ruby, "__core.Array"), None);
    }

    #[test]
    fn namespace_and_verb_are_joined() {
        assert_eq!(
            RubyRules.extract_endpoints(r#"namespace foo get "/bar""#),
            vec!["foo/bar".to_owned()]
        );
    }

    #[test]
    fn last_verb_in_priority_order_wins() {
        assert_eq!(
            RubyRules.extract_endpoints(r#"get "/a" post "/b""#),
            vec!["/b".to_owned()]
        );
    }

    #[test]
    fn http_literals_are_collected() {
        assert_eq!(
            RubyRules.extract_endpoints(r#"Faraday.new(url: "https://api.example.com/v1")"#),
            vec!["https://api.example.com/v1".to_owned()]
        );
    }

    #[test]
    fn ellipsis_is_removed_and_short_results_dropped() {
        assert!(RubyRules.extract_endpoints("get ...").is_empty());
        assert!(RubyRules.extract_endpoints("render json: user").is_empty());
    }
}
