//! JavaScript / TypeScript 규칙

use super::SymbolRules;
use super::endpoints::route_literals;

/// JavaScript와 TypeScript 공용 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct JsRules;

impl SymbolRules for JsRules {
    fn is_noise(&self, symbol: &str) -> bool {
        symbol.contains(".js")
            || symbol.contains("=>")
            || ["__", "{ ", "JSON", "void:", "node:"]
                .iter()
                .any(|p| symbol.starts_with(p))
    }

    /// `pkg:lib/sub.js::Klass:method` 형태를 `pkg/lib` 같은 모듈 경로로 줄입니다.
    fn canonicalize(&self, symbol: &str) -> Option<String> {
        let symbol = symbol.replacen("new: ", "", 1).replacen("await ", "", 1);
        if !symbol.contains(':') {
            return Some(symbol);
        }
        let head = symbol.split("::").next().unwrap_or_default().replace(':', "/");
        let mut parts: Vec<&str> = head.split('/').collect();
        if parts.len() > 1 {
            parts.pop();
        }
        Some(parts.join("/"))
    }

    /// `app.*`/`router` 호출 안의 경로 리터럴 (MIME 타입 제외)
    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        if !(code.contains("app.") || code.contains("route")) {
            return Vec::new();
        }
        route_literals(code)
            .filter(|v| !v.starts_with("application/") && !v.starts_with("text/"))
            .collect()
    }

    fn call_node_lines(&self) -> bool {
        true
    }
}
