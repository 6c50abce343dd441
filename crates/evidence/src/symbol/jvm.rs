//! JVM 계열 (java, jar) 규칙

use super::SymbolRules;
use super::endpoints::route_literals;

/// JDK 및 XML 표준 API 접두사
const JDK_PREFIXES: &[&str] = &[
    "java.",
    "sun.",
    "jdk.",
    "org.w3c.",
    "org.xml.",
    "javax.xml.",
];

/// Java 소스와 jar 아티팩트 공용 규칙
#[derive(Debug, Default, Clone, Copy)]
pub struct JvmRules;

impl SymbolRules for JvmRules {
    fn is_noise(&self, symbol: &str) -> bool {
        !symbol.contains('.')
            || symbol.starts_with('@')
            || JDK_PREFIXES.iter().any(|p| symbol.starts_with(p))
    }

    /// `pkg.Class.method:descriptor` 형태에서 디스크립터와 메서드명을 떼어냅니다.
    fn canonicalize(&self, symbol: &str) -> Option<String> {
        if !symbol.contains(':') {
            return Some(symbol.to_owned());
        }
        let head = symbol.split(':').next().unwrap_or_default();
        let mut parts: Vec<&str> = head.split('.').collect();
        parts.pop();
        Some(parts.join("."))
    }

    /// `@GetMapping("/x")`, `@Path("/y")` 같은 매핑 어노테이션만 대상으로 합니다.
    fn extract_endpoints(&self, code: &str) -> Vec<String> {
        if !(code.starts_with('@')
            && (code.contains("Mapping") || code.contains("Path"))
            && code.contains('('))
        {
            return Vec::new();
        }
        route_literals(code).collect()
    }
}
