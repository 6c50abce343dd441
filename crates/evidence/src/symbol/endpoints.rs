//! 엔드포인트 추출 공용 헬퍼

use std::sync::LazyLock;

use regex::Regex;

/// 작은따옴표/큰따옴표로 둘러싸인 가장 짧은 리터럴
static QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"['"](.*?)['"]"#).ok());

/// 코드에서 따옴표로 둘러싼 리터럴을 순서대로 꺼냅니다 (따옴표 제외).
pub fn quoted_literals(code: &str) -> Vec<String> {
    let Some(re) = QUOTED.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(code)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// 라우트처럼 보이는 리터럴만 남깁니다.
///
/// 비어 있지 않고, `/`를 포함하며, `.`이나 `@`로 시작하지 않아야 합니다.
pub(crate) fn route_literals(code: &str) -> impl Iterator<Item = String> {
    quoted_literals(code)
        .into_iter()
        .filter(|v| !v.is_empty() && !v.starts_with('.') && v.contains('/') && !v.starts_with('@'))
}

/// 언어 전용 규칙이 없을 때 쓰는 추출기: `/`를 포함하고 두 글자보다 긴 리터럴
pub(crate) fn generic_endpoints(code: &str) -> Vec<String> {
    quoted_literals(code)
        .into_iter()
        .filter(|v| v.chars().count() > 2 && v.contains('/'))
        .collect()
}
