//! 심볼 분류기 -- 슬라이스 시그니처를 외부 후보/잡음으로 나누고 클래스 수준 이름으로 정규화
//!
//! 언어별 규칙은 [`SymbolRules`] trait으로 분리되어 있고, [`rules_for`]가
//! [`Language`] 변형마다 정확히 하나의 구현을 돌려줍니다. 새 언어를 추가하면
//! `rules_for`의 `match`가 누락을 컴파일 타임에 잡아냅니다.
//!
//! # 공용 진입점
//!
//! - [`is_filterable_type`]: 해석을 건너뛸 심볼인지 판정
//! - [`class_type_from_signature`]: 메서드/필드 시그니처를 클래스 수준 식별자로 축약
//! - [`simplify_type`]: 배열 표식(`[]`) 제거

mod endpoints;
mod javascript;
mod jvm;
mod native;
mod php;
mod python;
mod ruby;

pub use endpoints::quoted_literals;
pub use javascript::JsRules;
pub use jvm::JvmRules;
pub use native::NativeRules;
pub use php::PhpRules;
pub use python::PythonRules;
pub use ruby::RubyRules;

use crate::types::{Language, UserDefinedTypes};

/// 대소문자 무시하고 비교하는 자리표시 타입 이름
const PLACEHOLDER_TYPES: &[&str] = &["ANY", "UNKNOWN", "VOID", "IMPORT"];

/// 언어와 무관한 잡음 접두사
const NOISE_PREFIXES: &[&str] = &[
    "<operator",
    "<unresolved",
    "<unknownFullName",
    "__builtin",
    "LAMBDA",
    "../",
];

/// 정규화 후에도 해석 불가로 남는 접두사
const UNRESOLVED_PREFIXES: &[&str] = &["<unresolved", "<operator", "<unknownFullName"];

/// import 별칭과 심볼을 비교하는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMatch {
    /// 별칭 목록에 정확히 포함되어야 함
    Exact,
    /// 어느 쪽이든 다른 쪽의 접두사이면 일치
    Prefix,
}

/// 컴포넌트 속성에서 import 별칭을 읽는 방법
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProperty {
    /// 속성 이름
    pub name: &'static str,
    /// 값 구분자
    pub separator: &'static str,
}

/// 언어별 심볼 규칙
pub trait SymbolRules: Send + Sync {
    /// 언어 고유 잡음 패턴 (표준 라이브러리, 컴파일러 내부 이름 등)
    fn is_noise(&self, symbol: &str) -> bool;

    /// 언어 고유 장식을 벗겨낸 이름. 확실히 해석할 수 없는 형태면 `None`
    fn canonicalize(&self, symbol: &str) -> Option<String>;

    /// 코드 조각에서 라우트 형태의 문자열 리터럴 추출
    fn extract_endpoints(&self, code: &str) -> Vec<String>;

    /// 정확한 줄 번호를 호출 노드에서만 얻을 수 있는 언어인지
    fn call_node_lines(&self) -> bool {
        false
    }

    /// import 별칭 비교 방식
    fn import_match(&self) -> ImportMatch {
        ImportMatch::Exact
    }

    /// import 별칭이 기록된 컴포넌트 속성
    fn import_property(&self) -> ImportProperty {
        ImportProperty {
            name: "ImportedModules",
            separator: ",",
        }
    }

    /// 메서드 참조 문자열에서 엔드포인트를 찾는지
    fn scans_method_endpoints(&self) -> bool {
        true
    }

    /// 사용자 정의 타입 이름에서 서비스를 추론하는지
    fn detects_udt_services(&self) -> bool {
        false
    }
}

static JVM_RULES: JvmRules = JvmRules;
static JS_RULES: JsRules = JsRules;
static PYTHON_RULES: PythonRules = PythonRules;
static PHP_RULES: PhpRules = PhpRules;
static RUBY_RULES: RubyRules = RubyRules;
static C_FAMILY_RULES: NativeRules = NativeRules {
    udt_services: true,
};
static SWIFT_RULES: NativeRules = NativeRules {
    udt_services: false,
};

/// 언어에 대응하는 규칙 구현
pub fn rules_for(language: Language) -> &'static dyn SymbolRules {
    match language {
        Language::Java | Language::Jar => &JVM_RULES,
        Language::JavaScript | Language::TypeScript => &JS_RULES,
        Language::Python => &PYTHON_RULES,
        Language::Php => &PHP_RULES,
        Language::Ruby => &RUBY_RULES,
        Language::C | Language::Cpp => &C_FAMILY_RULES,
        Language::Swift => &SWIFT_RULES,
    }
}

/// 심볼을 purl 해석 대상에서 제외할지 판정합니다.
///
/// 빈 문자열, 자리표시 타입, 공용 잡음 접두사, 언어별 잡음, 사용자 정의 타입이면 `true`.
pub fn is_filterable_type(language: Language, udts: &UserDefinedTypes, symbol: &str) -> bool {
    if symbol.is_empty() {
        return true;
    }
    let upper = symbol.to_uppercase();
    if PLACEHOLDER_TYPES.contains(&upper.as_str()) {
        return true;
    }
    if NOISE_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
        return true;
    }
    if rules_for(language).is_noise(symbol) {
        return true;
    }
    udts.contains(symbol)
}

/// 시그니처를 import 테이블/네임스페이스 조회에 쓸 클래스 수준 식별자로 축약합니다.
pub fn class_type_from_signature(language: Language, symbol: &str) -> Option<String> {
    let canonical = rules_for(language).canonicalize(symbol)?;
    if UNRESOLVED_PREFIXES.iter().any(|p| canonical.starts_with(p)) {
        return None;
    }
    let canonical = canonical.split('$').next().unwrap_or_default();
    let simplified = simplify_type(canonical);
    if simplified.is_empty() {
        None
    } else {
        Some(simplified)
    }
}

/// 배열 표식(`[]`)을 제거합니다.
pub fn simplify_type(symbol: &str) -> String {
    symbol.replace("[]", "")
}
