//! 서비스/엔드포인트 탐지기
//!
//! usages 슬라이스의 메서드 참조 문자열에서 라우트 형태의 문자열 리터럴을 뽑아
//! 서비스 단위로 모읍니다. 메서드 참조에 `auth`가 들어 있으면 해당 서비스는
//! 인증이 필요한 것으로 보고 신뢰 경계 플래그도 함께 켭니다.
//!
//! 어노테이션이 없는 함수형 언어(C/C++, Python, PHP, Ruby)는 사용자 정의 타입
//! 이름이 라우트/HTTP 동사 키워드를 포함할 때 첫 번째 필드 이름에서 엔드포인트를
//! 추출합니다.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::slices::{ObjectSlice, UserDefinedType};
use crate::symbol::rules_for;
use crate::types::Language;

/// 사용자 정의 타입 이름에서 찾는 라우트 키워드
const UDT_ROUTE_KEYWORDS: &[&str] = &[
    "route",
    "path",
    "url",
    "registerhandler",
    "endpoint",
    "api",
    "add_method",
    "get",
    "post",
    "delete",
    "put",
    "head",
    "options",
    "connect",
];

/// 탐지된 서비스 하나
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// 엔드포인트 집합
    pub endpoints: BTreeSet<String>,
    /// 인증 필요 여부 (판단 근거가 없으면 `None`)
    pub authenticated: Option<bool>,
    /// 신뢰 경계 여부
    pub trust_boundary: Option<bool>,
}

impl ServiceRecord {
    fn new(authenticated: Option<bool>) -> Self {
        Self {
            endpoints: BTreeSet::new(),
            authenticated,
            trust_boundary: if authenticated == Some(true) {
                Some(true)
            } else {
                None
            },
        }
    }

    /// 인증 근거를 반영합니다. 한 번 인증된 서비스는 인증 상태로 남습니다.
    fn mark_authenticated(&mut self) {
        self.authenticated = Some(true);
        self.trust_boundary = Some(true);
    }
}

/// 서비스 이름 → 서비스
pub type ServiceMap = BTreeMap<String, ServiceRecord>;

/// 코드 조각에서 엔드포인트를 추출합니다.
pub fn extract_endpoints(language: Language, code: &str) -> Vec<String> {
    if code.is_empty() {
        return Vec::new();
    }
    rules_for(language).extract_endpoints(code)
}

fn mentions_auth(method: &str) -> bool {
    method.to_lowercase().contains("auth")
}

/// 객체 슬라이스 하나의 usage에서 서비스를 탐지합니다.
pub fn detect_services_from_usages(
    language: Language,
    slice: &ObjectSlice,
    services: &mut ServiceMap,
) {
    let rules = rules_for(language);
    let scan_methods = rules.scans_method_endpoints();

    for usage in &slice.usages {
        let mut endpoints: Vec<String> = Vec::new();
        let mut authenticated = false;

        let defined_by_name = usage.defined_by.as_ref().and_then(|d| d.name.as_deref());
        let target_method = usage
            .target_obj
            .as_ref()
            .and_then(|t| t.resolved_method.as_deref());
        let defined_method = usage
            .defined_by
            .as_ref()
            .and_then(|d| d.resolved_method.as_deref());

        let ruby_route = match (language, defined_by_name) {
            (Language::Ruby, Some(name)) if name.contains('/') => Some(name),
            _ => None,
        };

        if let Some(name) = ruby_route {
            endpoints = extract_endpoints(language, name);
        } else if let Some(method) = target_method.or(defined_method) {
            if scan_methods {
                endpoints = extract_endpoints(language, method);
            }
            authenticated |= mentions_auth(method);
        }

        if scan_methods {
            for method in usage
                .invoked_calls
                .iter()
                .filter_map(|c| c.resolved_method.as_deref())
            {
                authenticated |= mentions_auth(method);
                endpoints.extend(extract_endpoints(language, method));
            }
        }

        if endpoints.is_empty() {
            continue;
        }
        let name = construct_service_name(slice);
        let auth = authenticated.then_some(true);
        let record = services
            .entry(name)
            .or_insert_with(|| ServiceRecord::new(auth));
        if authenticated {
            record.mark_authenticated();
        }
        record.endpoints.extend(endpoints);
    }
}

/// 사용자 정의 타입에서 서비스를 탐지합니다.
pub fn detect_services_from_udts(
    language: Language,
    udts: &[UserDefinedType],
    services: &mut ServiceMap,
) {
    if !rules_for(language).detects_udt_services() {
        return;
    }
    for udt in udts {
        let lowered = udt.name.to_lowercase();
        if !UDT_ROUTE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            continue;
        }
        let Some(field_name) = udt
            .fields
            .first()
            .and_then(|f| f.name.as_deref())
            .filter(|n| n.chars().count() > 1)
        else {
            continue;
        };
        let endpoints = extract_endpoints(language, field_name);
        if endpoints.is_empty() {
            continue;
        }
        let name = match udt.file_name.as_deref() {
            Some(file) => format!("{}-service", file_stem_like(&file.replace(".py", ""))),
            None => "service".to_owned(),
        };
        debug!(udt = %udt.name, service = %name, "service detected from user defined type");
        services
            .entry(name)
            .or_insert_with(|| ServiceRecord::new(Some(false)))
            .endpoints
            .extend(endpoints);
    }
}

/// 슬라이스의 정규화된 이름(없으면 파일명)에서 서비스 이름을 만듭니다.
///
/// 결과는 항상 `service`로 끝납니다.
pub fn construct_service_name(slice: &ObjectSlice) -> String {
    let mut name = if let Some(full_name) = slice.full_name.as_deref().filter(|n| !n.is_empty()) {
        full_name
            .split(':')
            .next()
            .unwrap_or_default()
            .replace('.', "-")
    } else if let Some(file) = slice.file_name.as_deref().filter(|n| !n.is_empty()) {
        file_stem_like(file)
            .split('.')
            .next()
            .unwrap_or_default()
            .to_owned()
    } else {
        "service".to_owned()
    };
    if !name.ends_with("service") {
        name.push_str("-service");
    }
    name
}

/// 디렉터리를 뗀 파일 이름
fn file_stem_like(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}
