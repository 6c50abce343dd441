//! usages 슬라이스 타입

use serde::Deserialize;

/// usages 슬라이스 최상위 객체
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageSlice {
    /// 파일/메서드 단위 객체 슬라이스
    pub object_slices: Vec<ObjectSlice>,
    /// 코드베이스에서 선언된 타입/함수
    pub user_defined_types: Vec<UserDefinedType>,
}

impl UsageSlice {
    /// 사용자 정의 타입 이름 집합
    pub fn user_defined_type_names(&self) -> crate::types::UserDefinedTypes {
        self.user_defined_types
            .iter()
            .map(|udt| udt.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// 하나의 구문 단위 (파일 + 줄 + 시그니처)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectSlice {
    pub code: Option<String>,
    pub full_name: Option<String>,
    pub signature: Option<String>,
    pub file_name: Option<String>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
    pub usages: Vec<Usage>,
}

impl ObjectSlice {
    /// 실제 소스 파일에 속하는 슬라이스인지 (라이브러리 코드는 파일명이 없음)
    pub fn has_source_file(&self) -> bool {
        match self.file_name.as_deref().map(str::trim) {
            None | Some("") | Some("<empty>") | Some("<unknown>") => false,
            Some(_) => true,
        }
    }
}

/// 변수 하나의 사용 기록
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Usage {
    pub target_obj: Option<ObjectRef>,
    pub defined_by: Option<ObjectRef>,
    pub invoked_calls: Vec<Call>,
    pub arg_to_calls: Vec<Call>,
    pub procedures: Vec<Call>,
    pub fields: Vec<Field>,
}

impl Usage {
    /// `targetObj` 또는 `definedBy`의 줄 번호
    pub fn line_number(&self) -> Option<u64> {
        self.target_obj
            .as_ref()
            .and_then(|o| o.line_number)
            .or_else(|| self.defined_by.as_ref().and_then(|o| o.line_number))
    }

    /// `invokedCalls`, `argToCalls`, `procedures`를 순서대로 순회
    pub fn all_calls(&self) -> impl Iterator<Item = &Call> {
        self.invoked_calls
            .iter()
            .chain(self.arg_to_calls.iter())
            .chain(self.procedures.iter())
    }
}

/// 대상 객체 또는 정의 지점
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectRef {
    pub name: Option<String>,
    pub type_full_name: Option<String>,
    pub resolved_method: Option<String>,
    pub is_external: Option<bool>,
    pub label: Option<String>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
}

/// 호출 기록
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Call {
    pub call_name: Option<String>,
    pub resolved_method: Option<String>,
    pub param_types: Vec<String>,
    pub return_type: Option<String>,
    pub is_external: Option<bool>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
}

/// 필드
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    pub name: Option<String>,
    pub type_full_name: Option<String>,
    pub is_external: Option<bool>,
    pub line_number: Option<u64>,
}

/// 사용자 정의 타입
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDefinedType {
    pub name: String,
    pub fields: Vec<Field>,
    pub procedures: Vec<Call>,
    pub file_name: Option<String>,
    pub line_number: Option<u64>,
}
