//! CycloneDX SBOM 읽기/쓰기
//!
//! 문서를 [`BomDocument`]로 파싱하고, 집계된 증거를 [`apply_evidence`]로 기록한 뒤
//! [`render_bom`]으로 다시 직렬화합니다. 엔진이 모르는 필드는 그대로 보존됩니다.
//!
//! # 지원 버전
//!
//! `evidence.occurrences`/`evidence.callstack`이 도입된 CycloneDX 1.5 이상만
//! 받아들입니다. 1.6 미만 문서에는 암호 자산이 `data` 컴포넌트로 기록됩니다.

mod evidence;
mod frames;
mod model;
mod writer;

pub use evidence::{Callstack, ComponentEvidence, EvidenceUpdate, Frame, Occurrence, merge_evidence};
pub use frames::pick_frames;
pub use model::{BomDocument, Component, Dependency, Metadata, Property, Service, parse_spec_version};
pub use writer::{SliceAnnotation, WriteSummary, apply_evidence};

use serde_json::Value;

use crate::error::EvidenceError;

/// 증거 기록에 필요한 최소 specVersion
pub const MIN_SPEC_VERSION: (u32, u32) = (1, 5);

/// SBOM JSON 텍스트를 파싱합니다.
///
/// `path`는 에러 메시지에만 쓰입니다.
pub fn parse_bom(path: &str, text: &str) -> Result<BomDocument, EvidenceError> {
    serde_json::from_str(text).map_err(|e| EvidenceError::SbomParse {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// specVersion이 1.5 이상인지 확인하고 파싱된 버전을 돌려줍니다.
pub fn check_spec_version(doc: &BomDocument) -> Result<(u32, u32), EvidenceError> {
    let raw = doc.spec_version.clone().unwrap_or_default();
    match doc.spec_version_tuple() {
        Some(version) if version >= MIN_SPEC_VERSION => Ok(version),
        _ => Err(EvidenceError::UnsupportedSpecVersion { version: raw }),
    }
}

/// 문서를 JSON 값으로 변환합니다 (후처리기 입력).
pub fn to_value(path: &str, doc: &BomDocument) -> Result<Value, EvidenceError> {
    serde_json::to_value(doc).map_err(|e| EvidenceError::SbomWrite {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// JSON 값을 들여쓰기된 문자열로 직렬화합니다.
pub fn render_bom(path: &str, value: &Value) -> Result<String, EvidenceError> {
    serde_json::to_string_pretty(value).map_err(|e| EvidenceError::SbomWrite {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}
