//! 컴포넌트 증거 모델과 병합 함수
//!
//! occurrence, call stack은 모두 [`ComponentEvidence`] 하나로 표현되고,
//! 새 증거는 [`merge_evidence`]를 통해서만 기존 값에 반영됩니다.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `evidence` 필드
///
/// `identity`, `licenses` 등 엔진이 다루지 않는 필드는 `extra`에 보존됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<Vec<Occurrence>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callstack: Option<Callstack>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 사용 위치
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub location: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 호출 스택
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Callstack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 호출 스택 프레임
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,
    #[serde(default)]
    pub full_filename: String,
}

/// 한 컴포넌트에 반영할 새 증거
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceUpdate {
    /// `file#line` 위치. 비어 있으면 기존 occurrence 유지
    pub locations: BTreeSet<String>,
    /// 선택된 호출 스택. `None`이면 기존 callstack 유지
    pub frames: Option<Vec<Frame>>,
}

impl EvidenceUpdate {
    /// 반영할 내용이 없는지
    pub fn is_empty(&self) -> bool {
        self.locations.iter().all(String::is_empty) && self.frames.is_none()
    }
}

/// 기존 증거에 새 증거를 병합합니다.
///
/// - 위치가 있으면 occurrence 목록을 정렬/중복 제거된 새 목록으로 교체
/// - 프레임이 있으면 callstack의 frames를 교체 (다른 callstack 필드는 유지)
/// - 둘 다 없으면 기존 값을 그대로 반환
pub fn merge_evidence(
    existing: Option<ComponentEvidence>,
    update: &EvidenceUpdate,
) -> Option<ComponentEvidence> {
    if update.is_empty() {
        return existing;
    }
    let mut evidence = existing.unwrap_or_default();

    let occurrences: Vec<Occurrence> = update
        .locations
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| Occurrence {
            location: l.clone(),
            extra: Map::new(),
        })
        .collect();
    if !occurrences.is_empty() {
        evidence.occurrences = Some(occurrences);
    }

    if let Some(frames) = &update.frames {
        let mut callstack = evidence.callstack.take().unwrap_or_default();
        callstack.frames = Some(frames.clone());
        evidence.callstack = Some(callstack);
    }

    Some(evidence)
}
