//! 슬라이스 리더 -- 분석기 출력 JSON을 타입이 있는 구조로 적재
//!
//! 검증은 세 가지뿐입니다: 파일이 존재하는지, 크기가 허용 범위인지, JSON으로
//! 파싱되는지. 어느 단계에서 실패해도 에러를 올리지 않고 [`SliceLoadResult`]의
//! 부재 변형으로 돌려주므로, 호출자는 "이 종류의 증거 없음"으로 처리하고 계속 진행합니다.
//!
//! usages/reachables 슬라이스는 분석기가 내보내는 빈 placeholder를 거르기 위해
//! 최소 크기(`min_bytes`) 이하이면 [`SliceLoadResult::TooSmall`]이 됩니다.

pub mod dataflow;
pub mod reachables;
pub mod semantics;
pub mod usages;

pub use dataflow::{DataFlowGraph, DataFlowNode, DataFlowSlice, NodeId};
pub use reachables::{ReachableFlow, ReachableNode, ReachablesSlice};
pub use semantics::{FileIndex, ModuleInfo, SemanticsSlice};
pub use usages::{Call, Field, ObjectRef, ObjectSlice, Usage, UsageSlice, UserDefinedType};

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use purlscope_core::error::SliceError;
use purlscope_core::metrics as m;

/// 슬라이스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKind {
    /// 파일별 구문 사용 기록
    Usages,
    /// 오염 경로 그래프
    DataFlow,
    /// 진입점 도달성 그래프
    Reachables,
    /// Swift 모듈/심볼 색인
    Semantics,
}

impl SliceKind {
    /// 종류 이름 (메트릭 레이블, annotation 텍스트에 사용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usages => "usages",
            Self::DataFlow => "data-flow",
            Self::Reachables => "reachables",
            Self::Semantics => "semantics",
        }
    }

    /// placeholder 최소 크기 검사를 적용하는지
    pub fn requires_min_size(&self) -> bool {
        matches!(self, Self::Usages | Self::Reachables)
    }
}

impl fmt::Display for SliceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 슬라이스 파일 크기 제한
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLimits {
    /// 이 크기 이하이면 placeholder로 간주 (usages/reachables)
    pub min_bytes: u64,
    /// 이 크기를 넘으면 읽지 않음
    pub max_bytes: u64,
}

impl Default for SliceLimits {
    fn default() -> Self {
        Self {
            min_bytes: 1024,
            max_bytes: 512 * 1024 * 1024,
        }
    }
}

/// 적재에 성공한 슬라이스
#[derive(Debug, Clone)]
pub struct LoadedSlice<T> {
    /// 파싱된 데이터
    pub data: T,
    /// 원문 JSON (annotation 첨부용)
    pub raw: String,
    /// 파일 경로
    pub path: String,
}

/// 슬라이스 적재 결과
#[derive(Debug, Clone)]
pub enum SliceLoadResult<T> {
    /// 적재 성공
    Loaded(LoadedSlice<T>),
    /// 경로가 주어지지 않았거나 파일이 없음
    Missing,
    /// placeholder 크기 이하
    TooSmall {
        /// 파일 크기 (바이트)
        size: u64,
    },
    /// 최대 크기 초과
    TooLarge {
        /// 파일 크기 (바이트)
        size: u64,
    },
    /// 읽기 또는 JSON 파싱 실패
    Invalid {
        /// 실패 사유
        reason: String,
    },
}

impl<T> SliceLoadResult<T> {
    /// 적재된 슬라이스 참조
    pub fn loaded(&self) -> Option<&LoadedSlice<T>> {
        match self {
            Self::Loaded(slice) => Some(slice),
            _ => None,
        }
    }

    /// 적재된 슬라이스로 변환
    pub fn into_loaded(self) -> Option<LoadedSlice<T>> {
        match self {
            Self::Loaded(slice) => Some(slice),
            _ => None,
        }
    }

    /// 적재 성공 여부
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// 결과 이름 (메트릭 레이블)
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Missing => "missing",
            Self::TooSmall { .. } => "too_small",
            Self::TooLarge { .. } => "too_large",
            Self::Invalid { .. } => "invalid",
        }
    }
}

/// 슬라이스 파일을 읽고 파싱합니다.
///
/// 파일 I/O는 `tokio::fs`로 수행합니다. 실패는 모두 부재 변형으로 변환됩니다.
pub async fn load_slice<T: DeserializeOwned>(
    kind: SliceKind,
    path: Option<&str>,
    limits: SliceLimits,
) -> SliceLoadResult<T> {
    let result = match path {
        None => {
            debug!(kind = %kind, "no slice path configured");
            SliceLoadResult::Missing
        }
        Some(path) => load_from_path(kind, path, limits).await,
    };

    metrics::counter!(
        m::SLICES_LOADED_TOTAL,
        m::LABEL_SLICE_KIND => kind.as_str(),
        m::LABEL_RESULT => result.outcome()
    )
    .increment(1);

    result
}

async fn load_from_path<T: DeserializeOwned>(
    kind: SliceKind,
    path: &str,
    limits: SliceLimits,
) -> SliceLoadResult<T> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => {
            warn!(kind = %kind, path, "slice path is not a file, treating as no evidence");
            return SliceLoadResult::Missing;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(kind = %kind, path, "slice file not found, treating as no evidence");
            return SliceLoadResult::Missing;
        }
        Err(e) => {
            let err = SliceError::Read {
                path: path.to_owned(),
                reason: e.to_string(),
            };
            warn!(kind = %kind, error = %err, "failed to stat slice file");
            return SliceLoadResult::Invalid {
                reason: err.to_string(),
            };
        }
    };

    let size = metadata.len();
    if size > limits.max_bytes {
        warn!(kind = %kind, path, size, max = limits.max_bytes, "slice file too large, skipping");
        return SliceLoadResult::TooLarge { size };
    }
    if kind.requires_min_size() && size <= limits.min_bytes {
        warn!(kind = %kind, path, size, min = limits.min_bytes, "slice file looks like an empty placeholder, skipping");
        return SliceLoadResult::TooSmall { size };
    }

    match read_and_parse(path).await {
        Ok((data, raw)) => {
            info!(kind = %kind, path, size, "slice loaded");
            SliceLoadResult::Loaded(LoadedSlice {
                data,
                raw,
                path: path.to_owned(),
            })
        }
        Err(err) => {
            warn!(kind = %kind, error = %err, "failed to load slice, treating as no evidence");
            SliceLoadResult::Invalid {
                reason: err.to_string(),
            }
        }
    }
}

async fn read_and_parse<T: DeserializeOwned>(path: &str) -> Result<(T, String), SliceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SliceError::Read {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
    let data = serde_json::from_str(&raw).map_err(|e| SliceError::Invalid {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    Ok((data, raw))
}
