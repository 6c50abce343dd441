//! 증거 엔진 에러 타입
//!
//! [`EvidenceError`]는 증거 엔진 안에서 실행 전체를 멈추게 하는 에러만 담습니다.
//! 슬라이스 누락, 인덱스 조회 실패, 탐지기 실패처럼 "증거가 없다"로 귀결되는
//! 상황은 에러가 아니라 각 단계의 결과 타입(`SliceLoadResult`, `ResolutionResult`)으로
//! 표현됩니다.
//!
//! # 에러 카테고리
//!
//! - **SBOM 문서**: `SbomRead`, `SbomParse`, `UnsupportedSpecVersion`, `SbomWrite`
//! - **설정**: `Config`
//! - **외부 협력자 초기화**: `Index`, `Detector`
//! - **태스크 실행**: `Task`

use purlscope_core::error::{
    ConfigError, DetectorError, IndexError, PurlscopeError, SbomError,
};

/// 증거 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    /// SBOM 파일 읽기 실패
    #[error("failed to read sbom: {path}: {source}")]
    SbomRead {
        /// SBOM 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// SBOM 문서 파싱 실패
    #[error("failed to parse sbom: {path}: {reason}")]
    SbomParse {
        /// SBOM 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 증거 기록을 지원하지 않는 CycloneDX 버전
    #[error("unsupported cyclonedx spec version '{version}' (1.5 or newer required)")]
    UnsupportedSpecVersion {
        /// 문서의 specVersion 값
        version: String,
    },

    /// SBOM 기록 실패
    #[error("failed to write sbom: {path}: {reason}")]
    SbomWrite {
        /// 출력 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 네임스페이스 인덱스를 열거나 적재하지 못함
    #[error("namespace index error: {0}")]
    Index(String),

    /// 암호 알고리즘 탐지기 초기화 실패
    #[error("crypto detector error: {0}")]
    Detector(String),

    /// 블로킹 태스크 실행 실패
    #[error("task error: {0}")]
    Task(String),
}

impl From<EvidenceError> for PurlscopeError {
    fn from(err: EvidenceError) -> Self {
        match err {
            EvidenceError::SbomRead { source, .. } => PurlscopeError::Io(source),
            EvidenceError::SbomParse { path, reason } => {
                PurlscopeError::Sbom(SbomError::ParseFailed(format!("{path}: {reason}")))
            }
            EvidenceError::UnsupportedSpecVersion { version } => {
                PurlscopeError::Sbom(SbomError::UnsupportedVersion(version))
            }
            EvidenceError::SbomWrite { path, reason } => {
                PurlscopeError::Sbom(SbomError::WriteFailed(format!("{path}: {reason}")))
            }
            EvidenceError::Config { field, reason } => {
                PurlscopeError::Config(ConfigError::InvalidValue { field, reason })
            }
            EvidenceError::Index(msg) => PurlscopeError::Index(IndexError::Open(msg)),
            EvidenceError::Detector(msg) => PurlscopeError::Detector(DetectorError::Catalog(msg)),
            EvidenceError::Task(msg) => {
                PurlscopeError::Sbom(SbomError::WriteFailed(format!("task error: {msg}")))
            }
        }
    }
}
