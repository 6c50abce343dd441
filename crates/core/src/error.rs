//! 에러 타입 -- 도메인별 에러 정의

/// purlscope 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PurlscopeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 슬라이스 파일 처리 에러
    #[error("slice error: {0}")]
    Slice(#[from] SliceError),

    /// 네임스페이스 인덱스 에러
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// 암호 알고리즘 탐지기 에러
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    /// SBOM 문서 처리 에러
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 슬라이스 파일 에러
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    /// 파일 읽기 실패
    #[error("failed to read slice {path}: {reason}")]
    Read { path: String, reason: String },

    /// JSON 파싱 실패
    #[error("invalid slice {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// 네임스페이스 인덱스 에러
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// 저장소 열기 실패
    #[error("failed to open index: {0}")]
    Open(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),

    /// 적재 실패
    #[error("import failed: {0}")]
    Import(String),
}

/// 암호 알고리즘 탐지기 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// 알고리즘 카탈로그 로딩 실패
    #[error("catalog load failed: {0}")]
    Catalog(String),

    /// 탐지 실패
    #[error("detection failed: {0}")]
    Failed(String),
}

/// SBOM 문서 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// 문서 파싱 실패
    #[error("sbom parse failed: {0}")]
    ParseFailed(String),

    /// 지원하지 않는 스펙 버전
    #[error("unsupported spec version: {0}")]
    UnsupportedVersion(String),

    /// 문서 기록 실패
    #[error("sbom write failed: {0}")]
    WriteFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_top_level() {
        let err: PurlscopeError = ConfigError::InvalidValue {
            field: "evidence.language".to_owned(),
            reason: "unknown".to_owned(),
        }
        .into();
        assert!(matches!(err, PurlscopeError::Config(_)));
        assert!(err.to_string().contains("evidence.language"));
    }

    #[test]
    fn index_error_display() {
        let err = IndexError::Query("no such table: namespaces".to_owned());
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn slice_error_display_includes_path() {
        let err = SliceError::Invalid {
            path: "usages.slices.json".to_owned(),
            reason: "expected value at line 1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("usages.slices.json"));
        assert!(msg.contains("line 1"));
    }
}
