//! 설정 관리 -- purlscope.toml 파싱 및 런타임 설정
//!
//! [`PurlscopeConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`PURLSCOPE_EVIDENCE_LANGUAGE=java` 형식)
//! 3. 설정 파일 (`purlscope.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), purlscope_core::error::PurlscopeError> {
//! use purlscope_core::config::PurlscopeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = PurlscopeConfig::load("purlscope.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = PurlscopeConfig::parse("[evidence]\nlanguage = \"python\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, PurlscopeError};

/// 설정 파일과 CLI가 받아들이는 언어 태그
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "java",
    "jar",
    "javascript",
    "js",
    "typescript",
    "ts",
    "python",
    "py",
    "php",
    "ruby",
    "rb",
    "c",
    "cpp",
    "c++",
    "swift",
];

/// 슬라이스 파일 최대 허용 크기 상한 (2 GiB)
pub const MAX_SLICE_BYTES_LIMIT: u64 = 2 * 1024 * 1024 * 1024;

/// purlscope 통합 설정
///
/// `purlscope.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurlscopeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 증거 수집 설정
    #[serde(default)]
    pub evidence: EvidenceConfig,
}

impl PurlscopeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PurlscopeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PurlscopeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PurlscopeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PurlscopeError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, PurlscopeError> {
        toml::from_str(toml_str).map_err(|e| {
            PurlscopeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PURLSCOPE_{SECTION}_{FIELD}`
    /// 예: `PURLSCOPE_EVIDENCE_DB_PATH=/tmp/ns.db`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "PURLSCOPE_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "PURLSCOPE_GENERAL_LOG_FORMAT",
        );

        // Evidence
        override_string(&mut self.evidence.language, "PURLSCOPE_EVIDENCE_LANGUAGE");
        override_string(&mut self.evidence.db_path, "PURLSCOPE_EVIDENCE_DB_PATH");
        override_bool(
            &mut self.evidence.with_data_flow,
            "PURLSCOPE_EVIDENCE_WITH_DATA_FLOW",
        );
        override_bool(
            &mut self.evidence.with_reachables,
            "PURLSCOPE_EVIDENCE_WITH_REACHABLES",
        );
        override_bool(
            &mut self.evidence.include_crypto,
            "PURLSCOPE_EVIDENCE_INCLUDE_CRYPTO",
        );
        override_bool(&mut self.evidence.annotate, "PURLSCOPE_EVIDENCE_ANNOTATE");
        override_u64(
            &mut self.evidence.min_slice_bytes,
            "PURLSCOPE_EVIDENCE_MIN_SLICE_BYTES",
        );
        override_u64(
            &mut self.evidence.max_slice_bytes,
            "PURLSCOPE_EVIDENCE_MAX_SLICE_BYTES",
        );
        override_string(
            &mut self.evidence.crypto_catalog_path,
            "PURLSCOPE_EVIDENCE_CRYPTO_CATALOG_PATH",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PurlscopeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let language = self.evidence.language.to_lowercase();
        if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "evidence.language".to_owned(),
                reason: format!("must be one of: {}", SUPPORTED_LANGUAGES.join(", ")),
            }
            .into());
        }

        if self.evidence.max_slice_bytes == 0
            || self.evidence.max_slice_bytes > MAX_SLICE_BYTES_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "evidence.max_slice_bytes".to_owned(),
                reason: format!("must be 1-{MAX_SLICE_BYTES_LIMIT}"),
            }
            .into());
        }

        if self.evidence.min_slice_bytes >= self.evidence.max_slice_bytes {
            return Err(ConfigError::InvalidValue {
                field: "evidence.min_slice_bytes".to_owned(),
                reason: "must be smaller than evidence.max_slice_bytes".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 증거 수집 설정 (`[evidence]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// 분석 대상 언어 태그
    pub language: String,
    /// 네임스페이스 인덱스(SQLite) 경로. 비어 있으면 인덱스 조회를 하지 않음
    pub db_path: String,
    /// 데이터 흐름 슬라이스 사용 여부
    pub with_data_flow: bool,
    /// 도달성 슬라이스 사용 여부
    pub with_reachables: bool,
    /// 암호 알고리즘(CBOM) 증거 포함 여부
    pub include_crypto: bool,
    /// 슬라이스 원문을 annotation으로 첨부할지 여부
    pub annotate: bool,
    /// 이보다 작거나 같은 usages/reachables 슬라이스는 빈 출력으로 간주 (바이트)
    pub min_slice_bytes: u64,
    /// 슬라이스 파일 최대 크기 (바이트)
    pub max_slice_bytes: u64,
    /// 외부 암호 알고리즘 카탈로그(JSON) 경로. 비어 있으면 내장 카탈로그 사용
    pub crypto_catalog_path: String,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            language: "java".to_owned(),
            db_path: String::new(),
            with_data_flow: false,
            with_reachables: false,
            include_crypto: false,
            annotate: false,
            min_slice_bytes: 1024,
            max_slice_bytes: 512 * 1024 * 1024, // 512MB
            crypto_catalog_path: String::new(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
