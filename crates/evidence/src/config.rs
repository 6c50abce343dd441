//! 증거 엔진 설정
//!
//! [`EngineConfig`]는 core의 [`EvidenceConfig`](purlscope_core::config::EvidenceConfig)를
//! 확장하여 실행 단위 필드(SBOM 입출력 경로, 슬라이스 파일 경로)를 추가합니다.
//!
//! # 사용 예시
//!
//! ```
//! use purlscope_evidence::{EngineConfigBuilder, Language};
//!
//! let config = EngineConfigBuilder::new()
//!     .input("bom.json")
//!     .language(Language::JavaScript)
//!     .usages_slice_path("usages.slices.json")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.output, "bom.json");
//! ```

use serde::{Deserialize, Serialize};

use purlscope_core::config::MAX_SLICE_BYTES_LIMIT;

use crate::error::EvidenceError;
use crate::types::Language;

/// 경로 필드 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// 증거 엔진 설정
///
/// core의 `EvidenceConfig`에서 파생되며, 한 번의 실행에 필요한 경로를 포함합니다.
///
/// # 필드
///
/// - **input / output**: SBOM 입력 및 출력 경로 (output이 비면 input에 덮어씀)
/// - **language**: 분석 대상 언어
/// - **db_path**: 네임스페이스 인덱스 경로 (비어 있으면 import 테이블만 사용)
/// - **\*_slice_path**: 슬라이스 파일 경로 (없으면 해당 종류의 증거 없음)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 입력 SBOM 경로
    pub input: String,
    /// 출력 SBOM 경로
    pub output: String,
    /// 분석 대상 언어
    pub language: Language,
    /// 네임스페이스 인덱스(SQLite) 경로
    pub db_path: String,
    /// usages 슬라이스 경로
    pub usages_slice_path: Option<String>,
    /// data-flow 슬라이스 경로
    pub data_flow_slice_path: Option<String>,
    /// reachables 슬라이스 경로
    pub reachables_slice_path: Option<String>,
    /// semantics 슬라이스 경로 (Swift)
    pub semantics_slice_path: Option<String>,
    /// data-flow 증거 수집 여부
    pub with_data_flow: bool,
    /// reachables 증거 수집 여부
    pub with_reachables: bool,
    /// 암호 알고리즘 컴포넌트 추가 여부
    pub include_crypto: bool,
    /// 슬라이스 원문 annotation 첨부 여부
    pub annotate: bool,
    /// placeholder 판정 기준 크기 (바이트)
    pub min_slice_bytes: u64,
    /// 슬라이스 최대 크기 (바이트)
    pub max_slice_bytes: u64,
    /// 외부 암호 알고리즘 카탈로그 경로
    pub crypto_catalog_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_core(&purlscope_core::config::EvidenceConfig::default())
    }
}

impl EngineConfig {
    /// core의 `EvidenceConfig`에서 엔진 설정을 생성합니다.
    ///
    /// 경로 필드는 비어 있는 상태로 시작하며, 알 수 없는 언어 태그는 Java로 대체됩니다.
    pub fn from_core(core: &purlscope_core::config::EvidenceConfig) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            language: Language::from_str_loose(&core.language).unwrap_or(Language::Java),
            db_path: core.db_path.clone(),
            usages_slice_path: None,
            data_flow_slice_path: None,
            reachables_slice_path: None,
            semantics_slice_path: None,
            with_data_flow: core.with_data_flow,
            with_reachables: core.with_reachables,
            include_crypto: core.include_crypto,
            annotate: core.annotate,
            min_slice_bytes: core.min_slice_bytes,
            max_slice_bytes: core.max_slice_bytes,
            crypto_catalog_path: core.crypto_catalog_path.clone(),
        }
    }

    /// 실제로 기록할 출력 경로
    pub fn output_path(&self) -> &str {
        if self.output.is_empty() {
            &self.input
        } else {
            &self.output
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `input`: 비어 있으면 안 됨
    /// - `max_slice_bytes`: 1 이상, 상한 이하
    /// - `min_slice_bytes`: `max_slice_bytes`보다 작아야 함
    /// - 모든 경로: `..` 컴포넌트 금지, 길이 제한
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.input.is_empty() {
            return Err(EvidenceError::Config {
                field: "input".to_owned(),
                reason: "input sbom path must not be empty".to_owned(),
            });
        }

        if self.max_slice_bytes == 0 || self.max_slice_bytes > MAX_SLICE_BYTES_LIMIT {
            return Err(EvidenceError::Config {
                field: "max_slice_bytes".to_owned(),
                reason: format!("must be 1-{MAX_SLICE_BYTES_LIMIT}"),
            });
        }

        if self.min_slice_bytes >= self.max_slice_bytes {
            return Err(EvidenceError::Config {
                field: "min_slice_bytes".to_owned(),
                reason: "must be less than max_slice_bytes".to_owned(),
            });
        }

        let paths = [
            ("input", Some(self.input.as_str())),
            ("output", Some(self.output.as_str())),
            ("db_path", Some(self.db_path.as_str())),
            ("usages_slice_path", self.usages_slice_path.as_deref()),
            ("data_flow_slice_path", self.data_flow_slice_path.as_deref()),
            ("reachables_slice_path", self.reachables_slice_path.as_deref()),
            ("semantics_slice_path", self.semantics_slice_path.as_deref()),
            ("crypto_catalog_path", Some(self.crypto_catalog_path.as_str())),
        ];
        for (field, path) in paths {
            if let Some(path) = path {
                validate_path(field, path)?;
            }
        }

        Ok(())
    }
}

fn validate_path(field: &str, path: &str) -> Result<(), EvidenceError> {
    if path.len() > MAX_PATH_LEN {
        return Err(EvidenceError::Config {
            field: field.to_owned(),
            reason: format!("path exceeds maximum length {MAX_PATH_LEN}"),
        });
    }
    if std::path::Path::new(path)
        .components()
        .any(|c| c == std::path::Component::ParentDir)
    {
        return Err(EvidenceError::Config {
            field: field.to_owned(),
            reason: format!("path '{path}' contains path traversal pattern '..'"),
        });
    }
    Ok(())
}

/// [`EngineConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// core 설정에서 시작하는 빌더를 생성합니다.
    pub fn from_core(core: &purlscope_core::config::EvidenceConfig) -> Self {
        Self {
            config: EngineConfig::from_core(core),
        }
    }

    /// 입력 SBOM 경로를 설정합니다.
    pub fn input(mut self, path: impl Into<String>) -> Self {
        self.config.input = path.into();
        self
    }

    /// 출력 SBOM 경로를 설정합니다.
    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.config.output = path.into();
        self
    }

    /// 분석 대상 언어를 설정합니다.
    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    /// 네임스페이스 인덱스 경로를 설정합니다.
    pub fn db_path(mut self, path: impl Into<String>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// usages 슬라이스 경로를 설정합니다.
    pub fn usages_slice_path(mut self, path: impl Into<String>) -> Self {
        self.config.usages_slice_path = Some(path.into());
        self
    }

    /// data-flow 슬라이스 경로를 설정합니다.
    pub fn data_flow_slice_path(mut self, path: impl Into<String>) -> Self {
        self.config.data_flow_slice_path = Some(path.into());
        self
    }

    /// reachables 슬라이스 경로를 설정합니다.
    pub fn reachables_slice_path(mut self, path: impl Into<String>) -> Self {
        self.config.reachables_slice_path = Some(path.into());
        self
    }

    /// semantics 슬라이스 경로를 설정합니다.
    pub fn semantics_slice_path(mut self, path: impl Into<String>) -> Self {
        self.config.semantics_slice_path = Some(path.into());
        self
    }

    /// data-flow 증거 수집 여부를 설정합니다.
    pub fn with_data_flow(mut self, enabled: bool) -> Self {
        self.config.with_data_flow = enabled;
        self
    }

    /// reachables 증거 수집 여부를 설정합니다.
    pub fn with_reachables(mut self, enabled: bool) -> Self {
        self.config.with_reachables = enabled;
        self
    }

    /// 암호 알고리즘 컴포넌트 추가 여부를 설정합니다.
    pub fn include_crypto(mut self, enabled: bool) -> Self {
        self.config.include_crypto = enabled;
        self
    }

    /// annotation 첨부 여부를 설정합니다.
    pub fn annotate(mut self, enabled: bool) -> Self {
        self.config.annotate = enabled;
        self
    }

    /// placeholder 판정 기준 크기를 설정합니다.
    pub fn min_slice_bytes(mut self, bytes: u64) -> Self {
        self.config.min_slice_bytes = bytes;
        self
    }

    /// 슬라이스 최대 크기를 설정합니다.
    pub fn max_slice_bytes(mut self, bytes: u64) -> Self {
        self.config.max_slice_bytes = bytes;
        self
    }

    /// 외부 암호 알고리즘 카탈로그 경로를 설정합니다.
    pub fn crypto_catalog_path(mut self, path: impl Into<String>) -> Self {
        self.config.crypto_catalog_path = path.into();
        self
    }

    /// 설정을 빌드합니다. 유효하지 않으면 에러를 반환합니다.
    pub fn build(self) -> Result<EngineConfig, EvidenceError> {
        let mut config = self.config;
        if config.output.is_empty() {
            config.output = config.input.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
