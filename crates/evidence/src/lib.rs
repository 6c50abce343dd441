#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`EvidenceError`)
//! - [`config`]: 실행 설정 (`EngineConfig`, 빌더)
//! - [`types`]: 언어 태그와 공용 타입 (`Language`, `UserDefinedTypes`)
//! - [`symbol`]: 언어별 심볼 규칙 (`SymbolRules`, `is_filterable_type`)
//! - [`resolver`]: purl 해석 (`PurlResolver`, `ImportMap`, 네임스페이스 인덱스)
//! - [`slices`]: 슬라이스 모델과 적재 (`load_slice`, `SliceLoadResult`)
//! - [`services`]: 서비스/엔드포인트 탐지
//! - [`crypto`]: 내장 암호 알고리즘 탐지기
//! - [`aggregator`]: 증거 집계 (`EvidenceAggregator`, `EvidenceMaps`)
//! - [`sbom`]: CycloneDX 모델과 기록 (`apply_evidence`)
//! - [`engine`]: 오케스트레이터 (`EvidenceEngine`, `EvidenceEngineBuilder`)

pub mod aggregator;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod sbom;
pub mod services;
pub mod slices;
pub mod symbol;
pub mod types;

// --- Public API Re-exports ---

// Engine
pub use engine::{EvidenceEngine, EvidenceEngineBuilder, EvidenceReport, EvidenceStatus};

// Configuration
pub use config::{EngineConfig, EngineConfigBuilder};

// Error
pub use error::EvidenceError;

// Types
pub use types::{Language, UserDefinedTypes, purl_to_language};

// Resolver
pub use resolver::{
    ImportMap, MemoryNamespaceIndex, PurlResolver, ResolutionResult, SqliteNamespaceIndex,
};

// Aggregation
pub use aggregator::{EvidenceAggregator, EvidenceMaps, SbomSeed, seed_from_components};

// Slices
pub use slices::{SliceKind, SliceLimits, SliceLoadResult, load_slice};

// SBOM
pub use sbom::{BomDocument, WriteSummary, apply_evidence};

// Crypto
pub use crypto::BuiltinCryptoDetector;
