#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DetectorError, IndexError, PurlscopeError, SbomError, SliceError};

// 설정
pub use config::PurlscopeConfig;

// 파이프라인 trait
pub use pipeline::{BomPostProcessor, CryptoDetector, IdentityPostProcessor, NamespaceIndex};

// 도메인 타입
pub use types::CryptoAlgorithm;
