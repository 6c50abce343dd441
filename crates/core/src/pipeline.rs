//! 파이프라인 trait -- 외부 협력자 확장 포인트 정의

use crate::error::PurlscopeError;
use crate::types::CryptoAlgorithm;

/// 심볼 부분 문자열로 패키지를 찾는 네임스페이스 인덱스
///
/// 파일, 임베디드 DB, 원격 서비스 어느 것이든 이 trait만 구현하면 됩니다.
pub trait NamespaceIndex: Send + Sync {
    /// 인덱스 이름
    fn name(&self) -> &str;

    /// `needle`을 포함하는 심볼을 선언한 패키지의 purl 목록
    fn find(&self, needle: &str) -> Result<Vec<String>, PurlscopeError>;
}

/// 코드 조각에서 암호 알고리즘을 찾아내는 탐지기
pub trait CryptoDetector: Send + Sync {
    /// 탐지기 이름
    fn name(&self) -> &str;

    /// 코드 텍스트에서 알고리즘 목록을 탐지
    fn detect(&self, code: &str) -> Result<Vec<CryptoAlgorithm>, PurlscopeError>;
}

/// 증거가 반영된 SBOM 문서를 마지막으로 다듬는 후처리기
pub trait BomPostProcessor: Send + Sync {
    /// 후처리기 이름
    fn name(&self) -> &str;

    /// 문서를 받아 후처리된 문서를 반환
    fn process(&self, bom: serde_json::Value) -> Result<serde_json::Value, PurlscopeError>;
}

/// 문서를 그대로 돌려주는 기본 후처리기
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityPostProcessor;

impl BomPostProcessor for IdentityPostProcessor {
    fn name(&self) -> &str {
        "identity"
    }

    fn process(&self, bom: serde_json::Value) -> Result<serde_json::Value, PurlscopeError> {
        Ok(bom)
    }
}
