//! 도메인 타입 -- 확장 trait 사이에서 주고받는 값

use serde::{Deserialize, Serialize};

/// 탐지된 암호 알고리즘
///
/// `reference`는 생성되는 cryptographic-asset 컴포넌트의 `bom-ref`가 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAlgorithm {
    /// 안정적인 참조 키 (예: `crypto/algorithm/aes-256@2.16.840.1.101.3.4.1.42`)
    #[serde(rename = "ref")]
    pub reference: String,
    /// 알고리즘 이름
    pub name: String,
    /// 객체 식별자
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CryptoAlgorithm {
    /// 이름과 OID로 `crypto/algorithm/{name}@{oid}` 형식의 참조를 만듭니다.
    pub fn reference_for(name: &str, oid: Option<&str>) -> String {
        format!("crypto/algorithm/{name}@{}", oid.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_uses_name_and_oid() {
        assert_eq!(
            CryptoAlgorithm::reference_for("sha-256", Some("2.16.840.1.101.3.4.2.1")),
            "crypto/algorithm/sha-256@2.16.840.1.101.3.4.2.1"
        );
    }

    #[test]
    fn serializes_reference_as_ref() {
        let algo = CryptoAlgorithm {
            reference: "alg:aes-256".to_owned(),
            name: "aes-256".to_owned(),
            oid: None,
            description: None,
        };
        let json = serde_json::to_value(&algo).unwrap();
        assert_eq!(json["ref"], "alg:aes-256");
        assert!(json.get("oid").is_none());
    }
}
