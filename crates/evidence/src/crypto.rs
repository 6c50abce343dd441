//! 내장 암호 알고리즘 탐지기
//!
//! 알고리즘 이름 → OID 카탈로그를 코드 텍스트와 대조합니다. 비교 전에 양쪽 모두
//! 소문자로 바꾸고 영숫자와 공백 외의 문자를 지웁니다 (`SHA-256` → `sha256`).
//!
//! 카탈로그 JSON 형식:
//!
//! ```json
//! { "aes-256": { "oid": "2.16.840.1.101.3.4.1.42", "description": "..." } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use purlscope_core::error::PurlscopeError;
use purlscope_core::pipeline::CryptoDetector;
use purlscope_core::types::CryptoAlgorithm;

use crate::error::EvidenceError;

/// 내장 카탈로그 (이름, OID, 설명)
const BUILTIN_CATALOG: &[(&str, &str, &str)] = &[
    ("aes", "2.16.840.1.101.3.4.1", "Advanced Encryption Standard"),
    ("aes-128", "2.16.840.1.101.3.4.1.2", "AES with 128-bit key in CBC mode"),
    ("aes-192", "2.16.840.1.101.3.4.1.22", "AES with 192-bit key in CBC mode"),
    ("aes-256", "2.16.840.1.101.3.4.1.42", "AES with 256-bit key in CBC mode"),
    ("sha-1", "1.3.14.3.2.26", "Secure Hash Algorithm 1"),
    ("sha-256", "2.16.840.1.101.3.4.2.1", "Secure Hash Algorithm 2 with 256-bit digest"),
    ("sha-384", "2.16.840.1.101.3.4.2.2", "Secure Hash Algorithm 2 with 384-bit digest"),
    ("sha-512", "2.16.840.1.101.3.4.2.3", "Secure Hash Algorithm 2 with 512-bit digest"),
    ("md5", "1.2.840.113549.2.5", "MD5 message digest"),
    ("hmac-sha256", "1.2.840.113549.2.9", "HMAC with SHA-256"),
    ("pbkdf2", "1.2.840.113549.1.5.12", "Password-Based Key Derivation Function 2"),
    ("rsa", "1.2.840.113549.1.1.1", "RSA encryption"),
    ("dsa", "1.2.840.10040.4.1", "Digital Signature Algorithm"),
    ("ecdsa", "1.2.840.10045.4.3.2", "ECDSA with SHA-256"),
    ("ed25519", "1.3.101.112", "Edwards-curve signature over Curve25519"),
    ("x25519", "1.3.101.110", "Key agreement over Curve25519"),
    ("3des", "1.2.840.113549.3.7", "Triple DES in CBC mode"),
    ("rc4", "1.2.840.113549.3.4", "RC4 stream cipher"),
    ("chacha20-poly1305", "1.2.840.113549.1.9.16.3.18", "ChaCha20-Poly1305 AEAD"),
];

/// 카탈로그 항목
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    oid: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// 비교용으로 정규화된 항목
#[derive(Debug, Clone)]
struct Signature {
    name: String,
    needle: String,
    oid: Option<String>,
    description: Option<String>,
}

/// OID 카탈로그 기반 탐지기
#[derive(Debug, Clone)]
pub struct BuiltinCryptoDetector {
    signatures: Vec<Signature>,
}

impl BuiltinCryptoDetector {
    /// 내장 카탈로그로 탐지기를 생성합니다.
    pub fn builtin() -> Self {
        let catalog = BUILTIN_CATALOG
            .iter()
            .map(|(name, oid, description)| {
                (
                    (*name).to_owned(),
                    CatalogEntry {
                        oid: Some((*oid).to_owned()),
                        description: Some((*description).to_owned()),
                    },
                )
            })
            .collect();
        Self::from_catalog(catalog)
    }

    /// JSON 카탈로그 문자열에서 탐지기를 생성합니다.
    pub fn from_json(json: &str) -> Result<Self, EvidenceError> {
        let catalog: BTreeMap<String, CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| EvidenceError::Detector(format!("invalid crypto catalog: {e}")))?;
        if catalog.is_empty() {
            return Err(EvidenceError::Detector("crypto catalog is empty".to_owned()));
        }
        Ok(Self::from_catalog(catalog))
    }

    /// 카탈로그 파일에서 탐지기를 생성합니다.
    pub fn from_file(path: &Path) -> Result<Self, EvidenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EvidenceError::Detector(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn from_catalog(catalog: BTreeMap<String, CatalogEntry>) -> Self {
        let signatures = catalog
            .into_iter()
            .filter_map(|(name, entry)| {
                let needle = clean(&name);
                if needle.trim().is_empty() {
                    return None;
                }
                Some(Signature {
                    name,
                    needle,
                    oid: entry.oid,
                    description: entry.description,
                })
            })
            .collect();
        Self { signatures }
    }

    /// 카탈로그 항목 수
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// 카탈로그가 비어 있는지
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for BuiltinCryptoDetector {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CryptoDetector for BuiltinCryptoDetector {
    fn name(&self) -> &str {
        "builtin-oid-catalog"
    }

    fn detect(&self, code: &str) -> Result<Vec<CryptoAlgorithm>, PurlscopeError> {
        let cleaned = clean(code);
        Ok(self
            .signatures
            .iter()
            .filter(|s| cleaned.contains(&s.needle))
            .map(|s| CryptoAlgorithm {
                reference: CryptoAlgorithm::reference_for(&s.name, s.oid.as_deref()),
                name: s.name.clone(),
                oid: s.oid.clone(),
                description: s.description.clone(),
            })
            .collect())
    }
}

/// 소문자로 바꾸고 영숫자와 공백만 남깁니다.
fn clean(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
