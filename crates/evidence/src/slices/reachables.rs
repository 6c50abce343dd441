//! reachables 슬라이스 타입

use serde::Deserialize;

/// reachables 슬라이스 최상위 객체
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReachablesSlice {
    pub reachables: Vec<ReachableNode>,
}

/// 진입점에서 도달 가능한 흐름 하나
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReachableNode {
    /// 이 흐름이 닿는 컴포넌트 purl
    pub purls: Vec<String>,
    /// 흐름을 구성하는 노드
    pub flows: Vec<ReachableFlow>,
}

/// 흐름 노드
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReachableFlow {
    /// 쉼표로 구분된 태그 (`crypto`, `crypto-generate`, purl 등)
    pub tags: String,
    pub code: String,
    pub parent_package_name: Option<String>,
    pub parent_class_name: Option<String>,
    pub parent_method_name: Option<String>,
    pub parent_file_name: Option<String>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
}

impl ReachableFlow {
    /// 공백을 걷어낸 개별 태그
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split(',').map(str::trim).filter(|t| !t.is_empty())
    }

    /// 암호 관련 흐름인지
    pub fn is_crypto(&self) -> bool {
        self.tags.contains("crypto")
    }

    /// 암호 연산(생성/서명/암복호화) 흐름인지
    pub fn is_crypto_generate(&self) -> bool {
        self.tags.contains("crypto-generate")
            || self.code.contains("encrypt")
            || self.code.contains("decrypt")
            || self.code.contains("sign")
    }

    /// 태그에 포함된 purl
    pub fn tagged_purls(&self) -> impl Iterator<Item = &str> {
        self.tag_list().filter(|t| t.starts_with("pkg:"))
    }

    /// 실제 소스 파일에 속한 노드인지
    pub fn has_source_file(&self) -> bool {
        !matches!(self.parent_file_name.as_deref(), None | Some("") | Some("<unknown>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(tags: &str, code: &str) -> ReachableFlow {
        ReachableFlow {
            tags: tags.to_owned(),
            code: code.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        let f = flow("crypto, crypto-generate,pkg:example/lib@1.0", "");
        assert_eq!(
            f.tag_list().collect::<Vec<_>>(),
            vec!["crypto", "crypto-generate", "pkg:example/lib@1.0"]
        );
        assert_eq!(f.tagged_purls().collect::<Vec<_>>(), vec!["pkg:example/lib@1.0"]);
    }

    #[test]
    fn crypto_generate_from_code_keywords() {
        assert!(flow("", "cipher.encrypt(data)").is_crypto_generate());
        assert!(flow("", "jwt.sign(payload)").is_crypto_generate());
        assert!(flow("crypto-generate", "").is_crypto_generate());
        assert!(!flow("crypto", "hash(data)").is_crypto_generate());
    }

    #[test]
    fn unknown_parent_file_is_not_a_source_frame() {
        let mut f = flow("", "");
        assert!(!f.has_source_file());
        f.parent_file_name = Some("<unknown>".to_owned());
        assert!(!f.has_source_file());
        f.parent_file_name = Some("app.js".to_owned());
        assert!(f.has_source_file());
    }

    #[test]
    fn parses_reachables_json() {
        let json = r#"{"reachables": [{
            "purls": ["pkg:npm/jsonwebtoken@9.0.0"],
            "flows": [{
                "id": 3, "label": "CALL", "tags": "crypto-generate, pkg:npm/jsonwebtoken@9.0.0",
                "code": "jwt.sign(user, key)", "parentFileName": "lib/insecurity.ts",
                "parentMethodName": "authorize", "lineNumber": 54
            }]
        }]}"#;
        let slice: ReachablesSlice = serde_json::from_str(json).unwrap();
        assert_eq!(slice.reachables[0].flows[0].line_number, Some(54));
    }
}
