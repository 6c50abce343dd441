//! CycloneDX 문서 모델
//!
//! 엔진이 읽고 고치는 필드만 타입으로 두고, 나머지는 `extra`에 그대로 보존합니다.
//! 입력 문서의 알 수 없는 필드는 출력에 손실 없이 다시 기록됩니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::evidence::ComponentEvidence;

/// CycloneDX BOM 문서
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Dependency>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BomDocument {
    /// `specVersion`을 `(major, minor)`로 파싱합니다.
    pub fn spec_version_tuple(&self) -> Option<(u32, u32)> {
        parse_spec_version(self.spec_version.as_deref()?)
    }

    /// 도구 목록의 첫 번째 컴포넌트 (annotation 작성자)
    pub fn first_tool_component(&self) -> Option<&Value> {
        let tools = self.metadata.as_ref()?.tools.as_ref()?;
        tools
            .get("components")
            .and_then(|c| c.get(0))
            .or_else(|| tools.get(0))
    }
}

/// `"1.5"` 형식의 버전 문자열을 파싱합니다.
pub fn parse_spec_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor))
}

/// 문서 메타데이터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 컴포넌트
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(rename = "bom-ref", default, skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<ComponentEvidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Component {
    /// 이름이 일치하는 속성 값
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .as_ref()?
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_deref())
    }
}

/// 이름/값 속성
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 서비스
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(rename = "x-trust-boundary", default, skip_serializing_if = "Option::is_none")]
    pub trust_boundary: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 의존성 관계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOM: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "serialNumber": "urn:uuid:1b671687-3955-4f5c-9f5b-ff8d2c9f7e1a",
        "version": 1,
        "metadata": {
            "timestamp": "2024-01-01T00:00:00Z",
            "tools": {"components": [{"type": "application", "name": "bom-generator"}]},
            "lifecycles": [{"phase": "build"}]
        },
        "components": [{
            "type": "library",
            "name": "express",
            "purl": "pkg:npm/express@4.18.2",
            "bom-ref": "pkg:npm/express@4.18.2",
            "scope": "required",
            "properties": [{"name": "ImportedModules", "value": "express"}],
            "evidence": {"identity": {"field": "purl", "confidence": 1}}
        }],
        "dependencies": [{"ref": "pkg:npm/express@4.18.2", "dependsOn": []}],
        "compositions": [{"aggregate": "complete"}]
    }"#;

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let doc: BomDocument = serde_json::from_str(BOM).unwrap();
        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["compositions"][0]["aggregate"], "complete");
        assert_eq!(out["metadata"]["lifecycles"][0]["phase"], "build");
        assert_eq!(out["components"][0]["scope"], "required");
        assert_eq!(out["components"][0]["evidence"]["identity"]["field"], "purl");
        assert_eq!(out["dependencies"][0]["ref"], "pkg:npm/express@4.18.2");
    }

    #[test]
    fn property_lookup() {
        let doc: BomDocument = serde_json::from_str(BOM).unwrap();
        assert_eq!(doc.components[0].property("ImportedModules"), Some("express"));
        assert_eq!(doc.components[0].property("Namespaces"), None);
    }

    #[test]
    fn spec_version_parsing() {
        assert_eq!(parse_spec_version("1.5"), Some((1, 5)));
        assert_eq!(parse_spec_version("1.6"), Some((1, 6)));
        assert_eq!(parse_spec_version("2"), Some((2, 0)));
        assert_eq!(parse_spec_version("one"), None);
    }

    #[test]
    fn first_tool_component_supports_both_layouts() {
        let doc: BomDocument = serde_json::from_str(BOM).unwrap();
        assert_eq!(doc.first_tool_component().unwrap()["name"], "bom-generator");

        let legacy: BomDocument = serde_json::from_str(
            r#"{"specVersion": "1.4", "metadata": {"tools": [{"name": "old"}]}}"#,
        )
        .unwrap();
        assert_eq!(legacy.first_tool_component().unwrap()["name"], "old");
    }
}
