//! data-flow 슬라이스 타입

use std::collections::HashMap;

use serde::Deserialize;

/// data-flow 슬라이스 최상위 객체
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataFlowSlice {
    /// 노드 그래프
    pub graph: DataFlowGraph,
    /// 노드 id 순서열 하나가 하나의 오염 흐름
    pub paths: Vec<Vec<NodeId>>,
}

/// 노드 그래프
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataFlowGraph {
    pub nodes: Vec<DataFlowNode>,
}

impl DataFlowGraph {
    /// id로 노드를 찾는 조회 테이블. 중복 id는 마지막 노드가 이깁니다.
    ///
    /// `<operator` 로 시작하는 연산자 노드는 프레임이 되지 않도록 제외합니다.
    pub fn node_lookup(&self) -> HashMap<&NodeId, &DataFlowNode> {
        self.nodes
            .iter()
            .filter(|n| !n.is_operator())
            .map(|n| (&n.id, n))
            .collect()
    }
}

/// 노드 id (분석기 버전에 따라 숫자 또는 문자열)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl Default for NodeId {
    fn default() -> Self {
        Self::Number(-1)
    }
}

/// 그래프 노드
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFlowNode {
    pub id: NodeId,
    pub label: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub type_full_name: Option<String>,
    pub code: Option<String>,
    pub parent_package_name: Option<String>,
    pub parent_class_name: Option<String>,
    pub parent_method_name: Option<String>,
    pub parent_file_name: Option<String>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
}

impl DataFlowNode {
    /// `<operator>.assignment` 같은 합성 연산자 노드인지 여부
    pub fn is_operator(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.starts_with("<operator"))
    }
}
