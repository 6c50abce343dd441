//! semantics 슬라이스 타입 (Swift)

use std::collections::BTreeMap;

use serde::Deserialize;

/// semantics 슬라이스 최상위 객체
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticsSlice {
    /// 모듈 이름 → 빌드 출력에서 얻은 심볼 (정밀도 낮음)
    pub build_symbols: BTreeMap<String, Vec<String>>,
    /// 모듈 이름 → 선언 정보
    pub module_infos: BTreeMap<String, ModuleInfo>,
    /// 소스 파일 → 심볼 위치 색인
    pub file_indexes: BTreeMap<String, FileIndex>,
}

/// 모듈 선언 정보
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleInfo {
    pub classes: Vec<String>,
    pub protocols: Vec<String>,
    pub enums: Vec<String>,
    pub class_methods: BTreeMap<String, Vec<String>>,
    pub protocol_methods: BTreeMap<String, Vec<String>>,
}

impl ModuleInfo {
    /// 모듈에 속한 모든 심볼
    pub fn symbols(&self) -> impl Iterator<Item = &String> {
        self.classes
            .iter()
            .chain(self.protocols.iter())
            .chain(self.enums.iter())
            .chain(self.class_methods.values().flatten())
            .chain(self.protocol_methods.values().flatten())
    }
}

/// 파일 하나의 심볼 위치 색인
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileIndex {
    /// 심볼 → 줄 번호 목록
    pub symbol_locations: BTreeMap<String, Vec<u64>>,
}
