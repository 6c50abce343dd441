//! 입력 SBOM에서 초기 상태 구성
//!
//! 이전 도구가 이미 기록한 occurrence 위치와, 컴포넌트 속성에 기록된
//! import 별칭을 읽어옵니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::resolver::ImportMap;
use crate::sbom::Component;
use crate::symbol::rules_for;
use crate::types::Language;

/// SBOM에서 읽은 초기 상태
#[derive(Debug, Clone, Default)]
pub struct SbomSeed {
    /// purl → 기존 occurrence 위치
    pub purl_locations: BTreeMap<String, BTreeSet<String>>,
    /// purl → import 별칭
    pub import_map: ImportMap,
}

/// 컴포넌트 목록에서 초기 상태를 구성합니다.
pub fn seed_from_components(components: &[Component], language: Language) -> SbomSeed {
    let property = rules_for(language).import_property();
    let mut seed = SbomSeed::default();

    for comp in components {
        let Some(purl) = comp.purl.as_deref() else {
            continue;
        };

        let locations: BTreeSet<String> = comp
            .evidence
            .iter()
            .flat_map(|e| e.occurrences.iter().flatten())
            .map(|o| o.location.clone())
            .filter(|l| !l.is_empty())
            .collect();
        if !locations.is_empty() {
            seed.purl_locations
                .entry(purl.to_owned())
                .or_default()
                .extend(locations);
        }

        if let Some(aliases) = comp.property(property.name) {
            seed.import_map
                .insert_joined(purl, aliases, property.separator);
        }
    }

    seed
}
