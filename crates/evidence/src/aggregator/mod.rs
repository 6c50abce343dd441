//! 증거 집계기 -- 슬라이스를 purl별 증거 맵으로 모음
//!
//! [`EvidenceAggregator`]는 한 번의 실행 동안 [`PurlResolver`]를 소유하고,
//! 슬라이스 종류별 `ingest_*` 호출을 받아 [`EvidenceMaps`]를 채웁니다.
//! 같은 purl로 여러 번 해석되더라도 위치는 합집합, 프레임 목록은 누적됩니다.
//!
//! ```text
//! SbomSeed --> seed_locations
//! ReachablesSlice --> ingest_reachables --+
//! UsageSlice      --> ingest_usages     --+--> EvidenceMaps --> sbom::apply_evidence
//! SemanticsSlice  --> ingest_semantics  --+
//! DataFlowSlice   --> ingest_data_flow  --+
//! ```

mod dataflow;
mod reachables;
mod seed;
mod semantics;
mod usages;

pub use seed::{SbomSeed, seed_from_components};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use purlscope_core::pipeline::CryptoDetector;
use purlscope_core::types::CryptoAlgorithm;

use crate::resolver::PurlResolver;
use crate::sbom::{Component, Frame};
use crate::services::{self, ServiceMap};
use crate::slices::{DataFlowSlice, ReachablesSlice, SemanticsSlice, UsageSlice};
use crate::symbol::{class_type_from_signature, is_filterable_type};
use crate::types::{Language, UserDefinedTypes};

/// 한 번의 실행으로 모은 증거
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceMaps {
    /// purl → `file#line` 위치
    pub purl_locations: BTreeMap<String, BTreeSet<String>>,
    /// purl → 호출 스택 후보 목록
    pub data_flow_frames: BTreeMap<String, Vec<Vec<Frame>>>,
    /// 암호 알고리즘 제공 purl → 알고리즘 참조
    pub crypto_generate_purls: BTreeMap<String, BTreeSet<String>>,
    /// 참조 → 탐지된 알고리즘
    pub crypto_components: BTreeMap<String, CryptoAlgorithm>,
    /// 서비스 이름 → 서비스
    pub services: ServiceMap,
}

impl EvidenceMaps {
    /// 기록할 증거가 하나라도 있는지
    pub fn has_evidence(&self) -> bool {
        self.purl_locations.values().any(|l| !l.is_empty())
            || !self.data_flow_frames.is_empty()
            || !self.services.is_empty()
    }
}

/// 슬라이스 집계기
pub struct EvidenceAggregator {
    language: Language,
    resolver: PurlResolver,
    detector: Option<Arc<dyn CryptoDetector>>,
    udts: UserDefinedTypes,
    maps: EvidenceMaps,
}

impl EvidenceAggregator {
    /// 새 집계기를 만듭니다.
    ///
    /// `detector`가 `None`이면 reachables의 암호 흐름은 호출 스택만 기록됩니다.
    pub fn new(resolver: PurlResolver, detector: Option<Arc<dyn CryptoDetector>>) -> Self {
        Self {
            language: resolver.language(),
            resolver,
            detector,
            udts: UserDefinedTypes::new(),
            maps: EvidenceMaps::default(),
        }
    }

    /// SBOM에 이미 기록된 위치를 합칩니다.
    pub fn seed_locations(&mut self, locations: BTreeMap<String, BTreeSet<String>>) {
        for (purl, locs) in locations {
            self.maps.purl_locations.entry(purl).or_default().extend(locs);
        }
    }

    /// usages 슬라이스를 반영합니다.
    pub fn ingest_usages(&mut self, slice: &UsageSlice) {
        self.udts.extend(slice.user_defined_type_names());

        for object in slice.object_slices.iter().filter(|s| s.has_source_file()) {
            let candidates = usages::collect_candidates(self.language, &self.udts, object);
            for symbol in &candidates.lookups {
                if is_filterable_type(self.language, &self.udts, symbol) {
                    continue;
                }
                let result = self.resolver.resolve(symbol);
                for purl in result.purls() {
                    let entry = self.maps.purl_locations.entry(purl.clone()).or_default();
                    if let Some(loc) = candidates.overrides.get(symbol) {
                        entry.insert(loc.clone());
                    }
                }
            }
            services::detect_services_from_usages(self.language, object, &mut self.maps.services);
        }
        services::detect_services_from_udts(
            self.language,
            &slice.user_defined_types,
            &mut self.maps.services,
        );

        debug!(
            objects = slice.object_slices.len(),
            purls = self.maps.purl_locations.len(),
            services = self.maps.services.len(),
            "usages slice ingested"
        );
    }

    /// semantics 슬라이스(Swift)를 반영합니다.
    pub fn ingest_semantics(&mut self, components: &[Component], slice: &SemanticsSlice) {
        let found = semantics::collect_semantic_locations(components, slice);
        debug!(purls = found.len(), "semantics slice ingested");
        self.seed_locations(found);
    }

    /// data-flow 슬라이스를 반영합니다.
    ///
    /// 경로 하나가 하나의 프레임 목록이 되고, 경로 위 노드에서 해석된 모든 purl에
    /// 그 목록이 추가됩니다.
    pub fn ingest_data_flow(&mut self, slice: &DataFlowSlice) {
        let lookup = slice.graph.node_lookup();
        let mut paths_with_purls = 0usize;

        for path in &slice.paths {
            let mut frames = Vec::with_capacity(path.len());
            let mut referred: BTreeSet<String> = BTreeSet::new();

            for id in path {
                let Some(node) = lookup.get(id) else {
                    continue;
                };
                if let Some(type_name) = dataflow::node_type(self.language, node) {
                    if !is_filterable_type(self.language, &self.udts, &type_name) {
                        referred.extend(self.resolver.resolve(&type_name).purls().cloned());
                        if let Some(class_type) =
                            class_type_from_signature(self.language, &type_name)
                                .filter(|c| *c != type_name)
                        {
                            referred.extend(self.resolver.resolve(&class_type).purls().cloned());
                        }
                    }
                }
                frames.push(dataflow::node_frame(node));
            }

            if referred.is_empty() {
                continue;
            }
            paths_with_purls += 1;
            for purl in referred {
                self.maps
                    .data_flow_frames
                    .entry(purl)
                    .or_default()
                    .push(frames.clone());
            }
        }

        debug!(
            paths = slice.paths.len(),
            resolved_paths = paths_with_purls,
            "data-flow slice ingested"
        );
    }

    /// reachables 슬라이스를 반영합니다.
    pub fn ingest_reachables(&mut self, slice: &ReachablesSlice) {
        reachables::collect_reachables(slice, self.detector.as_deref(), &mut self.maps);
        debug!(
            nodes = slice.reachables.len(),
            crypto_components = self.maps.crypto_components.len(),
            "reachables slice ingested"
        );
    }

    /// 해석기 (캐시 통계 조회용)
    pub fn resolver(&self) -> &PurlResolver {
        &self.resolver
    }

    /// 지금까지 모은 증거
    pub fn maps(&self) -> &EvidenceMaps {
        &self.maps
    }

    /// 집계를 끝내고 증거 맵을 돌려줍니다.
    pub fn finish(self) -> EvidenceMaps {
        self.maps
    }
}
