//! 증거 엔진 오케스트레이터 -- 한 번의 실행 흐름 관리
//!
//! [`EvidenceEngine`]은 SBOM 하나와 슬라이스 파일들을 받아 증거를 집계하고,
//! 갱신된 SBOM을 출력 경로에 기록합니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! SBOM --> parse_bom --> seed_from_components --> PurlResolver
//!                                                    |
//! reachables / usages / semantics / data-flow --> EvidenceAggregator (spawn_blocking)
//!                                                    |
//!                                               EvidenceMaps
//!                                                    |
//!                               apply_evidence --> BomPostProcessor --> output
//! ```
//!
//! 슬라이스 적재 실패, 인덱스 조회 실패, 탐지기 실패는 모두 "해당 종류의 증거 없음"으로
//! 처리됩니다. SBOM 자체를 읽거나 쓰지 못한 경우만 에러로 반환됩니다.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use purlscope_core::metrics as m;
use purlscope_core::pipeline::{
    BomPostProcessor, CryptoDetector, IdentityPostProcessor, NamespaceIndex,
};

use crate::aggregator::{EvidenceAggregator, EvidenceMaps, seed_from_components};
use crate::config::EngineConfig;
use crate::crypto::BuiltinCryptoDetector;
use crate::error::EvidenceError;
use crate::resolver::{PurlResolver, SqliteNamespaceIndex};
use crate::sbom::{
    SliceAnnotation, WriteSummary, apply_evidence, check_spec_version, parse_bom, render_bom,
    to_value,
};
use crate::slices::{
    DataFlowSlice, LoadedSlice, ReachablesSlice, SemanticsSlice, SliceKind, SliceLimits,
    SliceLoadResult, UsageSlice, load_slice,
};
use crate::types::Language;

/// 실행 결과 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceStatus {
    /// 하나 이상의 증거가 기록됨
    Attached,
    /// 적재된 슬라이스가 없음
    NoSlices,
    /// 슬라이스는 있었지만 해석된 증거가 없음
    Unresolved,
}

impl EvidenceStatus {
    /// 상태 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::NoSlices => "no_slices",
            Self::Unresolved => "unresolved",
        }
    }
}

/// 한 번의 실행 보고
#[derive(Debug, Clone)]
pub struct EvidenceReport {
    /// 결과 상태
    pub status: EvidenceStatus,
    /// 문서 기록 요약
    pub summary: WriteSummary,
    /// 집계된 증거 맵
    pub maps: EvidenceMaps,
    /// 슬라이스 종류별 적재 결과
    pub slices: Vec<(SliceKind, &'static str)>,
    /// 네임스페이스 인덱스 조회 수
    pub index_queries: u64,
    /// 해석 캐시 적중 수
    pub cache_hits: u64,
    /// 기록된 SBOM 경로
    pub output: String,
}

/// 적재된 슬라이스 묶음
#[derive(Default)]
struct LoadedSlices {
    reachables: Option<LoadedSlice<ReachablesSlice>>,
    usages: Option<LoadedSlice<UsageSlice>>,
    semantics: Option<LoadedSlice<SemanticsSlice>>,
    data_flow: Option<LoadedSlice<DataFlowSlice>>,
    outcomes: Vec<(SliceKind, &'static str)>,
}

impl LoadedSlices {
    fn record<T>(&mut self, kind: SliceKind, result: SliceLoadResult<T>) -> Option<LoadedSlice<T>> {
        self.outcomes.push((kind, result.outcome()));
        result.into_loaded()
    }

    fn any_loaded(&self) -> bool {
        self.reachables.is_some()
            || self.usages.is_some()
            || self.semantics.is_some()
            || self.data_flow.is_some()
    }

    /// annotation 대상 (usages, data-flow, reachables)
    fn annotations(&self) -> Vec<SliceAnnotation> {
        let mut out = Vec::new();
        if let Some(s) = &self.usages {
            out.push(annotation(SliceKind::Usages, s));
        }
        if let Some(s) = &self.data_flow {
            out.push(annotation(SliceKind::DataFlow, s));
        }
        if let Some(s) = &self.reachables {
            out.push(annotation(SliceKind::Reachables, s));
        }
        out
    }
}

fn annotation<T>(kind: SliceKind, slice: &LoadedSlice<T>) -> SliceAnnotation {
    SliceAnnotation {
        kind,
        path: slice.path.clone(),
        text: slice.raw.clone(),
    }
}

/// 증거 엔진
///
/// 설정과 외부 협력자(인덱스, 탐지기, 후처리기)를 보유합니다. 실행마다 새
/// [`PurlResolver`]를 만들기 때문에 같은 엔진으로 여러 번 [`run`](Self::run)을
/// 호출해도 캐시가 섞이지 않습니다.
pub struct EvidenceEngine {
    config: EngineConfig,
    index: Option<Arc<dyn NamespaceIndex>>,
    detector: Option<Arc<dyn CryptoDetector>>,
    post_processor: Arc<dyn BomPostProcessor>,
}

impl EvidenceEngine {
    /// 빌더를 생성합니다.
    pub fn builder() -> EvidenceEngineBuilder {
        EvidenceEngineBuilder::new()
    }

    /// 엔진 설정
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 한 번의 증거 수집을 실행하고 SBOM을 기록합니다.
    pub async fn run(&self) -> Result<EvidenceReport, EvidenceError> {
        let started = Instant::now();
        let config = &self.config;
        let language = config.language;

        let text = tokio::fs::read_to_string(&config.input)
            .await
            .map_err(|e| EvidenceError::SbomRead {
                path: config.input.clone(),
                source: e,
            })?;
        let mut doc = parse_bom(&config.input, &text)?;
        let version = check_spec_version(&doc)?;
        debug!(
            path = %config.input,
            components = doc.components.len(),
            spec_version = ?version,
            "sbom loaded"
        );

        let seed = seed_from_components(&doc.components, language);
        let index = self.resolve_index().await;
        let resolver = PurlResolver::new(language, seed.import_map, index);
        let detector = if config.include_crypto {
            Some(self.resolve_detector().await)
        } else {
            None
        };

        let slices = self.load_slices(!doc.components.is_empty()).await;
        let annotations = (config.annotate && slices.any_loaded()).then(|| slices.annotations());
        let any_loaded = slices.any_loaded();
        let outcomes = slices.outcomes.clone();

        let components = doc.components.clone();
        let (maps, index_queries, cache_hits) = tokio::task::spawn_blocking(move || {
            let mut aggregator = EvidenceAggregator::new(resolver, detector);
            aggregator.seed_locations(seed.purl_locations);
            // 순서: reachables, usages, semantics, data-flow
            if let Some(s) = &slices.reachables {
                aggregator.ingest_reachables(&s.data);
            }
            if let Some(s) = &slices.usages {
                aggregator.ingest_usages(&s.data);
            }
            if let Some(s) = &slices.semantics {
                aggregator.ingest_semantics(&components, &s.data);
            }
            if let Some(s) = &slices.data_flow {
                aggregator.ingest_data_flow(&s.data);
            }
            let queries = aggregator.resolver().index_queries();
            let hits = aggregator.resolver().cache().hits();
            (aggregator.finish(), queries, hits)
        })
        .await
        .map_err(|e| EvidenceError::Task(format!("spawn_blocking failed: {e}")))?;

        let summary = apply_evidence(&mut doc, &maps, annotations.as_deref(), Utc::now());

        let status = if !any_loaded {
            EvidenceStatus::NoSlices
        } else if summary.has_evidence() {
            EvidenceStatus::Attached
        } else {
            EvidenceStatus::Unresolved
        };
        match status {
            EvidenceStatus::Attached => {}
            EvidenceStatus::NoSlices => warn!(
                status = status.as_str(),
                "no evidence attached: no usable slices were found"
            ),
            EvidenceStatus::Unresolved => warn!(
                status = status.as_str(),
                "no evidence attached: slices did not resolve to any component"
            ),
        }

        let output = config.output_path().to_owned();
        let value = to_value(&output, &doc)?;
        let value = self
            .post_processor
            .process(value)
            .map_err(|e| EvidenceError::SbomWrite {
                path: output.clone(),
                reason: format!("post-processor '{}' failed: {e}", self.post_processor.name()),
            })?;
        let rendered = render_bom(&output, &value)?;
        tokio::fs::write(&output, rendered)
            .await
            .map_err(|e| EvidenceError::SbomWrite {
                path: output.clone(),
                reason: e.to_string(),
            })?;

        metrics::histogram!(m::EVIDENCE_RUN_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        info!(
            path = %output,
            status = status.as_str(),
            occurrences = summary.occurrences,
            callstacks = summary.callstacks,
            services = summary.services,
            crypto_components = summary.crypto_components,
            index_queries,
            "evidence written"
        );

        Ok(EvidenceReport {
            status,
            summary,
            maps,
            slices: outcomes,
            index_queries,
            cache_hits,
            output,
        })
    }

    /// 주입된 인덱스, 없으면 `db_path`의 SQLite 인덱스
    ///
    /// 인덱스를 열지 못하면 경고 후 인덱스 없이 진행합니다.
    async fn resolve_index(&self) -> Option<Arc<dyn NamespaceIndex>> {
        if let Some(index) = &self.index {
            return Some(Arc::clone(index));
        }
        let db_path = self.config.db_path.clone();
        if db_path.is_empty() {
            return None;
        }
        let opened = tokio::task::spawn_blocking(move || {
            SqliteNamespaceIndex::open(Path::new(&db_path))
        })
        .await;
        match opened {
            Ok(Ok(index)) => Some(Arc::new(index) as Arc<dyn NamespaceIndex>),
            Ok(Err(e)) => {
                warn!(path = %self.config.db_path, error = %e, "namespace index unavailable, continuing without it");
                None
            }
            Err(e) => {
                warn!(error = %e, "namespace index open task failed");
                None
            }
        }
    }

    /// 주입된 탐지기, 없으면 카탈로그 파일 또는 내장 카탈로그
    async fn resolve_detector(&self) -> Arc<dyn CryptoDetector> {
        if let Some(detector) = &self.detector {
            return Arc::clone(detector);
        }
        let catalog = self.config.crypto_catalog_path.clone();
        if catalog.is_empty() {
            return Arc::new(BuiltinCryptoDetector::builtin());
        }
        let loaded = tokio::task::spawn_blocking(move || {
            BuiltinCryptoDetector::from_file(Path::new(&catalog))
        })
        .await;
        match loaded {
            Ok(Ok(detector)) => Arc::new(detector),
            Ok(Err(e)) => {
                warn!(path = %self.config.crypto_catalog_path, error = %e, "crypto catalog unavailable, using builtin catalog");
                Arc::new(BuiltinCryptoDetector::builtin())
            }
            Err(e) => {
                warn!(error = %e, "crypto catalog load task failed, using builtin catalog");
                Arc::new(BuiltinCryptoDetector::builtin())
            }
        }
    }

    async fn load_slices(&self, has_components: bool) -> LoadedSlices {
        let config = &self.config;
        let limits = SliceLimits {
            min_bytes: config.min_slice_bytes,
            max_bytes: config.max_slice_bytes,
        };
        let mut slices = LoadedSlices::default();

        if config.with_reachables || config.include_crypto {
            let result = load_slice(
                SliceKind::Reachables,
                config.reachables_slice_path.as_deref(),
                limits,
            )
            .await;
            slices.reachables = slices.record(SliceKind::Reachables, result);
        }

        let result = load_slice(SliceKind::Usages, config.usages_slice_path.as_deref(), limits).await;
        slices.usages = slices.record(SliceKind::Usages, result);

        if config.language == Language::Swift && has_components {
            let result = load_slice(
                SliceKind::Semantics,
                config.semantics_slice_path.as_deref(),
                limits,
            )
            .await;
            slices.semantics = slices.record(SliceKind::Semantics, result);
        }

        if config.with_data_flow {
            let result = load_slice(
                SliceKind::DataFlow,
                config.data_flow_slice_path.as_deref(),
                limits,
            )
            .await;
            slices.data_flow = slices.record(SliceKind::DataFlow, result);
        }

        slices
    }
}

/// 증거 엔진 빌더
pub struct EvidenceEngineBuilder {
    config: EngineConfig,
    index: Option<Arc<dyn NamespaceIndex>>,
    detector: Option<Arc<dyn CryptoDetector>>,
    post_processor: Option<Arc<dyn BomPostProcessor>>,
}

impl EvidenceEngineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            index: None,
            detector: None,
            post_processor: None,
        }
    }

    /// 엔진 설정을 지정합니다.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// 네임스페이스 인덱스를 주입합니다.
    ///
    /// 주입하지 않으면 `db_path`가 설정된 경우 SQLite 인덱스를 엽니다.
    pub fn index(mut self, index: Arc<dyn NamespaceIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// 암호 알고리즘 탐지기를 주입합니다 (`include_crypto`일 때만 사용).
    pub fn detector(mut self, detector: Arc<dyn CryptoDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// 문서 후처리기를 지정합니다. 기본값은 [`IdentityPostProcessor`].
    pub fn post_processor(mut self, post_processor: Arc<dyn BomPostProcessor>) -> Self {
        self.post_processor = Some(post_processor);
        self
    }

    /// 엔진을 빌드합니다.
    pub fn build(self) -> Result<EvidenceEngine, EvidenceError> {
        self.config.validate()?;
        Ok(EvidenceEngine {
            config: self.config,
            index: self.index,
            detector: self.detector,
            post_processor: self
                .post_processor
                .unwrap_or_else(|| Arc::new(IdentityPostProcessor)),
        })
    }
}

impl Default for EvidenceEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
