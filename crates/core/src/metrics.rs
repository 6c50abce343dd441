//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 익스포터는 설치하지 않으므로, 호출 측이 recorder를 설치한 경우에만 값이 수집됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `purlscope_`
//! - 모듈명: `resolver_`, `slices_`, `evidence_`, `crypto_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(purlscope_core::metrics::RESOLVER_INDEX_QUERIES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 슬라이스 종류 레이블 키 (usages, data-flow, reachables, semantics)
pub const LABEL_SLICE_KIND: &str = "kind";

/// 결과 레이블 키 (loaded, missing, too_small, too_large, invalid)
pub const LABEL_RESULT: &str = "result";

// ─── Resolver 메트릭 ────────────────────────────────────────────────

/// Resolver: 네임스페이스 인덱스 쿼리 수 (counter)
pub const RESOLVER_INDEX_QUERIES_TOTAL: &str = "purlscope_resolver_index_queries_total";

/// Resolver: 인덱스 쿼리 실패 수 (counter)
pub const RESOLVER_INDEX_FAILURES_TOTAL: &str = "purlscope_resolver_index_failures_total";

/// Resolver: 캐시 적중 수 (counter)
pub const RESOLVER_CACHE_HITS_TOTAL: &str = "purlscope_resolver_cache_hits_total";

// ─── Slice 메트릭 ────────────────────────────────────────────────────

/// Slices: 로드 시도 수 (counter, label: kind, result)
pub const SLICES_LOADED_TOTAL: &str = "purlscope_slices_loaded_total";

// ─── Evidence 메트릭 ─────────────────────────────────────────────────

/// Evidence: 기록된 occurrence 수 (counter)
pub const EVIDENCE_OCCURRENCES_TOTAL: &str = "purlscope_evidence_occurrences_total";

/// Evidence: 기록된 call stack 수 (counter)
pub const EVIDENCE_CALLSTACKS_TOTAL: &str = "purlscope_evidence_callstacks_total";

/// Evidence: 탐지된 서비스 수 (counter)
pub const EVIDENCE_SERVICES_TOTAL: &str = "purlscope_evidence_services_total";

/// Evidence: 전체 실행 소요 시간 (histogram, 초)
pub const EVIDENCE_RUN_DURATION_SECONDS: &str = "purlscope_evidence_run_duration_seconds";

// ─── Crypto 메트릭 ───────────────────────────────────────────────────

/// Crypto: 탐지된 알고리즘 수 (counter)
pub const CRYPTO_ALGORITHMS_DETECTED_TOTAL: &str = "purlscope_crypto_algorithms_detected_total";

/// Crypto: 탐지기 실패 수 (counter)
pub const CRYPTO_DETECTOR_FAILURES_TOTAL: &str = "purlscope_crypto_detector_failures_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// recorder 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        RESOLVER_INDEX_QUERIES_TOTAL,
        "Namespace index queries issued by the purl resolver"
    );
    describe_counter!(
        RESOLVER_INDEX_FAILURES_TOTAL,
        "Namespace index queries that failed and were cached as empty"
    );
    describe_counter!(
        RESOLVER_CACHE_HITS_TOTAL,
        "Symbol resolutions served from the resolver cache"
    );
    describe_counter!(
        SLICES_LOADED_TOTAL,
        "Slice load attempts by kind and result"
    );
    describe_counter!(
        EVIDENCE_OCCURRENCES_TOTAL,
        "Occurrence locations written into the SBOM"
    );
    describe_counter!(
        EVIDENCE_CALLSTACKS_TOTAL,
        "Call stacks written into the SBOM"
    );
    describe_counter!(EVIDENCE_SERVICES_TOTAL, "Services detected from usages");
    describe_histogram!(
        EVIDENCE_RUN_DURATION_SECONDS,
        "Wall clock duration of one evidence run"
    );
    describe_counter!(
        CRYPTO_ALGORITHMS_DETECTED_TOTAL,
        "Cryptographic algorithms detected in reachable flows"
    );
    describe_counter!(
        CRYPTO_DETECTOR_FAILURES_TOTAL,
        "Crypto detector invocations that failed"
    );
}
