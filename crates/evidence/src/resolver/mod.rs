//! Purl 해석기 -- 정규화된 심볼을 SBOM 컴포넌트 purl로 연결
//!
//! import 테이블이 있으면 언어별 별칭 비교 규칙으로, 없으면 네임스페이스 인덱스의
//! 부분 문자열 조회로 해석합니다. 모든 결과(빈 결과 포함)는 [`ResolverCache`]에
//! 저장되어, 같은 심볼에 대해 인덱스는 최대 한 번만 조회됩니다.
//!
//! ```text
//! symbol --> ResolverCache --hit--> ResolutionResult
//!               | miss
//!               v
//!       ImportMap::matches  (import 테이블이 있을 때)
//!       NamespaceIndex::find (그 외, 인덱스가 있을 때)
//! ```

mod cache;
mod import_map;
pub mod index;

pub use cache::ResolverCache;
pub use import_map::ImportMap;
pub use index::{MemoryNamespaceIndex, SqliteNamespaceIndex};

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use purlscope_core::metrics as m;
use purlscope_core::pipeline::NamespaceIndex;

use crate::symbol::rules_for;
use crate::types::Language;

/// 심볼 하나에 대한 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// 하나 이상의 purl로 해석됨
    Resolved(BTreeSet<String>),
    /// 일치하는 purl 없음
    Unresolved,
    /// 인덱스 조회 실패 (캐시에는 `Unresolved`로 저장됨)
    Failed(String),
}

impl ResolutionResult {
    fn from_purls(purls: BTreeSet<String>) -> Self {
        if purls.is_empty() {
            Self::Unresolved
        } else {
            Self::Resolved(purls)
        }
    }

    /// 해석된 purl 목록. 해석되지 않았으면 빈 반복자
    pub fn purls(&self) -> impl Iterator<Item = &String> {
        match self {
            Self::Resolved(purls) => Some(purls.iter()),
            _ => None,
        }
        .into_iter()
        .flatten()
    }

    /// 해석 성공 여부
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Purl 해석기
///
/// 캐시를 소유하므로 실행마다 새 인스턴스를 만들면 실행 간 상태가 공유되지 않습니다.
pub struct PurlResolver {
    language: Language,
    import_map: ImportMap,
    index: Option<Arc<dyn NamespaceIndex>>,
    cache: ResolverCache,
    index_queries: u64,
}

impl PurlResolver {
    /// 새 해석기를 생성합니다.
    pub fn new(
        language: Language,
        import_map: ImportMap,
        index: Option<Arc<dyn NamespaceIndex>>,
    ) -> Self {
        Self {
            language,
            import_map,
            index,
            cache: ResolverCache::new(),
            index_queries: 0,
        }
    }

    /// 대상 언어
    pub fn language(&self) -> Language {
        self.language
    }

    /// import 테이블
    pub fn import_map(&self) -> &ImportMap {
        &self.import_map
    }

    /// 해석 캐시
    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// 지금까지 수행한 인덱스 조회 수
    pub fn index_queries(&self) -> u64 {
        self.index_queries
    }

    /// 심볼을 purl 집합으로 해석합니다.
    ///
    /// 분류기 판정은 호출자가 먼저 수행합니다. 인덱스 조회 실패는 이번 호출에서
    /// `Failed`로 보고되고, 이후 같은 심볼은 캐시에서 `Unresolved`로 응답됩니다.
    pub fn resolve(&mut self, symbol: &str) -> ResolutionResult {
        if let Some(cached) = self.cache.get(symbol) {
            metrics::counter!(m::RESOLVER_CACHE_HITS_TOTAL).increment(1);
            return cached;
        }

        let result = if !self.import_map.is_empty() {
            ResolutionResult::from_purls(
                self.import_map.matches(rules_for(self.language), symbol),
            )
        } else if let Some(index) = &self.index {
            self.index_queries += 1;
            metrics::counter!(m::RESOLVER_INDEX_QUERIES_TOTAL).increment(1);
            match index.find(symbol) {
                Ok(purls) => ResolutionResult::from_purls(purls.into_iter().collect()),
                Err(e) => {
                    metrics::counter!(m::RESOLVER_INDEX_FAILURES_TOTAL).increment(1);
                    warn!(symbol, index = index.name(), error = %e, "namespace index query failed");
                    ResolutionResult::Failed(e.to_string())
                }
            }
        } else {
            ResolutionResult::Unresolved
        };

        if !result.is_resolved() {
            debug!(symbol, "unable to identify purl");
        }
        self.cache.insert(symbol, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use purlscope_core::error::{IndexError, PurlscopeError};

    use super::*;

    /// 호출 횟수를 세는 인덱스
    struct CountingIndex {
        inner: MemoryNamespaceIndex,
        calls: AtomicU64,
        fail: bool,
    }

    impl CountingIndex {
        fn new(fail: bool) -> Self {
            let mut inner = MemoryNamespaceIndex::new();
            inner.insert(
                "pkg:maven/org.slf4j/slf4j-api@2.0.9",
                "org.slf4j.Logger org.slf4j.LoggerFactory",
            );
            Self {
                inner,
                calls: AtomicU64::new(0),
                fail,
            }
        }
    }

    impl NamespaceIndex for CountingIndex {
        fn name(&self) -> &str {
            "counting"
        }

        fn find(&self, needle: &str) -> Result<Vec<String>, PurlscopeError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(IndexError::Query("database is locked".to_owned()).into());
            }
            self.inner.find(needle)
        }
    }

    #[test]
    fn repeated_resolution_queries_index_once() {
        let index = Arc::new(CountingIndex::new(false));
        let mut resolver =
            PurlResolver::new(Language::Java, ImportMap::new(), Some(index.clone()));

        let first = resolver.resolve("org.slf4j.Logger");
        let second = resolver.resolve("org.slf4j.Logger");
        assert_eq!(first, second);
        assert!(first.is_resolved());
        assert_eq!(index.calls.load(Ordering::Relaxed), 1);
        assert_eq!(resolver.index_queries(), 1);
        assert_eq!(resolver.cache().hits(), 1);
    }

    #[test]
    fn empty_result_is_cached() {
        let index = Arc::new(CountingIndex::new(false));
        let mut resolver =
            PurlResolver::new(Language::Java, ImportMap::new(), Some(index.clone()));

        assert_eq!(resolver.resolve("io.netty.Channel"), ResolutionResult::Unresolved);
        assert_eq!(resolver.resolve("io.netty.Channel"), ResolutionResult::Unresolved);
        assert_eq!(index.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn index_failure_is_reported_then_cached_as_unresolved() {
        let index = Arc::new(CountingIndex::new(true));
        let mut resolver =
            PurlResolver::new(Language::Java, ImportMap::new(), Some(index.clone()));

        assert!(matches!(
            resolver.resolve("org.slf4j.Logger"),
            ResolutionResult::Failed(_)
        ));
        assert_eq!(resolver.resolve("org.slf4j.Logger"), ResolutionResult::Unresolved);
        assert_eq!(index.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn import_map_takes_precedence_over_index() {
        let index = Arc::new(CountingIndex::new(false));
        let mut imports = ImportMap::new();
        imports.insert_joined("pkg:npm/express@4.18.2", "express", ",");
        let mut resolver =
            PurlResolver::new(Language::JavaScript, imports, Some(index.clone()));

        let result = resolver.resolve("express");
        assert_eq!(
            result.purls().cloned().collect::<Vec<_>>(),
            vec!["pkg:npm/express@4.18.2".to_owned()]
        );
        assert_eq!(resolver.resolve("org.slf4j.Logger"), ResolutionResult::Unresolved);
        assert_eq!(index.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn no_import_map_and_no_index_is_unresolved() {
        let mut resolver = PurlResolver::new(Language::Python, ImportMap::new(), None);
        assert_eq!(resolver.resolve("requests"), ResolutionResult::Unresolved);
        assert_eq!(resolver.resolve("requests").purls().count(), 0);
    }
}
