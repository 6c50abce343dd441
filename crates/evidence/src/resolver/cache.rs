//! 해석 결과 캐시

use std::collections::HashMap;

use super::ResolutionResult;

/// 심볼별 해석 결과 메모이제이션
///
/// 실행 한 번 동안만 유지되며 무효화 정책은 없습니다. 실패한 조회는
/// [`ResolutionResult::Unresolved`]로 저장되어 같은 심볼에 대한 재조회를 막습니다.
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: HashMap<String, ResolutionResult>,
    hits: u64,
    misses: u64,
}

impl ResolverCache {
    /// 빈 캐시를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시된 결과를 조회합니다. 적중/미스 통계를 갱신합니다.
    pub fn get(&mut self, symbol: &str) -> Option<ResolutionResult> {
        match self.entries.get(symbol) {
            Some(result) => {
                self.hits += 1;
                Some(result.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// 결과를 저장합니다. `Failed`는 빈 결과로 바뀌어 저장됩니다.
    pub fn insert(&mut self, symbol: &str, result: &ResolutionResult) {
        let stored = match result {
            ResolutionResult::Failed(_) => ResolutionResult::Unresolved,
            other => other.clone(),
        };
        self.entries.insert(symbol.to_owned(), stored);
    }

    /// 저장된 심볼 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 적중 횟수
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// 미스 횟수
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
