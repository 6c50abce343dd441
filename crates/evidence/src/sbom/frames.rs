//! 호출 스택 선택
//!
//! CycloneDX 1.5의 `evidence.callstack`은 프레임 목록 하나만 담을 수 있으므로
//! 후보 여러 개 중 하나를 고릅니다.

use super::evidence::Frame;

/// 후보 중 기록할 프레임 목록을 고릅니다.
///
/// 기본값은 첫 번째 후보입니다. 인덱스 `1..len-1` 범위에서 프레임이 두 개를
/// 넘는 후보가 있으면 그중 마지막 것이 기본값을 대신합니다. 마지막 후보
/// (`len-1`)는 검사 범위에 들어가지 않습니다.
pub fn pick_frames(candidates: &[Vec<Frame>]) -> Option<&Vec<Frame>> {
    let mut picked = candidates.first()?;
    for candidate in candidates.iter().take(candidates.len() - 1).skip(1) {
        if candidate.len() > 2 {
            picked = candidate;
        }
    }
    Some(picked)
}
