//! reachables 슬라이스에서 호출 스택과 암호 알고리즘 수집

use std::collections::BTreeSet;

use tracing::{debug, warn};

use purlscope_core::metrics as m;
use purlscope_core::pipeline::CryptoDetector;

use super::EvidenceMaps;
use crate::sbom::Frame;
use crate::slices::{ReachableFlow, ReachableNode, ReachablesSlice};

fn flow_frame(flow: &ReachableFlow) -> Frame {
    Frame {
        package: flow.parent_package_name.clone().unwrap_or_default(),
        module: flow.parent_class_name.clone().unwrap_or_default(),
        function: flow.parent_method_name.clone().unwrap_or_default(),
        line: flow.line_number.filter(|l| *l > 0),
        column: flow.column_number.filter(|c| *c > 0),
        full_filename: flow.parent_file_name.clone().unwrap_or_default(),
    }
}

/// 노드 하나를 처리한 중간 결과
#[derive(Debug, Default)]
struct NodeScan {
    frames: Vec<Frame>,
    crypto_code: Option<String>,
    providers: BTreeSet<String>,
}

fn scan_node(node: &ReachableNode) -> NodeScan {
    let mut scan = NodeScan::default();
    for flow in &node.flows {
        // 한 번 암호 흐름으로 판정되면 이후 흐름의 코드도 계속 모음
        if flow.is_crypto() && scan.crypto_code.is_none() {
            scan.crypto_code = Some(String::new());
        }
        if let Some(buffer) = scan.crypto_code.as_mut() {
            if !flow.code.is_empty() {
                buffer.push('\n');
                buffer.push_str(&flow.code);
            }
        }
        if flow.is_crypto_generate() {
            scan.providers
                .extend(flow.tagged_purls().map(str::to_owned));
        }
        if flow.has_source_file() {
            scan.frames.push(flow_frame(flow));
        }
    }
    scan
}

/// reachables 슬라이스를 `maps`에 반영합니다.
///
/// 탐지기가 없거나 실패한 노드는 암호 정보 없이 호출 스택만 기록됩니다.
pub(crate) fn collect_reachables(
    slice: &ReachablesSlice,
    detector: Option<&dyn CryptoDetector>,
    maps: &mut EvidenceMaps,
) {
    for node in &slice.reachables {
        let scan = scan_node(node);

        let purls: BTreeSet<&String> = node.purls.iter().filter(|p| !p.is_empty()).collect();
        for purl in purls {
            maps.data_flow_frames
                .entry(purl.clone())
                .or_default()
                .push(scan.frames.clone());
        }

        for provider in &scan.providers {
            maps.crypto_generate_purls
                .entry(provider.clone())
                .or_default();
        }

        let (Some(code), Some(detector)) = (scan.crypto_code.as_deref(), detector) else {
            continue;
        };
        if code.is_empty() {
            continue;
        }
        let algorithms = match detector.detect(code) {
            Ok(algorithms) => algorithms,
            Err(e) => {
                metrics::counter!(m::CRYPTO_DETECTOR_FAILURES_TOTAL).increment(1);
                warn!(detector = detector.name(), error = %e, "crypto detection failed, skipping node");
                continue;
            }
        };
        for algo in algorithms {
            debug!(reference = %algo.reference, "crypto algorithm detected");
            metrics::counter!(m::CRYPTO_ALGORITHMS_DETECTED_TOTAL).increment(1);
            for provider in &scan.providers {
                maps.crypto_generate_purls
                    .entry(provider.clone())
                    .or_default()
                    .insert(algo.reference.clone());
            }
            maps.crypto_components
                .entry(algo.reference.clone())
                .or_insert(algo);
        }
    }
}
