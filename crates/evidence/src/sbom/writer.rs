//! 증거 맵을 SBOM 문서에 기록

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::debug;

use purlscope_core::metrics as m;
use purlscope_core::types::CryptoAlgorithm;

use super::evidence::{EvidenceUpdate, merge_evidence};
use super::frames::pick_frames;
use super::model::{BomDocument, Component, Service};
use crate::aggregator::EvidenceMaps;
use crate::services::ServiceRecord;
use crate::slices::SliceKind;

/// 암호 제공 컴포넌트에 붙는 태그
const CRYPTO_TAGS: &[&str] = &["crypto", "crypto-generate"];

/// annotation으로 남길 슬라이스 원문
#[derive(Debug, Clone)]
pub struct SliceAnnotation {
    /// 슬라이스 종류
    pub kind: SliceKind,
    /// 슬라이스 파일 경로
    pub path: String,
    /// 슬라이스 JSON 원문
    pub text: String,
}

/// 기록 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// occurrence가 기록된 컴포넌트 수
    pub occurrences: usize,
    /// callstack이 기록된 컴포넌트 수
    pub callstacks: usize,
    /// 추가되거나 갱신된 서비스 수
    pub services: usize,
    /// 새로 추가된 암호 자산 컴포넌트 수
    pub crypto_components: usize,
    /// 암호 태그가 붙은 컴포넌트 수
    pub crypto_providers: usize,
}

impl WriteSummary {
    /// 기록된 사용 증거(occurrence, callstack, 서비스)가 있는지
    pub fn has_evidence(&self) -> bool {
        self.occurrences > 0 || self.callstacks > 0 || self.services > 0
    }
}

/// 증거 맵을 문서에 반영합니다.
///
/// 문서 버전을 1 올리고 `metadata.timestamp`를 `now`로 바꿉니다. 서명은 내용이
/// 바뀌므로 컴포넌트와 문서 양쪽에서 제거됩니다.
pub fn apply_evidence(
    doc: &mut BomDocument,
    maps: &EvidenceMaps,
    annotations: Option<&[SliceAnnotation]>,
    now: DateTime<Utc>,
) -> WriteSummary {
    let mut summary = WriteSummary::default();
    let supports_crypto_assets = doc.spec_version_tuple().is_some_and(|v| v >= (1, 6));

    for comp in &mut doc.components {
        comp.signature = None;
        let Some(purl) = comp.purl.clone() else {
            continue;
        };

        let update = EvidenceUpdate {
            locations: maps.purl_locations.get(&purl).cloned().unwrap_or_default(),
            frames: maps
                .data_flow_frames
                .get(&purl)
                .and_then(|c| pick_frames(c))
                .filter(|f| !f.is_empty())
                .cloned(),
        };
        if !update.locations.is_empty() {
            summary.occurrences += 1;
            metrics::counter!(m::EVIDENCE_OCCURRENCES_TOTAL).increment(update.locations.len() as u64);
        }
        if update.frames.is_some() {
            summary.callstacks += 1;
            metrics::counter!(m::EVIDENCE_CALLSTACKS_TOTAL).increment(1);
        }
        comp.evidence = merge_evidence(comp.evidence.take(), &update);

        if maps
            .crypto_generate_purls
            .get(&purl)
            .is_some_and(|algos| !algos.is_empty())
        {
            add_tags(comp, CRYPTO_TAGS);
            summary.crypto_providers += 1;
        }
    }

    summary.services = merge_services(doc, &maps.services);
    metrics::counter!(m::EVIDENCE_SERVICES_TOTAL).increment(summary.services as u64);

    summary.crypto_components =
        append_crypto_components(doc, maps.crypto_components.values(), supports_crypto_assets);
    add_provides(doc, &maps.crypto_generate_purls);

    if let Some(annotations) = annotations {
        write_annotations(doc, annotations, now);
    }

    doc.extra.remove("signature");
    doc.version = Some(doc.version.unwrap_or(1) + 1);
    doc.metadata.get_or_insert_with(Default::default).timestamp =
        Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));

    debug!(
        occurrences = summary.occurrences,
        callstacks = summary.callstacks,
        services = summary.services,
        crypto_components = summary.crypto_components,
        "evidence written to document"
    );
    summary
}

fn add_tags(comp: &mut Component, tags: &[&str]) {
    let existing = comp.tags.take().unwrap_or_default();
    let mut merged: BTreeSet<String> = existing.into_iter().collect();
    merged.extend(tags.iter().map(|t| (*t).to_owned()));
    comp.tags = Some(merged.into_iter().collect());
}

/// 이름이 같은 서비스는 엔드포인트를 합치고 인증 플래그를 OR로 병합합니다.
fn merge_services(doc: &mut BomDocument, detected: &BTreeMap<String, ServiceRecord>) -> usize {
    if detected.is_empty() {
        return 0;
    }
    let services = doc.services.get_or_insert_with(Vec::new);

    for (name, record) in detected {
        let position = services.iter().position(|s| s.name == *name);
        let service = match position {
            Some(i) => &mut services[i],
            None => {
                services.push(Service {
                    name: name.clone(),
                    ..Default::default()
                });
                let last = services.len() - 1;
                &mut services[last]
            }
        };

        let mut endpoints: BTreeSet<String> = service
            .endpoints
            .take()
            .unwrap_or_default()
            .into_iter()
            .collect();
        endpoints.extend(record.endpoints.iter().cloned());
        service.endpoints = (!endpoints.is_empty()).then(|| endpoints.into_iter().collect());

        if record.authenticated == Some(true) {
            service.authenticated = Some(true);
        } else if service.authenticated.is_none() {
            service.authenticated = record.authenticated;
        }
        if record.trust_boundary == Some(true) {
            service.trust_boundary = Some(true);
        }
    }
    detected.len()
}

fn crypto_component(algo: &CryptoAlgorithm, supports_crypto_assets: bool) -> Component {
    let mut extra = Map::new();
    let component_type = if supports_crypto_assets {
        let mut properties = Map::new();
        properties.insert("assetType".to_owned(), json!("algorithm"));
        if let Some(oid) = &algo.oid {
            properties.insert("oid".to_owned(), json!(oid));
        }
        extra.insert("cryptoProperties".to_owned(), Value::Object(properties));
        "cryptographic-asset"
    } else {
        "data"
    };
    Component {
        component_type: Some(component_type.to_owned()),
        name: Some(algo.name.clone()),
        bom_ref: Some(algo.reference.clone()),
        description: Some(algo.description.clone().unwrap_or_default()),
        extra,
        ..Default::default()
    }
}

fn append_crypto_components<'a>(
    doc: &mut BomDocument,
    algorithms: impl Iterator<Item = &'a CryptoAlgorithm>,
    supports_crypto_assets: bool,
) -> usize {
    let existing: BTreeSet<String> = doc
        .components
        .iter()
        .filter_map(|c| c.bom_ref.clone())
        .collect();
    let mut added = 0;
    for algo in algorithms {
        if existing.contains(&algo.reference) {
            continue;
        }
        doc.components
            .push(crypto_component(algo, supports_crypto_assets));
        added += 1;
    }
    added
}

fn add_provides(doc: &mut BomDocument, providers: &BTreeMap<String, BTreeSet<String>>) {
    let Some(dependencies) = doc.dependencies.as_mut() else {
        return;
    };
    for dep in dependencies.iter_mut() {
        let Some(algos) = providers.get(&dep.reference).filter(|a| !a.is_empty()) else {
            continue;
        };
        let mut provides: BTreeSet<String> = dep
            .provides
            .take()
            .unwrap_or_default()
            .into_iter()
            .collect();
        provides.extend(algos.iter().cloned());
        dep.provides = Some(provides.into_iter().collect());
    }
}

fn write_annotations(doc: &mut BomDocument, annotations: &[SliceAnnotation], now: DateTime<Utc>) {
    let annotator = doc.first_tool_component().cloned().unwrap_or_else(|| {
        json!({
            "type": "application",
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })
    });
    let subjects: Vec<&str> = doc.serial_number.as_deref().into_iter().collect();
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let written: Vec<Value> = annotations
        .iter()
        .map(|a| {
            json!({
                "subjects": subjects,
                "annotator": {"component": annotator},
                "timestamp": timestamp,
                "text": a.text,
            })
        })
        .collect();
    debug!(count = written.len(), "slice annotations written");
    doc.annotations = Some(written);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom::Frame;
    use chrono::TimeZone;

    const BOM: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
        "version": 2,
        "signature": {"algorithm": "ES256"},
        "metadata": {"tools": {"components": [{"type": "application", "name": "bom-generator"}]}},
        "components": [
            {"type": "library", "name": "slf4j-api", "purl": "pkg:maven/org.slf4j/slf4j-api@2.0.9",
             "signature": {"algorithm": "RS256"}},
            {"type": "library", "name": "bcprov", "purl": "pkg:maven/org.bouncycastle/bcprov@1.70",
             "bom-ref": "pkg:maven/org.bouncycastle/bcprov@1.70", "tags": ["security"]},
            {"type": "library", "name": "untouched", "purl": "pkg:maven/com.example/untouched@1.0"}
        ],
        "services": [{"name": "app-service", "endpoints": ["/health"]}],
        "dependencies": [{"ref": "pkg:maven/org.bouncycastle/bcprov@1.70", "dependsOn": []}]
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn frame(function: &str) -> Frame {
        Frame {
            function: function.to_owned(),
            full_filename: "src/App.java".to_owned(),
            ..Default::default()
        }
    }

    fn maps() -> EvidenceMaps {
        let aes = CryptoAlgorithm {
            reference: "crypto/algorithm/aes@2.16.840.1.101.3.4.1".to_owned(),
            name: "aes".to_owned(),
            oid: Some("2.16.840.1.101.3.4.1".to_owned()),
            description: None,
        };
        let mut maps = EvidenceMaps::default();
        maps.purl_locations.insert(
            "pkg:maven/org.slf4j/slf4j-api@2.0.9".to_owned(),
            BTreeSet::from(["src/B.java#2".to_owned(), "src/A.java#9".to_owned()]),
        );
        maps.data_flow_frames.insert(
            "pkg:maven/org.slf4j/slf4j-api@2.0.9".to_owned(),
            vec![vec![frame("main")]],
        );
        maps.crypto_generate_purls.insert(
            "pkg:maven/org.bouncycastle/bcprov@1.70".to_owned(),
            BTreeSet::from([aes.reference.clone()]),
        );
        maps.crypto_components.insert(aes.reference.clone(), aes);
        let mut record = ServiceRecord::default();
        record.endpoints.insert("/orders".to_owned());
        record.authenticated = Some(true);
        record.trust_boundary = Some(true);
        maps.services.insert("app-service".to_owned(), record);
        maps
    }

    fn doc() -> BomDocument {
        serde_json::from_str(BOM).unwrap()
    }

    #[test]
    fn writes_occurrences_and_callstack() {
        let mut doc = doc();
        let summary = apply_evidence(&mut doc, &maps(), None, now());
        assert_eq!(summary.occurrences, 1);
        assert_eq!(summary.callstacks, 1);
        assert!(summary.has_evidence());

        let evidence = doc.components[0].evidence.as_ref().unwrap();
        let locations: Vec<&str> = evidence
            .occurrences
            .as_ref()
            .unwrap()
            .iter()
            .map(|o| o.location.as_str())
            .collect();
        assert_eq!(locations, vec!["src/A.java#9", "src/B.java#2"]);
        assert_eq!(
            evidence.callstack.as_ref().unwrap().frames.as_ref().unwrap()[0].function,
            "main"
        );
        assert!(doc.components[2].evidence.is_none());
    }

    #[test]
    fn strips_signatures_and_bumps_version() {
        let mut doc = doc();
        apply_evidence(&mut doc, &maps(), None, now());
        assert!(doc.components[0].signature.is_none());
        assert!(!doc.extra.contains_key("signature"));
        assert_eq!(doc.version, Some(3));
        assert_eq!(
            doc.metadata.as_ref().unwrap().timestamp.as_deref(),
            Some("2024-05-01T12:00:00.000Z")
        );
    }

    #[test]
    fn missing_version_is_bumped_from_one() {
        let mut doc = doc();
        doc.version = None;
        apply_evidence(&mut doc, &maps(), None, now());
        assert_eq!(doc.version, Some(2));
    }

    #[test]
    fn crypto_provider_is_tagged_and_linked() {
        let mut doc = doc();
        let summary = apply_evidence(&mut doc, &maps(), None, now());
        assert_eq!(summary.crypto_providers, 1);
        assert_eq!(
            doc.components[1].tags.as_deref().unwrap(),
            ["crypto", "crypto-generate", "security"]
        );
        let provides = doc.dependencies.as_ref().unwrap()[0].provides.as_ref().unwrap();
        assert_eq!(provides, &vec!["crypto/algorithm/aes@2.16.840.1.101.3.4.1".to_owned()]);
    }

    #[test]
    fn crypto_asset_type_depends_on_spec_version() {
        let mut old = doc();
        apply_evidence(&mut old, &maps(), None, now());
        let added = old.components.last().unwrap();
        assert_eq!(added.component_type.as_deref(), Some("data"));
        assert!(!added.extra.contains_key("cryptoProperties"));

        let mut new = doc();
        new.spec_version = Some("1.6".to_owned());
        apply_evidence(&mut new, &maps(), None, now());
        let added = new.components.last().unwrap();
        assert_eq!(added.component_type.as_deref(), Some("cryptographic-asset"));
        assert_eq!(added.extra["cryptoProperties"]["assetType"], "algorithm");
        assert_eq!(added.description.as_deref(), Some(""));
    }

    #[test]
    fn crypto_component_is_not_duplicated() {
        let mut doc = doc();
        apply_evidence(&mut doc, &maps(), None, now());
        let count = doc.components.len();
        let summary = apply_evidence(&mut doc, &maps(), None, now());
        assert_eq!(summary.crypto_components, 0);
        assert_eq!(doc.components.len(), count);
    }

    #[test]
    fn services_merge_by_name() {
        let mut doc = doc();
        apply_evidence(&mut doc, &maps(), None, now());
        let services = doc.services.as_ref().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(
            services[0].endpoints.as_deref().unwrap(),
            ["/health", "/orders"]
        );
        assert_eq!(services[0].authenticated, Some(true));
        assert_eq!(services[0].trust_boundary, Some(true));
    }

    #[test]
    fn annotations_carry_slice_text() {
        let mut doc = doc();
        let annotations = [SliceAnnotation {
            kind: SliceKind::Usages,
            path: "usages.slices.json".to_owned(),
            text: "{\"objectSlices\":[]}".to_owned(),
        }];
        apply_evidence(&mut doc, &maps(), Some(&annotations), now());
        let written = doc.annotations.as_ref().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written[0]["subjects"][0],
            "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79"
        );
        assert_eq!(written[0]["annotator"]["component"]["name"], "bom-generator");
        assert_eq!(written[0]["text"], "{\"objectSlices\":[]}");
    }

    #[test]
    fn empty_maps_leave_components_untouched() {
        let mut doc = doc();
        let summary = apply_evidence(&mut doc, &EvidenceMaps::default(), None, now());
        assert!(!summary.has_evidence());
        assert!(doc.components.iter().all(|c| c.evidence.is_none()));
        assert_eq!(doc.services.as_ref().unwrap()[0].endpoints.as_deref().unwrap(), ["/health"]);
    }
}
