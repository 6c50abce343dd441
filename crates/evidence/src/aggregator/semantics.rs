//! semantics 슬라이스(Swift)에서 모듈 심볼 위치 수집

use std::collections::{BTreeMap, BTreeSet};

use crate::sbom::Component;
use crate::slices::SemanticsSlice;
use crate::types::location;

/// 컴포넌트 이름과 같은 모듈의 심볼이 등장하는 `file#line` 위치를 purl별로 모읍니다.
pub(crate) fn collect_semantic_locations(
    components: &[Component],
    slice: &SemanticsSlice,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut result: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for comp in components {
        let (Some(name), Some(purl)) = (comp.name.as_deref(), comp.purl.as_deref()) else {
            continue;
        };

        let mut symbols: BTreeSet<&str> = BTreeSet::new();
        if let Some(build) = slice.build_symbols.get(name) {
            symbols.extend(build.iter().map(String::as_str));
        }
        if let Some(info) = slice.module_infos.get(name) {
            symbols.extend(info.symbols().map(String::as_str));
        }
        if symbols.is_empty() {
            continue;
        }

        for (file, index) in &slice.file_indexes {
            for (symbol, lines) in &index.symbol_locations {
                if !symbols.contains(symbol.as_str()) {
                    continue;
                }
                let entry = result.entry(purl.to_owned()).or_default();
                entry.extend(lines.iter().map(|line| location(file, *line)));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLICE: &str = r#"{
        "buildSymbols": {"Alamofire": ["Session"]},
        "moduleInfos": {
            "Alamofire": {
                "classes": ["DataRequest"],
                "classMethods": {"Session": ["request(_:)"]}
            }
        },
        "fileIndexes": {
            "Sources/App/Api.swift": {
                "symbolLocations": {
                    "Session": [12, 4],
                    "request(_:)": [13],
                    "URLSession": [40]
                }
            },
            "Sources/App/Other.swift": {
                "symbolLocations": {"DataRequest": [2]}
            }
        }
    }"#;

    fn component(name: &str, purl: &str) -> Component {
        Component {
            name: Some(name.to_owned()),
            purl: Some(purl.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn module_symbols_map_to_locations() {
        let slice: SemanticsSlice = serde_json::from_str(SLICE).unwrap();
        let comps = vec![
            component("Alamofire", "pkg:swift/github.com/Alamofire/Alamofire@5.8.0"),
            component("Unused", "pkg:swift/example/unused@1.0.0"),
        ];
        let result = collect_semantic_locations(&comps, &slice);

        assert_eq!(result.len(), 1);
        let locations: Vec<&str> = result["pkg:swift/github.com/Alamofire/Alamofire@5.8.0"]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            locations,
            vec![
                "Sources/App/Api.swift#12",
                "Sources/App/Api.swift#13",
                "Sources/App/Api.swift#4",
                "Sources/App/Other.swift#2",
            ]
        );
    }

    #[test]
    fn empty_slice_yields_nothing() {
        let comps = vec![component("Alamofire", "pkg:swift/a@1")];
        assert!(collect_semantic_locations(&comps, &SemanticsSlice::default()).is_empty());
    }
}
