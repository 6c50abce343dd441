//! usages 슬라이스에서 해석 후보 심볼 수집

use std::collections::{BTreeSet, HashMap};

use crate::slices::{Call, ObjectSlice, Usage};
use crate::symbol::{SymbolRules, class_type_from_signature, is_filterable_type, rules_for, simplify_type};
use crate::types::{Language, UserDefinedTypes, location};

/// 외부 여부와 무관하게 후보에서 빼는 자리표시 값
const EMPTY_MARKERS: &[&str] = &["ANY", "(...)", "<empty>"];

/// 슬라이스 하나에서 모은 후보
#[derive(Debug, Default)]
pub(crate) struct SliceCandidates {
    /// 해석할 심볼
    pub lookups: BTreeSet<String>,
    /// 심볼 → 처음 관찰된 `file#line`
    pub overrides: HashMap<String, String>,
}

impl SliceCandidates {
    fn add_override(&mut self, symbol: &str, file: &str, line: Option<u64>) {
        if let Some(line) = line {
            self.overrides
                .entry(symbol.to_owned())
                .or_insert_with(|| location(file, line));
        }
    }
}

struct Collector<'a> {
    language: Language,
    rules: &'static dyn SymbolRules,
    udts: &'a UserDefinedTypes,
    file: &'a str,
    out: SliceCandidates,
}

impl Collector<'_> {
    /// 심볼 자체와 클래스 수준 이름을 후보에 넣습니다.
    ///
    /// `raw_override`가 참이면 축약 전 심볼에도 위치를 기록합니다.
    fn signature(&mut self, symbol: &str, line: Option<u64>, raw_override: bool) {
        if is_filterable_type(self.language, self.udts, symbol) {
            return;
        }
        if !symbol.contains('(') && !symbol.contains(".py") {
            let simplified = simplify_type(symbol);
            self.out.lookups.insert(simplified.clone());
            if raw_override && line.is_some() {
                if self.rules.call_node_lines() && symbol.contains(':') {
                    let head = symbol.split("::").next().unwrap_or_default();
                    self.out.lookups.insert(simplify_type(&head.replace(':', "/")));
                }
                self.out.add_override(&simplified, self.file, line);
            }
        }
        if let Some(class_type) = class_type_from_signature(self.language, symbol) {
            self.out.lookups.insert(class_type.clone());
            self.out.add_override(&class_type, self.file, line);
        }
    }

    /// 슬라이스 자체가 어노테이션이나 `use` import인 경우
    fn slice_level(&mut self, slice: &ObjectSlice) {
        if !slice.usages.is_empty() {
            return;
        }
        let is_annotation = slice.signature.as_deref().is_some_and(|s| s.starts_with('@'));
        let is_use = slice.code.as_deref().is_some_and(|c| c.starts_with("use"));
        if !(is_annotation || is_use) {
            return;
        }
        if let Some(full_name) = slice.full_name.as_deref().filter(|n| !n.is_empty()) {
            self.out.lookups.insert(full_name.to_owned());
            self.out.add_override(full_name, self.file, slice.line_number);
        }
    }

    fn usage(&mut self, usage: &Usage) {
        let line = usage.line_number();
        let target = usage.target_obj.as_ref();
        let defined = usage.defined_by.as_ref();
        let scoped_name = defined
            .and_then(|d| d.name.as_deref())
            .map(|n| (Some(n.contains("::")), Some(n)));

        let mut typed: Vec<(Option<bool>, Option<&str>)> = vec![
            (
                target.and_then(|t| t.is_external),
                target.and_then(|t| t.type_full_name.as_deref()),
            ),
            (
                target.and_then(|t| t.is_external),
                target.and_then(|t| t.resolved_method.as_deref()),
            ),
            scoped_name.unwrap_or((None, None)),
            (
                defined.and_then(|d| d.is_external),
                defined.and_then(|d| d.type_full_name.as_deref()),
            ),
            (
                defined.and_then(|d| d.is_external),
                defined.and_then(|d| d.resolved_method.as_deref()),
            ),
        ];
        typed.extend(
            usage
                .fields
                .iter()
                .map(|f| (f.is_external, f.type_full_name.as_deref())),
        );

        let raw_override = self.rules.call_node_lines();
        for (external, symbol) in typed {
            let Some(symbol) = symbol else {
                continue;
            };
            if external != Some(true) && EMPTY_MARKERS.contains(&symbol) {
                continue;
            }
            // 명시적으로 내부 심볼이면 제외, 정보가 없으면 후보로 둠
            if external == Some(false) {
                continue;
            }
            self.signature(symbol, line, raw_override);
        }

        for call in usage.all_calls() {
            self.call(call);
        }
    }

    fn call(&mut self, call: &Call) {
        let resolved = call.resolved_method.as_deref().unwrap_or_default();
        let call_name = call.call_name.as_deref().unwrap_or_default();

        if resolved.starts_with('@') || call_name.contains("::") {
            if !call_name.is_empty() {
                self.out.lookups.insert(call_name.to_owned());
                self.out.add_override(call_name, self.file, call.line_number);
            }
        } else if call.is_external == Some(false) {
            return;
        }

        self.signature(resolved, call.line_number, true);
        for param in &call.param_types {
            self.signature(param, call.line_number, true);
        }
    }
}

/// 객체 슬라이스 하나에서 해석 후보를 모읍니다.
pub(crate) fn collect_candidates(
    language: Language,
    udts: &UserDefinedTypes,
    slice: &ObjectSlice,
) -> SliceCandidates {
    let mut collector = Collector {
        language,
        rules: rules_for(language),
        udts,
        file: slice.file_name.as_deref().unwrap_or_default(),
        out: SliceCandidates::default(),
    };
    collector.slice_level(slice);
    for usage in &slice.usages {
        collector.usage(usage);
    }
    collector.out
}
