//! purl별 import 별칭 테이블

use std::collections::{BTreeMap, BTreeSet};

use crate::symbol::{ImportMatch, SymbolRules};

/// SBOM 컴포넌트 속성에서 수집한 purl → import 별칭 목록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ImportMap {
    /// 빈 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 구분자로 나뉜 별칭 문자열을 purl에 등록합니다. 빈 별칭은 버립니다.
    pub fn insert_joined(&mut self, purl: &str, joined: &str, separator: &str) {
        let aliases: Vec<String> = joined
            .split(separator)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_owned)
            .collect();
        if aliases.is_empty() {
            return;
        }
        self.entries
            .entry(purl.to_owned())
            .or_default()
            .extend(aliases);
    }

    /// 별칭 목록을 purl에 등록합니다.
    pub fn insert(&mut self, purl: impl Into<String>, aliases: Vec<String>) {
        let aliases: Vec<String> = aliases.into_iter().filter(|a| !a.trim().is_empty()).collect();
        if !aliases.is_empty() {
            self.entries.entry(purl.into()).or_default().extend(aliases);
        }
    }

    /// 등록된 purl이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 등록된 purl 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// purl의 별칭 목록
    pub fn aliases(&self, purl: &str) -> Option<&[String]> {
        self.entries.get(purl).map(Vec::as_slice)
    }

    /// 심볼과 일치하는 별칭을 가진 purl 집합
    ///
    /// [`ImportMatch::Prefix`] 언어는 어느 한 쪽이 다른 쪽의 접두사이면 일치로 봅니다.
    /// 짧은 별칭은 과매칭될 수 있습니다.
    pub fn matches(&self, rules: &dyn SymbolRules, symbol: &str) -> BTreeSet<String> {
        let mode = rules.import_match();
        self.entries
            .iter()
            .filter(|(_, aliases)| {
                aliases.iter().any(|alias| match mode {
                    ImportMatch::Exact => alias == symbol,
                    ImportMatch::Prefix => {
                        symbol.starts_with(alias.as_str()) || alias.starts_with(symbol)
                    }
                })
            })
            .map(|(purl, _)| purl.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::rules_for;
    use crate::types::Language;

    fn sample() -> ImportMap {
        let mut map = ImportMap::new();
        map.insert_joined("pkg:gem/faraday@2.7.0", "Faraday, Faraday::Connection", ", ");
        map.insert_joined("pkg:npm/express@4.18.2", "express,,express/Router", ",");
        map
    }

    #[test]
    fn blank_aliases_are_discarded() {
        let map = sample();
        assert_eq!(
            map.aliases("pkg:npm/express@4.18.2"),
            Some(&["express".to_owned(), "express/Router".to_owned()][..])
        );

        let mut empty = ImportMap::new();
        empty.insert_joined("pkg:npm/left-pad@1.0.0", " , ", ",");
        assert!(empty.is_empty());
    }

    #[test]
    fn exact_match_for_static_imports() {
        let map = sample();
        let rules = rules_for(Language::JavaScript);
        assert_eq!(
            map.matches(rules, "express"),
            BTreeSet::from(["pkg:npm/express@4.18.2".to_owned()])
        );
        assert!(map.matches(rules, "expres").is_empty());
    }

    #[test]
    fn prefix_match_is_bidirectional() {
        let map = sample();
        let rules = rules_for(Language::Ruby);
        let expected = BTreeSet::from(["pkg:gem/faraday@2.7.0".to_owned()]);
        // 심볼이 별칭으로 시작
        assert_eq!(map.matches(rules, "Faraday::Response"), expected);
        // 별칭이 심볼로 시작
        assert_eq!(map.matches(rules, "Fara"), expected);
        assert!(map.matches(rules, "Nokogiri").is_empty());
    }
}
