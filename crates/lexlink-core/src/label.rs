//! Language-preference label selection
//!
//! Both selections are pure functions of (preferences, attribute). The
//! preferences are fixed per deployment, so [`LabelSelector`] memoizes results
//! by attribute value. The caches are unbounded and only valid while the
//! attributes come from a store that is not mutated in place; call
//! [`LabelSelector::clear`] when the store is swapped.

use crate::entity::{Attr, Value};
use crate::node::Literal;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a label selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// The attribute carried no language tags and is returned as-is
    Unchanged(Attr),
    One(Literal),
    /// Two or more strings in the preferred language
    Many(BTreeSet<Literal>),
}

impl Selected {
    /// Text of a single-string selection
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::One(lit) => Some(&lit.value),
            Self::Unchanged(Attr::One(Value::Literal(lit))) => Some(&lit.value),
            _ => None,
        }
    }
}

/// Pick the string for the first preference that has one; no fallback
pub fn select_one(preferences: &[String], attr: &Attr) -> Option<Selected> {
    if !attr.is_lang_tagged() {
        return Some(Selected::Unchanged(attr.clone()));
    }

    let mut by_lang: BTreeMap<String, &Literal> = BTreeMap::new();
    for lit in attr.iter().filter_map(Value::as_literal) {
        if let Some(lang) = &lit.lang {
            by_lang.entry(lang.to_ascii_lowercase()).or_insert(lit);
        }
    }

    preferences
        .iter()
        .find_map(|pref| by_lang.get(&pref.to_ascii_lowercase()))
        .map(|lit| Selected::One((*lit).clone()))
}

/// Every string for the first matching preference; a lone match collapses to it
pub fn select_all(preferences: &[String], attr: &Attr) -> Option<Selected> {
    if !attr.is_lang_tagged() {
        return Some(Selected::Unchanged(attr.clone()));
    }

    let mut by_lang: BTreeMap<String, BTreeSet<Literal>> = BTreeMap::new();
    for lit in attr.iter().filter_map(Value::as_literal) {
        if let Some(lang) = &lit.lang {
            by_lang
                .entry(lang.to_ascii_lowercase())
                .or_default()
                .insert(lit.clone());
        }
    }

    let mut matches = preferences
        .iter()
        .find_map(|pref| by_lang.remove(&pref.to_ascii_lowercase()))?;
    if matches.len() == 1 {
        matches.pop_first().map(Selected::One)
    } else {
        Some(Selected::Many(matches))
    }
}

/// Language-preference selector with value-keyed memoization
#[derive(Debug)]
pub struct LabelSelector {
    preferences: Vec<String>,
    one_cache: DashMap<Attr, Option<Selected>>,
    all_cache: DashMap<Attr, Option<Selected>>,
}

impl LabelSelector {
    pub fn new<I, S>(preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferences: preferences.into_iter().map(Into::into).collect(),
            one_cache: DashMap::new(),
            all_cache: DashMap::new(),
        }
    }

    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }

    pub fn select_one(&self, attr: &Attr) -> Option<Selected> {
        if let Some(hit) = self.one_cache.get(attr) {
            return hit.value().clone();
        }
        let selected = select_one(&self.preferences, attr);
        self.one_cache.insert(attr.clone(), selected.clone());
        selected
    }

    pub fn select_all(&self, attr: &Attr) -> Option<Selected> {
        if let Some(hit) = self.all_cache.get(attr) {
            return hit.value().clone();
        }
        let selected = select_all(&self.preferences, attr);
        self.all_cache.insert(attr.clone(), selected.clone());
        selected
    }

    /// Display text for a label attribute.
    ///
    /// Strict preference first; otherwise the smallest literal string, so a
    /// label in an unpreferred language still beats an opaque identifier.
    pub fn display_text(&self, attr: &Attr) -> Option<String> {
        if let Some(text) = self.select_one(attr).as_ref().and_then(Selected::text) {
            return Some(text.to_string());
        }
        attr.iter()
            .filter_map(Value::as_literal)
            .map(|lit| lit.value.clone())
            .min()
    }

    pub fn cached_len(&self) -> usize {
        self.one_cache.len() + self.all_cache.len()
    }

    pub fn clear(&self) {
        self.one_cache.clear();
        self.all_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Iri;

    fn prefs(langs: &[&str]) -> Vec<String> {
        langs.iter().map(|s| s.to_string()).collect()
    }

    fn house() -> Attr {
        Attr::from_values(vec![
            Literal::lang("hus", "da").into(),
            Literal::lang("house", "en").into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_one_strict_preference() {
        assert_eq!(
            select_one(&prefs(&["da", "en"]), &house()),
            Some(Selected::One(Literal::lang("hus", "da")))
        );
        assert_eq!(
            select_one(&prefs(&["en"]), &house()),
            Some(Selected::One(Literal::lang("house", "en")))
        );
        assert_eq!(select_one(&prefs(&["de"]), &house()), None);
    }

    #[test]
    fn test_untagged_passes_through() {
        let attr = Attr::One(Value::Iri(Iri::new("http://x/a")));
        assert_eq!(
            select_one(&prefs(&["da"]), &attr),
            Some(Selected::Unchanged(attr.clone()))
        );
        assert_eq!(
            select_all(&prefs(&["da"]), &attr),
            Some(Selected::Unchanged(attr))
        );
    }

    #[test]
    fn test_select_all_never_singleton() {
        let attr = Attr::from_values(vec![
            Literal::lang("kage", "da").into(),
            Literal::lang("bagværk", "da").into(),
            Literal::lang("cake", "en").into(),
        ])
        .unwrap();

        match select_all(&prefs(&["da"]), &attr) {
            Some(Selected::Many(set)) => assert_eq!(set.len(), 2),
            other => panic!("expected two Danish strings, got {:?}", other),
        }
        assert_eq!(
            select_all(&prefs(&["en", "da"]), &attr),
            Some(Selected::One(Literal::lang("cake", "en")))
        );
        assert_eq!(select_all(&prefs(&["sv"]), &attr), None);
    }

    #[test]
    fn test_selector_caches_by_value() {
        let selector = LabelSelector::new(["da", "en"]);
        let first = selector.select_one(&house());
        let second = selector.select_one(&house());
        assert_eq!(first, second);
        assert_eq!(selector.cached_len(), 1);

        selector.clear();
        assert_eq!(selector.cached_len(), 0);
    }

    #[test]
    fn test_display_text_falls_back() {
        let selector = LabelSelector::new(["de"]);
        assert_eq!(selector.display_text(&house()).as_deref(), Some("house"));
        let plain = Attr::One(Literal::plain("kage").into());
        assert_eq!(selector.display_text(&plain).as_deref(), Some("kage"));
    }
}
