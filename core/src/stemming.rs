//! Stemming rule sets: ordered sandhi rules per grammatical key.
//!
//! A rule set answers two questions:
//! - forward (`inflect`): given a stem and a key, which endings apply?
//! - backward (`possible_stems`): given a finished word form, which
//!   (key, stem) pairs could have produced it?
//!
//! Rule sets are assembled with [`StemmingRuleSetBuilder`] and frozen with
//! [`StemmingRuleSetBuilder::build`]. A built set is immutable and can be
//! shared across threads.
use ahash::AHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::Result;
use crate::sandhi::SandhiRule;
use crate::tags::{TagFilter, TagSet};
use crate::utils;

/// One way of inflecting a stem for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflection {
    /// The stem with the rule's `b` part removed.
    pub base: String,
    /// The rule's distinguisher, appended to `base`.
    pub ending: String,
    pub rule: Arc<SandhiRule>,
    /// True when only catch-all rules matched the stem.
    pub used_default: bool,
}

impl Inflection {
    /// The surface form, `base + ending`.
    pub fn form(&self) -> String {
        format!("{}{}", self.base, self.ending)
    }
}

/// A (key, stem) pair recovered from a word form, with the rule that
/// recovered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemCandidate {
    pub key: String,
    pub stem: String,
    pub rule: Arc<SandhiRule>,
}

/// Rules that share one surface ending.
#[derive(Debug, Clone)]
struct SurfaceGroup {
    surface: String,
    entries: Vec<(String, Arc<SandhiRule>)>,
}

/// Mutable phase of a [`StemmingRuleSet`].
///
/// Keys and rule strings are NFC-normalized and trimmed on the way in,
/// matching what `Inflexion` does to its queries under the default config.
#[derive(Debug, Clone)]
pub struct StemmingRuleSetBuilder {
    rules_by_key: AHashMap<String, Vec<Arc<SandhiRule>>>,
    key_order: Vec<String>,
    surfaces: Vec<SurfaceGroup>,
    surface_index: AHashMap<String, usize>,
    rule_count: usize,
    normalize: bool,
}

impl Default for StemmingRuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StemmingRuleSetBuilder {
    pub fn new() -> Self {
        Self {
            rules_by_key: AHashMap::new(),
            key_order: Vec::new(),
            surfaces: Vec::new(),
            surface_index: AHashMap::new(),
            rule_count: 0,
            normalize: true,
        }
    }

    /// Turn input normalization on or off for the rules added after this
    /// call. Pair `false` with an engine whose `normalize_input` is off.
    pub fn normalize_input(&mut self, on: bool) -> &mut Self {
        self.normalize = on;
        self
    }

    /// Parse `rule` and register it under `key`.
    ///
    /// Rules for the same key are kept in the order they are added; that
    /// order is the order `inflect` reports them in.
    pub fn add(&mut self, key: &str, rule: &str) -> Result<Arc<SandhiRule>> {
        let rule = SandhiRule::new(&utils::prepare(rule, self.normalize))?;
        self.register(key, rule)
    }

    /// Like [`add`](Self::add), attaching `+name` / `-name` tags to the rule.
    pub fn add_tagged<I, S>(&mut self, key: &str, rule: &str, tags: I) -> Result<Arc<SandhiRule>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = TagSet::parse(tags)?;
        let rule = SandhiRule::with_tags(&utils::prepare(rule, self.normalize), tags)?;
        self.register(key, rule)
    }

    fn register(&mut self, key: &str, rule: SandhiRule) -> Result<Arc<SandhiRule>> {
        let key = utils::prepare(key, self.normalize);
        let key = key.as_str();
        let rule = Arc::new(rule);

        match self.rules_by_key.get_mut(key) {
            Some(rules) => rules.push(Arc::clone(&rule)),
            None => {
                self.key_order.push(key.to_string());
                self.rules_by_key
                    .insert(key.to_string(), vec![Arc::clone(&rule)]);
            }
        }
        self.rule_count += 1;

        let idx = match self.surface_index.get(rule.surface()) {
            Some(&idx) => idx,
            None => {
                self.surfaces.push(SurfaceGroup {
                    surface: rule.surface().to_string(),
                    entries: Vec::new(),
                });
                let idx = self.surfaces.len() - 1;
                self.surface_index.insert(rule.surface().to_string(), idx);
                idx
            }
        };

        // Two rules with the same key, theme, `b` and tags recover the same
        // stem from the same surface under every filter; record that pair
        // only once.
        let group = &mut self.surfaces[idx];
        let duplicate = group.entries.iter().any(|(k, r)| {
            k == key && r.theme() == rule.theme() && r.b() == rule.b() && r.tags() == rule.tags()
        });
        if !duplicate {
            group.entries.push((key.to_string(), Arc::clone(&rule)));
        }

        trace!(key, rule = %rule, surface = rule.surface(), "registered sandhi rule");
        Ok(rule)
    }

    /// Freeze the rule set.
    pub fn build(self) -> StemmingRuleSet {
        debug!(
            keys = self.key_order.len(),
            rules = self.rule_count,
            surfaces = self.surfaces.len(),
            "built stemming rule set"
        );
        StemmingRuleSet {
            rules_by_key: self.rules_by_key,
            key_order: self.key_order,
            surfaces: self.surfaces,
            rule_count: self.rule_count,
        }
    }
}

/// Immutable collection of sandhi rules keyed by grammatical key, with a
/// reverse index from surface endings.
#[derive(Debug, Clone, Default)]
pub struct StemmingRuleSet {
    rules_by_key: AHashMap<String, Vec<Arc<SandhiRule>>>,
    key_order: Vec<String>,
    surfaces: Vec<SurfaceGroup>,
    rule_count: usize,
}

impl StemmingRuleSet {
    /// Start assembling a rule set.
    ///
    /// # Example
    /// ```
    /// use inflexion_core::StemmingRuleSet;
    ///
    /// let mut builder = StemmingRuleSet::builder();
    /// builder.add("foo", "A|B>C<D|E").unwrap();
    /// let rules = builder.build();
    ///
    /// let forms: Vec<String> = rules.inflect("FAB", "foo").iter().map(|i| i.form()).collect();
    /// assert_eq!(forms, vec!["FACE".to_string()]);
    /// ```
    pub fn builder() -> StemmingRuleSetBuilder {
        StemmingRuleSetBuilder::new()
    }

    /// Rules registered for `key`, in insertion order. Unknown keys give an
    /// empty slice.
    pub fn rules_for(&self, key: &str) -> &[Arc<SandhiRule>] {
        self.rules_by_key
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Keys in the order they were first registered.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.key_order.iter().map(|k| k.as_str())
    }

    /// Inflect `stem` for `key` with no tag filter.
    pub fn inflect(&self, stem: &str, key: &str) -> Vec<Inflection> {
        self.inflect_tagged(stem, key, &TagFilter::empty())
    }

    /// Inflect `stem` for `key`.
    ///
    /// Every admitted rule whose stem matches contributes one result. Rules
    /// with a non-empty stem are specific and always win: catch-all rules
    /// (empty stem) are only reported when no specific rule matched, and
    /// then with `used_default` set.
    pub fn inflect_tagged(&self, stem: &str, key: &str, filter: &TagFilter) -> Vec<Inflection> {
        let mut specific = Vec::new();
        let mut fallback = Vec::new();

        for rule in self.rules_for(key) {
            if !rule.admits(filter) {
                continue;
            }
            let Some(base) = rule.match_theme(stem) else {
                continue;
            };
            if rule.is_default() {
                fallback.push((base, rule));
            } else {
                specific.push((base, rule));
            }
        }

        let (matched, used_default) = if specific.is_empty() {
            (fallback, true)
        } else {
            (specific, false)
        };
        trace!(stem, key, matched = matched.len(), used_default, "inflect");

        matched
            .into_iter()
            .map(|(base, rule)| Inflection {
                base,
                ending: rule.distinguisher().to_string(),
                rule: Arc::clone(rule),
                used_default,
            })
            .collect()
    }

    /// Every (key, stem) pair some rule could have turned into `form`.
    pub fn possible_stems<'a>(&'a self, form: &'a str) -> impl Iterator<Item = (String, String)> + 'a {
        self.candidates(form).map(|c| (c.key, c.stem))
    }

    /// Like [`possible_stems`](Self::possible_stems), keeping the rule that
    /// produced each candidate.
    ///
    /// Surfaces are visited in the order they were first registered. Each
    /// rule re-checks its own theme against what precedes its ending, so two
    /// rules sharing a surface string but splitting it differently are told
    /// apart.
    pub fn candidates<'a>(&'a self, form: &'a str) -> impl Iterator<Item = StemCandidate> + 'a {
        self.surfaces.iter().flat_map(move |group| {
            group.entries.iter().filter_map(move |(key, rule)| {
                let stem = rule.unmatch_surface(form)?;
                trace!(form, surface = %group.surface, key = %key, stem = %stem, "stem candidate");
                Some(StemCandidate {
                    key: key.clone(),
                    stem,
                    rule: Arc::clone(rule),
                })
            })
        })
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(rules: &[(&str, &str)]) -> StemmingRuleSet {
        let mut b = StemmingRuleSet::builder();
        for (key, rule) in rules {
            b.add(key, rule).unwrap();
        }
        b.build()
    }

    #[test]
    fn possible_stems_single_rule() {
        let rules = build(&[("foo", "A|B>C<D|E")]);
        let stems: Vec<_> = rules.possible_stems("FACE").collect();
        assert_eq!(stems, vec![("foo".to_string(), "FAB".to_string())]);
    }

    #[test]
    fn inflect_single_rule() {
        let mut b = StemmingRuleSet::builder();
        let r = b.add("foo", "A|B>C<D|E").unwrap();
        let rules = b.build();

        assert_eq!(
            rules.inflect("FAB", "foo"),
            vec![Inflection {
                base: "FA".into(),
                ending: "CE".into(),
                rule: r,
                used_default: false,
            }]
        );
    }

    #[test]
    fn specific_rule_beats_default() {
        let mut b = StemmingRuleSet::builder();
        let r = b.add("foo", "A|B>C<D|E").unwrap();
        b.add("foo", "|>C<D|E").unwrap();
        let rules = b.build();

        assert_eq!(
            rules.inflect("FAB", "foo"),
            vec![Inflection {
                base: "FA".into(),
                ending: "CE".into(),
                rule: r,
                used_default: false,
            }]
        );
    }

    #[test]
    fn default_used_when_nothing_specific_matches() {
        let mut b = StemmingRuleSet::builder();
        b.add("foo", "X|Y>C<D|E").unwrap();
        let r = b.add("foo", "|>C<D|E").unwrap();
        let rules = b.build();

        assert_eq!(
            rules.inflect("FAB", "foo"),
            vec![Inflection {
                base: "FAB".into(),
                ending: "CE".into(),
                rule: r,
                used_default: true,
            }]
        );
    }

    #[test]
    fn multiple_specific_rules_keep_insertion_order() {
        let rules = build(&[("k", "|b>x<|"), ("k", "a|b>y<|"), ("k", "|>z<|")]);
        let forms: Vec<String> = rules.inflect("ab", "k").iter().map(|i| i.form()).collect();
        assert_eq!(forms, vec!["ax", "ay"]);
    }

    #[test]
    fn unknown_key_is_empty() {
        let rules = build(&[("foo", "A|B>C<D|E")]);
        assert!(rules.inflect("FAB", "bar").is_empty());
        assert!(rules.rules_for("bar").is_empty());
    }

    #[test]
    fn tagged_rules_respect_filter() {
        let mut b = StemmingRuleSet::builder();
        b.add_tagged("k", "|>s<|", ["+pl"]).unwrap();
        b.add_tagged("k", "|>_<|", ["-pl"]).unwrap();
        let rules = b.build();

        let plain: Vec<String> = rules.inflect("cat", "k").iter().map(|i| i.form()).collect();
        assert_eq!(plain, vec!["cat_"]);

        let pl: TagFilter = ["pl"].into_iter().collect();
        let plural: Vec<String> = rules
            .inflect_tagged("cat", "k", &pl)
            .iter()
            .map(|i| i.form())
            .collect();
        assert_eq!(plural, vec!["cats"]);
    }

    #[test]
    fn excluded_specific_rule_lets_default_through() {
        let mut b = StemmingRuleSet::builder();
        b.add_tagged("k", "|t>d<|", ["+voiced"]).unwrap();
        b.add("k", "|>s<|").unwrap();
        let rules = b.build();

        let out = rules.inflect("cat", "k");
        assert_eq!(out.len(), 1);
        assert!(out[0].used_default);
        assert_eq!(out[0].form(), "cats");
    }

    #[test]
    fn shared_surface_is_disambiguated_by_theme() {
        // Both rules show the surface "ae", split differently.
        let rules = build(&[("k1", "a|>e<|"), ("k2", "|>ae<|")]);
        let mut stems: Vec<_> = rules.possible_stems("bae").collect();
        stems.sort();
        assert_eq!(
            stems,
            vec![
                ("k1".to_string(), "ba".to_string()),
                ("k2".to_string(), "b".to_string()),
            ]
        );
        // Neither ending fits here.
        assert_eq!(rules.possible_stems("bxe").count(), 0);
    }

    #[test]
    fn duplicate_reverse_entries_collapse() {
        let rules = build(&[("k", "a|b>c<d|e"), ("k", "a|b>c<x|e")]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.possible_stems("zace").count(), 1);
    }

    #[test]
    fn tag_distinct_rules_keep_their_own_reverse_entries() {
        let mut b = StemmingRuleSet::builder();
        b.add_tagged("pl", "|>s<|", ["+formal"]).unwrap();
        b.add_tagged("pl", "|>s<|", ["-formal"]).unwrap();
        let rules = b.build();

        let tags: Vec<String> = rules
            .candidates("cats")
            .map(|c| c.rule.tags().to_string())
            .collect();
        assert_eq!(tags, vec!["+formal", "-formal"]);
    }

    #[test]
    fn keys_and_rules_are_normalized_by_default() {
        let mut b = StemmingRuleSet::builder();
        // Decomposed "é" in the rule, padded key.
        let rule = b.add(" k ", " |e\u{301}>es<| ").unwrap();
        let rules = b.build();

        assert_eq!(rule.b(), "\u{e9}");
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["k"]);
        let forms: Vec<String> = rules.inflect("caf\u{e9}", "k").iter().map(|i| i.form()).collect();
        assert_eq!(forms, vec!["cafes"]);
    }

    #[test]
    fn normalization_can_be_switched_off() {
        let mut b = StemmingRuleSet::builder();
        b.normalize_input(false);
        b.add(" k", "|>s<|").unwrap();
        let rules = b.build();
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec![" k"]);
        assert!(rules.rules_for("k").is_empty());
    }

    #[test]
    fn keys_in_first_registration_order() {
        let rules = build(&[("b", "|>x<|"), ("a", "|>y<|"), ("b", "|>z<|")]);
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(rules.rules_for("b").len(), 2);
    }

    #[test]
    fn malformed_rule_fails_at_add_time() {
        let mut b = StemmingRuleSet::builder();
        assert!(b.add("k", "no separators").is_err());
        assert!(b.add_tagged("k", "|>s<|", ["pl"]).is_err());
        assert!(b.build().is_empty());
    }
}
