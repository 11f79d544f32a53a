//! Sandhi rules: how a stem and an ending splice together.
//!
//! A rule is written `A|B>C<D|E`. Reading left to right:
//!
//! - `A` is the theme, the stem-final anchor kept in the surface form,
//! - `B` is the stem material removed before the ending is attached,
//! - `C` is what replaces `B` at the junction,
//! - `D` is the part of the underlying suffix absorbed by the junction,
//! - `E` is the rest of the suffix, kept verbatim.
//!
//! From these the rule derives `stem = A+B`, `suffix = D+E`,
//! `distinguisher = C+E` (what generation appends) and `surface = A+C+E`
//! (the ending a finished word form shows).
//!
//! `A` may be a regular expression so a single rule can cover a class of
//! stem endings (`[aeiou]|>n<|`). The other four parts are literal and are
//! escaped before being embedded in a matcher.
use regex::Regex;
use std::fmt;

use crate::error::{InflexionError, Result};
use crate::tags::{TagFilter, TagSet};

/// One parsed `A|B>C<D|E` rule. Immutable once built.
#[derive(Clone)]
pub struct SandhiRule {
    source: String,
    a: String,
    b: String,
    c: String,
    d: String,
    e: String,
    stem: String,
    suffix: String,
    distinguisher: String,
    surface: String,
    tags: TagSet,
    /// `<anything><theme>` followed by the literal `b`.
    forward: Regex,
    /// `<anything><theme>` followed by the literal distinguisher.
    reverse: Regex,
}

impl SandhiRule {
    /// Parse an untagged rule.
    ///
    /// # Example
    /// ```
    /// use inflexion_core::SandhiRule;
    ///
    /// let rule = SandhiRule::new("A|B>C<D|E").unwrap();
    /// assert_eq!(rule.stem(), "AB");
    /// assert_eq!(rule.surface(), "ACE");
    /// assert_eq!(rule.match_theme("FAB").as_deref(), Some("FA"));
    /// ```
    pub fn new(rule: &str) -> Result<Self> {
        Self::with_tags(rule, TagSet::new())
    }

    /// Parse a rule and attach a tag set to it.
    pub fn with_tags(rule: &str, tags: TagSet) -> Result<Self> {
        let (a, b, c, d, e) = split_rule(rule)?;

        let forward = compile_tail(a, b)?;
        let distinguisher = format!("{}{}", c, e);
        let reverse = compile_tail(a, &distinguisher)?;

        Ok(Self {
            source: rule.to_string(),
            stem: format!("{}{}", a, b),
            suffix: format!("{}{}", d, e),
            surface: format!("{}{}{}", a, c, e),
            distinguisher,
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
            d: d.to_string(),
            e: e.to_string(),
            tags,
            forward,
            reverse,
        })
    }

    /// If `candidate` ends with this rule's stem, return the part preceding
    /// `b` (the whole candidate when `b` is empty).
    pub fn match_theme(&self, candidate: &str) -> Option<String> {
        self.forward
            .captures(candidate)
            .and_then(|caps| caps.name("base"))
            .map(|base| base.as_str().to_string())
    }

    /// Reverse of generation: if `form` ends with this rule's distinguisher
    /// and what precedes it ends with the theme, return the stem that would
    /// have produced `form`.
    pub fn unmatch_surface(&self, form: &str) -> Option<String> {
        self.reverse
            .captures(form)
            .and_then(|caps| caps.name("base"))
            .map(|base| format!("{}{}", base.as_str(), self.b))
    }

    /// Whether the caller's filter lets this rule through.
    pub fn admits(&self, filter: &TagFilter) -> bool {
        self.tags.admits(filter)
    }

    /// Catch-all rules have an empty stem and match any candidate.
    pub fn is_default(&self) -> bool {
        self.stem.is_empty()
    }

    pub fn a(&self) -> &str {
        &self.a
    }

    pub fn b(&self) -> &str {
        &self.b
    }

    pub fn c(&self) -> &str {
        &self.c
    }

    pub fn d(&self) -> &str {
        &self.d
    }

    pub fn e(&self) -> &str {
        &self.e
    }

    pub fn theme(&self) -> &str {
        &self.a
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn distinguisher(&self) -> &str {
        &self.distinguisher
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// The rule string this rule was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for SandhiRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.tags == other.tags
    }
}

impl Eq for SandhiRule {}

impl fmt::Display for SandhiRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl fmt::Debug for SandhiRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("SandhiRule");
        t.field(&self.source);
        if !self.tags.is_empty() {
            t.field(&format_args!("{}", self.tags));
        }
        t.finish()
    }
}

/// Split `A|B>C<D|E` into its five parts.
fn split_rule(rule: &str) -> Result<(&str, &str, &str, &str, &str)> {
    let parts: Vec<&str> = rule.split('|').collect();
    let [a, middle, e] = parts[..] else {
        return Err(InflexionError::format(
            rule,
            "expected exactly two `|` separators",
        ));
    };

    if middle.matches('>').count() != 1 || middle.matches('<').count() != 1 {
        return Err(InflexionError::format(
            rule,
            "expected exactly one `>` and one `<` between the `|` separators",
        ));
    }

    // Counts are checked above, so both splits succeed exactly once.
    let Some((b, cd)) = middle.split_once('>') else {
        return Err(InflexionError::format(rule, "missing `>`"));
    };
    let Some((c, d)) = cd.split_once('<') else {
        return Err(InflexionError::format(rule, "`>` must precede `<`"));
    };

    Ok((a, b, c, d, e))
}

/// Compile `^<anything><theme><literal>$`, capturing everything before the
/// literal as `base`.
fn compile_tail(theme: &str, literal: &str) -> Result<Regex> {
    // The theme must stand alone as a pattern, otherwise unbalanced groups
    // could pair up with the wrapper below.
    Regex::new(theme).map_err(|e| InflexionError::pattern(theme, e))?;
    let pattern = format!(
        r"^(?s)(?P<base>.*(?:{})){}$",
        theme,
        regex::escape(literal)
    );
    Regex::new(&pattern).map_err(|e| InflexionError::pattern(theme, e))
}
