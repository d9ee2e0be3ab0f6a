//! Ordered pattern rules for each extracted field.
//!
//! Every field (ID, name, username, photo) has its own list of regex rules per
//! platform. Rules are evaluated top to bottom against the input text and the
//! first rule whose capture passes its acceptance check wins; later rules are
//! never consulted. Lists run from the most specific markup to the most
//! generic, so ordering is the whole tie-break policy.
//!
//! The built-in tables are loaded at compile time from `profile_rules.json`
//! via `include_str!` and compiled once. A rules file with the same schema can
//! replace them at runtime, which is also how the reserved-username denylists
//! are customised.

use crate::types::{LensError, LensResult, Platform};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

// ── Compile-time rule configuration ─────────────────────────────────────────

/// Raw JSON content of the built-in rule tables.
const PROFILE_RULES_JSON: &str = include_str!("profile_rules.json");

/// Numeric IDs shorter or longer than this are rejected.
pub const ID_MIN_DIGITS: usize = 5;
pub const ID_MAX_DIGITS: usize = 20;

// ── Rule file schema ────────────────────────────────────────────────────────

/// One rule as written in a rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub pattern: String,
    /// Capture group holding the value.
    #[serde(default = "default_group")]
    pub group: usize,
    #[serde(default)]
    pub accept: Acceptance,
}

fn default_group() -> usize {
    1
}

/// Where the username rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsernameSource {
    /// Scan the page text.
    Page,
    /// Scan the source URL.
    Url,
}

/// Rule tables for one platform as written in a rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRulesSpec {
    pub id: Vec<RuleSpec>,
    pub name: Vec<RuleSpec>,
    /// The display name is cut at the first occurrence of any of these.
    #[serde(default)]
    pub name_cut: Vec<char>,
    pub username_source: UsernameSource,
    pub username: Vec<RuleSpec>,
    #[serde(default)]
    pub photo: Vec<RuleSpec>,
    #[serde(default)]
    pub reserved_usernames: BTreeSet<String>,
}

/// A complete rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetSpec {
    pub facebook: PlatformRulesSpec,
    pub instagram: PlatformRulesSpec,
}

// ── Compiled rules ──────────────────────────────────────────────────────────

/// Validity predicate applied to a captured value before it is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Any non-empty capture.
    #[default]
    Any,
    /// 5 to 20 ASCII digits.
    NumericId,
    /// Not a reserved path segment of the platform.
    NotReserved,
}

impl Acceptance {
    fn accepts(&self, value: &str, reserved: &BTreeSet<String>) -> bool {
        if value.is_empty() {
            return false;
        }
        match self {
            Acceptance::Any => true,
            Acceptance::NumericId => is_numeric_id(value),
            Acceptance::NotReserved => !reserved.contains(value),
        }
    }
}

/// Whether `value` satisfies the numeric ID invariant.
pub fn is_numeric_id(value: &str) -> bool {
    (ID_MIN_DIGITS..=ID_MAX_DIGITS).contains(&value.len())
        && value.bytes().all(|b| b.is_ascii_digit())
}

/// A compiled (pattern, capture group, predicate) rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    regex: Regex,
    group: usize,
    accept: Acceptance,
}

impl PatternRule {
    fn compile(spec: &RuleSpec) -> LensResult<Self> {
        let regex = Regex::new(&spec.pattern)?;
        if spec.group >= regex.captures_len() {
            return Err(LensError::Rules(format!(
                "rule '{}' uses capture group {} but its pattern has {}",
                spec.name,
                spec.group,
                regex.captures_len() - 1
            )));
        }
        Ok(Self {
            name: spec.name.clone(),
            regex,
            group: spec.group,
            accept: spec.accept,
        })
    }

    /// Capture of the first occurrence of this rule's pattern, if accepted.
    ///
    /// Only the first occurrence is considered: a rejected capture makes the
    /// whole rule miss rather than scanning for a later occurrence.
    fn apply<'t>(&self, text: &'t str, reserved: &BTreeSet<String>) -> Option<&'t str> {
        let value = self.regex.captures(text)?.get(self.group)?.as_str();
        self.accept.accepts(value, reserved).then_some(value)
    }
}

/// Outcome of evaluating one field's rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch<'t> {
    Found(&'t str),
    NotFound,
}

impl<'t> FieldMatch<'t> {
    pub fn found(self) -> Option<&'t str> {
        match self {
            FieldMatch::Found(v) => Some(v),
            FieldMatch::NotFound => None,
        }
    }
}

/// Ordered, first-match-wins rule list for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: &'static str,
    rules: Vec<PatternRule>,
}

impl FieldRules {
    fn compile(field: &'static str, specs: &[RuleSpec]) -> LensResult<Self> {
        let rules = specs
            .iter()
            .map(PatternRule::compile)
            .collect::<LensResult<Vec<_>>>()?;
        Ok(Self { field, rules })
    }

    /// Evaluate the rules in order and return the first accepted capture.
    pub fn first_match<'t>(&self, text: &'t str, reserved: &BTreeSet<String>) -> FieldMatch<'t> {
        for rule in &self.rules {
            if let Some(value) = rule.apply(text, reserved) {
                tracing::debug!(field = self.field, rule = %rule.name, "rule matched");
                return FieldMatch::Found(value);
            }
        }
        FieldMatch::NotFound
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Field this list extracts (`id`, `name`, `username`, `photo`).
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Compiled rule tables for one platform.
#[derive(Debug, Clone)]
pub struct PlatformRules {
    pub id: FieldRules,
    pub name: FieldRules,
    pub name_cut: Vec<char>,
    pub username_source: UsernameSource,
    pub username: FieldRules,
    pub photo: FieldRules,
    pub reserved_usernames: BTreeSet<String>,
}

impl PlatformRules {
    fn compile(spec: &PlatformRulesSpec) -> LensResult<Self> {
        if spec.id.is_empty() {
            return Err(LensError::Rules("at least one id rule is required".into()));
        }
        Ok(Self {
            id: FieldRules::compile("id", &spec.id)?,
            name: FieldRules::compile("name", &spec.name)?,
            name_cut: spec.name_cut.clone(),
            username_source: spec.username_source,
            username: FieldRules::compile("username", &spec.username)?,
            photo: FieldRules::compile("photo", &spec.photo)?,
            reserved_usernames: spec.reserved_usernames.clone(),
        })
    }
}

/// Rule tables for every supported platform.
#[derive(Debug, Clone)]
pub struct RuleSet {
    spec: RuleSetSpec,
    facebook: PlatformRules,
    instagram: PlatformRules,
}

impl RuleSet {
    /// Compile a rule set from its file representation.
    pub fn compile(spec: RuleSetSpec) -> LensResult<Self> {
        let facebook = PlatformRules::compile(&spec.facebook)
            .map_err(|e| LensError::Rules(format!("facebook: {e}")))?;
        let instagram = PlatformRules::compile(&spec.instagram)
            .map_err(|e| LensError::Rules(format!("instagram: {e}")))?;
        Ok(Self {
            spec,
            facebook,
            instagram,
        })
    }

    /// Parse and compile a rule set from JSON text.
    pub fn from_json(json: &str) -> LensResult<Self> {
        let spec: RuleSetSpec = serde_json::from_str(json)?;
        Self::compile(spec)
    }

    /// Load a rules file from disk.
    pub fn from_path(path: &Path) -> LensResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "loaded custom profile rules");
        Ok(rules)
    }

    /// The built-in rule tables, compiled on first use.
    pub fn builtin() -> &'static RuleSet {
        static BUILTIN: OnceLock<RuleSet> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            RuleSet::from_json(PROFILE_RULES_JSON).expect("embedded profile rules are valid")
        })
    }

    /// Replace one platform's reserved-username denylist.
    pub fn with_reserved_usernames<I, S>(mut self, platform: Platform, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: BTreeSet<String> = words.into_iter().map(Into::into).collect();
        match platform {
            Platform::Facebook => {
                self.spec.facebook.reserved_usernames = words.clone();
                self.facebook.reserved_usernames = words;
            }
            Platform::Instagram => {
                self.spec.instagram.reserved_usernames = words.clone();
                self.instagram.reserved_usernames = words;
            }
        }
        self
    }

    pub fn for_platform(&self, platform: Platform) -> &PlatformRules {
        match platform {
            Platform::Facebook => &self.facebook,
            Platform::Instagram => &self.instagram,
        }
    }

    /// The file representation these rules were compiled from.
    pub fn spec(&self) -> &RuleSetSpec {
        &self.spec
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::builtin().clone()
    }
}
