//! Identity extraction from raw profile page text.
//!
//! Text pattern matching only; the markup is never parsed into a DOM. The
//! same procedure serves fetched pages and page source pasted in by a user.

use crate::rules::{FieldMatch, RuleSet, UsernameSource};
use crate::types::{LensError, LensResult, Platform, ProfileIdentity};

/// Applies a [`RuleSet`] to page text.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'r> {
    rules: &'r RuleSet,
}

impl Default for Extractor<'static> {
    fn default() -> Self {
        Self::new(RuleSet::builtin())
    }
}

impl<'r> Extractor<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Extract an identity from `raw_page`, fetched from (or pasted for)
    /// `source_url`.
    ///
    /// Only a missing numeric ID fails the extraction; every other field
    /// falls back to `None`. Pure: the same inputs always give the same
    /// output.
    pub fn extract(&self, raw_page: &str, source_url: &str) -> LensResult<ProfileIdentity> {
        let platform = Platform::classify(source_url);
        let rules = self.rules.for_platform(platform);
        let reserved = &rules.reserved_usernames;

        let id = match rules.id.first_match(raw_page, reserved) {
            FieldMatch::Found(id) => id.to_string(),
            FieldMatch::NotFound => {
                tracing::debug!(%platform, "no id rule matched");
                return Err(LensError::IdNotFound { platform });
            }
        };

        let name = rules
            .name
            .first_match(raw_page, reserved)
            .found()
            .and_then(|raw| clean_name(raw, &rules.name_cut));

        let username_text = match rules.username_source {
            UsernameSource::Page => raw_page,
            UsernameSource::Url => source_url,
        };
        let username = rules
            .username
            .first_match(username_text, reserved)
            .found()
            .map(str::to_string);

        let profile_photo = rules
            .photo
            .first_match(raw_page, reserved)
            .found()
            .map(normalize_photo_url);

        Ok(ProfileIdentity {
            platform,
            id,
            name,
            username,
            profile_photo,
        })
    }
}

/// Extract with the built-in rule tables.
pub fn extract(raw_page: &str, source_url: &str) -> LensResult<ProfileIdentity> {
    Extractor::default().extract(raw_page, source_url)
}

/// Cut the display name at the first suffix delimiter, then trim.
/// A name that ends up empty is treated as absent.
fn clean_name(raw: &str, cut_at: &[char]) -> Option<String> {
    let cut = match raw.find(|c: char| cut_at.contains(&c)) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let name = cut.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Undo the escaping platforms apply to URLs embedded in page JSON and
/// attributes.
pub fn normalize_photo_url(raw: &str) -> String {
    raw.replace("\\u0025", "%")
        .replace("\\/", "/")
        .replace("&amp;", "&")
}
