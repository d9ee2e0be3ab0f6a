//! ProfileLens: pattern-based identity extraction from public profile pages.
//!
//! Given the raw markup of a Facebook or Instagram profile page and the URL it
//! came from, [`extract`] returns the numeric account ID plus whatever display
//! name, handle, and photo URL the page exposes. Fetching is left to the
//! caller; see the `profile-lens-server` crate.

pub mod extract;
pub mod input;
pub mod links;
pub mod rules;
pub mod types;

pub use extract::{extract, normalize_photo_url, Extractor};
pub use input::{looks_like_url, profile_url_for_handle, resolve_target};
pub use links::{derive_links, profile_url, wayback_url};
pub use rules::{FieldMatch, RuleSet};
pub use types::*;
