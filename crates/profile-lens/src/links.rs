//! Convenience links derived from an extracted identity.
//!
//! Pure string formatting; nothing here touches the network.

use crate::types::{Platform, ProfileIdentity, ProfileLinks};

const FACEBOOK_BASE: &str = "https://www.facebook.com";
const INSTAGRAM_BASE: &str = "https://www.instagram.com";
const THREADS_BASE: &str = "https://www.threads.com";
const WAYBACK_BASE: &str = "https://web.archive.org/web";

/// Canonical profile URL for an identity.
///
/// Facebook profiles are addressed by numeric ID. Instagram only resolves
/// handles, so the username is preferred and the ID is a last resort.
pub fn profile_url(profile: &ProfileIdentity) -> String {
    match profile.platform {
        Platform::Facebook => format!("{FACEBOOK_BASE}/profile.php?id={}", profile.id),
        Platform::Instagram => format!(
            "{INSTAGRAM_BASE}/{}",
            profile.username.as_deref().unwrap_or(&profile.id)
        ),
    }
}

/// Web archive lookup for any URL.
pub fn wayback_url(url: &str) -> String {
    format!("{WAYBACK_BASE}/{url}")
}

/// Derive every link shown next to a result.
pub fn derive_links(profile: &ProfileIdentity) -> ProfileLinks {
    let profile_link = profile_url(profile);
    let wayback = wayback_url(&profile_link);
    match profile.platform {
        Platform::Facebook => ProfileLinks {
            marketplace: Some(format!(
                "{FACEBOOK_BASE}/marketplace/profile/{}",
                profile.id
            )),
            threads: None,
            profile: profile_link,
            wayback,
        },
        Platform::Instagram => ProfileLinks {
            marketplace: None,
            threads: profile
                .username
                .as_ref()
                .map(|u| format!("{THREADS_BASE}/@{u}")),
            profile: profile_link,
            wayback,
        },
    }
}
