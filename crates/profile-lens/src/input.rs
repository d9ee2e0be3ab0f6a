//! Turning what a user typed into a profile URL.
//!
//! Users paste either a full profile URL or a bare handle. A handle carries no
//! platform, so the caller must pick one before a URL can be built.

use crate::types::{LensError, LensResult, Platform};

/// Whether `input` already looks like a URL rather than a handle.
pub fn looks_like_url(input: &str) -> bool {
    input.starts_with("http") || input.contains(".com/") || input.contains(".net/")
}

/// Profile URL for a bare handle on the given platform.
pub fn profile_url_for_handle(platform: Platform, handle: &str) -> String {
    let handle = handle.trim().trim_start_matches('@');
    match platform {
        Platform::Facebook => format!("https://www.facebook.com/{handle}"),
        Platform::Instagram => format!("https://www.instagram.com/{handle}"),
    }
}

/// Resolve user input to the URL to look up.
///
/// URL-like input is returned as is and `platform` is ignored. A handle needs
/// `platform`, otherwise [`LensError::PlatformRequired`] is returned.
pub fn resolve_target(input: &str, platform: Option<Platform>) -> LensResult<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LensError::MissingUrl);
    }
    if looks_like_url(input) {
        return Ok(input.to_string());
    }
    match platform {
        Some(p) => Ok(profile_url_for_handle(p, input)),
        None => Err(LensError::PlatformRequired(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://www.facebook.com/zuck"));
        assert!(looks_like_url("http://x"));
        assert!(looks_like_url("facebook.com/zuck"));
        assert!(looks_like_url("m.example.net/someone"));
        assert!(!looks_like_url("johndoe"));
        assert!(!looks_like_url("john.doe"));
    }

    #[test]
    fn test_resolve_url_ignores_platform() {
        let url = resolve_target("  https://www.instagram.com/johndoe ", Some(Platform::Facebook));
        assert_eq!(url.unwrap(), "https://www.instagram.com/johndoe");
    }

    #[test]
    fn test_resolve_handle() {
        assert_eq!(
            resolve_target("@johndoe", Some(Platform::Instagram)).unwrap(),
            "https://www.instagram.com/johndoe"
        );
        assert_eq!(
            resolve_target("jane.roe", Some(Platform::Facebook)).unwrap(),
            "https://www.facebook.com/jane.roe"
        );
    }

    #[test]
    fn test_resolve_handle_without_platform() {
        assert!(matches!(
            resolve_target("johndoe", None),
            Err(LensError::PlatformRequired(h)) if h == "johndoe"
        ));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve_target("   ", None), Err(LensError::MissingUrl)));
    }
}
