//! Core data types for extracted profile identities and lookup responses.

use serde::{Deserialize, Serialize};

/// Platform a profile URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
}

impl Platform {
    /// Classify a source URL. Anything that does not mention the Instagram
    /// domain is treated as Facebook.
    pub fn classify(source_url: &str) -> Self {
        if source_url.contains("instagram.com") {
            Platform::Instagram
        } else {
            Platform::Facebook
        }
    }

    /// Lowercase identifier used on the wire and in rule files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Ok(Platform::Facebook),
            "instagram" | "ig" => Ok(Platform::Instagram),
            other => Err(LensError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Identity data extracted from one profile page.
///
/// Built once per lookup and never mutated afterwards. `id` always holds
/// 5 to 20 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIdentity {
    pub platform: Platform,
    pub id: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub profile_photo: Option<String>,
}

/// Convenience links derived from an identity. Never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLinks {
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<String>,
    pub wayback: String,
}

/// The JSON document returned for every lookup, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub profile: Option<ProfileIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ProfileLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    /// Successful lookup carrying the identity and its derived links.
    pub fn found(profile: ProfileIdentity) -> Self {
        let links = crate::links::derive_links(&profile);
        Self {
            success: true,
            profile: Some(profile),
            links: Some(links),
            error: None,
        }
    }

    /// Failed lookup carrying the public error message.
    pub fn failed(err: &LensError) -> Self {
        Self {
            success: false,
            profile: None,
            links: None,
            error: Some(err.public_message()),
        }
    }

    /// Whether the manual paste-the-source workflow should be offered.
    pub fn offers_manual_fallback(&self) -> bool {
        !self.success && self.error.as_deref() != Some(MISSING_URL_MESSAGE)
    }
}

impl From<LensResult<ProfileIdentity>> for LookupResponse {
    fn from(result: LensResult<ProfileIdentity>) -> Self {
        match result {
            Ok(profile) => LookupResponse::found(profile),
            Err(e) => LookupResponse::failed(&e),
        }
    }
}

const MISSING_URL_MESSAGE: &str = "No URL provided";

/// Failure while fetching the profile page.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The platform answered with a non-2xx status.
    #[error("Platform returned {0}")]
    Status(u16),

    /// Network failure, timeout, or an unreadable body. The detail is kept
    /// for logs only.
    #[error("Failed to fetch profile")]
    Fetch(String),
}

/// Errors that can occur in the ProfileLens library.
#[derive(thiserror::Error, Debug)]
pub enum LensError {
    #[error("No URL provided")]
    MissingUrl,

    #[error("ID not found")]
    IdNotFound { platform: Platform },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("'{0}' is not a URL; choose facebook or instagram")]
    PlatformRequired(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Rules error: {0}")]
    Rules(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl LensError {
    /// Message placed in the `error` field of a failed [`LookupResponse`].
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

/// Convenience result type.
pub type LensResult<T> = Result<T, LensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_platform() {
        assert_eq!(
            Platform::classify("https://www.instagram.com/johndoe"),
            Platform::Instagram
        );
        assert_eq!(
            Platform::classify("https://www.facebook.com/zuck"),
            Platform::Facebook
        );
        assert_eq!(Platform::classify("https://example.com/x"), Platform::Facebook);
    }

    #[test]
    fn test_classify_query_embedding_misclassifies() {
        // Substring classification: the query value wins.
        let url = "https://www.facebook.com/share?next=instagram.com";
        assert_eq!(Platform::classify(url), Platform::Instagram);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("ig".parse::<Platform>().unwrap(), Platform::Instagram);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_success_response_serializes_nulls() {
        let resp = LookupResponse::found(ProfileIdentity {
            platform: Platform::Facebook,
            id: "100004123456".to_string(),
            name: None,
            username: None,
            profile_photo: None,
        });
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["platform"], "facebook");
        assert!(v["name"].is_null());
        assert!(v.as_object().unwrap().contains_key("profilePhoto"));
        assert!(!v.as_object().unwrap().contains_key("error"));
    }

    #[test]
    fn test_failure_response_shape() {
        let resp = LookupResponse::failed(&LensError::Transport(TransportError::Status(403)));
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "success": false, "error": "Platform returned 403" })
        );
        assert!(resp.offers_manual_fallback());
    }

    #[test]
    fn test_missing_url_has_no_manual_fallback() {
        let resp = LookupResponse::failed(&LensError::MissingUrl);
        assert_eq!(resp.error.as_deref(), Some("No URL provided"));
        assert!(!resp.offers_manual_fallback());
    }

    #[test]
    fn test_fetch_error_hides_detail() {
        let err = LensError::from(TransportError::Fetch("dns error".into()));
        assert_eq!(err.public_message(), "Failed to fetch profile");
        assert!(LookupResponse::failed(&err).offers_manual_fallback());
    }
}
