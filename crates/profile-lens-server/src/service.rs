//! The lookup pipeline: fetch a profile page, run the extractor, shape the
//! response.
//!
//! Every call is independent. The only shared pieces are the HTTP client and
//! the compiled rule tables, both read-only.

use crate::acquisition::HttpClient;
use crate::config::LensConfig;
use profile_lens::{
    resolve_target, Extractor, LensError, LensResult, LookupResponse, Platform, ProfileIdentity,
    RuleSet,
};
use std::sync::Arc;

/// Fetcher plus extractor.
#[derive(Clone)]
pub struct ProfileLens {
    client: HttpClient,
    rules: Arc<RuleSet>,
}

impl ProfileLens {
    pub fn new(client: HttpClient, rules: Arc<RuleSet>) -> Self {
        Self { client, rules }
    }

    /// Build the client and load the rule tables from resolved settings.
    pub fn from_config(config: &LensConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(&config.user_agent, config.timeout_ms)?;
        let rules = config.load_rules()?;
        Ok(Self::new(client, rules))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Automated lookup.
    ///
    /// `url` is only checked for presence; a missing or blank URL fails
    /// before any request is made. With a `platform` hint a bare handle is
    /// expanded into that platform's profile URL first.
    pub async fn lookup(
        &self,
        url: Option<&str>,
        platform: Option<Platform>,
    ) -> LensResult<ProfileIdentity> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(LensError::MissingUrl)?;
        let target = match platform {
            Some(p) => resolve_target(url, Some(p))?,
            None => url.to_string(),
        };

        let page = self.client.fetch(&target).await?;
        self.extract(&page.body, &target)
    }

    /// Manual fallback: run the extractor over page source supplied by the
    /// caller for the URL the automated attempt used.
    pub fn lookup_manual(&self, html: &str, url: &str) -> LensResult<ProfileIdentity> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LensError::MissingUrl);
        }
        self.extract(html, url)
    }

    fn extract(&self, html: &str, url: &str) -> LensResult<ProfileIdentity> {
        Extractor::new(&self.rules).extract(html, url)
    }

    /// [`Self::lookup`] shaped as the wire response, with the outcome logged.
    pub async fn respond(&self, url: Option<&str>, platform: Option<Platform>) -> LookupResponse {
        let result = self.lookup(url, platform).await;
        log_outcome("automated", &result);
        result.into()
    }

    /// [`Self::lookup_manual`] shaped as the wire response.
    pub fn respond_manual(&self, html: &str, url: &str) -> LookupResponse {
        let result = self.lookup_manual(html, url);
        log_outcome("manual", &result);
        result.into()
    }
}

fn log_outcome(mode: &str, result: &LensResult<ProfileIdentity>) {
    match result {
        Ok(profile) => tracing::info!(
            mode,
            platform = %profile.platform,
            id = %profile.id,
            has_username = profile.username.is_some(),
            "profile extracted"
        ),
        Err(e) => tracing::info!(mode, error = %e, "lookup failed"),
    }
}
