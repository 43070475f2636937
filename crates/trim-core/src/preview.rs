//! Link preview collaborator boundary.
//!
//! Fetching is done by an implementation of [`LinkPreviewer`] supplied by the
//! embedding application. Callers go through [`preview_or_fallback`], which
//! never fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{Host, Url};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("previews are not fetched in offline mode")]
    Offline,

    #[error("preview request timed out")]
    Timeout,

    #[error("preview request failed: {0}")]
    Network(String),

    #[error("could not parse preview: {0}")]
    Parse(String),
}

pub trait LinkPreviewer {
    /// Fetch metadata for `url`. Implementations should give up within a
    /// few seconds.
    fn fetch(&self, url: &str) -> Result<LinkPreview, PreviewError>;
}

/// Host part of `url` without scheme, credentials, port or a leading `www.`.
/// Inputs without a scheme are read as `https://`.
pub fn domain_of(url: &str) -> Option<String> {
    let raw = url.trim();
    let parsed = match Url::parse(raw) {
        Ok(parsed) if parsed.has_host() => parsed,
        _ => Url::parse(&format!("https://{raw}")).ok()?,
    };
    let host = match parsed.host()? {
        Host::Domain(name) => {
            let name = name.to_lowercase();
            name.strip_prefix("www.").map(str::to_string).unwrap_or(name)
        }
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    };
    (!host.is_empty()).then_some(host)
}

/// Preview derived from the URL alone.
pub fn fallback_preview(url: &str) -> LinkPreview {
    let domain = domain_of(url);
    LinkPreview {
        title: domain.clone().or_else(|| Some(url.trim().to_string())),
        description: None,
        image: None,
        site_name: domain,
    }
}

/// Ask `previewer`, filling gaps (or replacing a failure) from the URL.
pub fn preview_or_fallback(previewer: &dyn LinkPreviewer, url: &str) -> LinkPreview {
    match previewer.fetch(url) {
        Ok(mut preview) => {
            let fallback = fallback_preview(url);
            if preview.title.as_deref().map_or(true, str::is_empty) {
                preview.title = fallback.title;
            }
            if preview.site_name.is_none() {
                preview.site_name = fallback.site_name;
            }
            preview
        }
        Err(PreviewError::Offline) => fallback_preview(url),
        Err(e) => {
            tracing::warn!(url, error = %e, "link preview failed; using domain fallback");
            fallback_preview(url)
        }
    }
}

/// A previewer that never reaches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePreviewer;

impl LinkPreviewer for OfflinePreviewer {
    fn fetch(&self, _url: &str) -> Result<LinkPreview, PreviewError> {
        Err(PreviewError::Offline)
    }
}
