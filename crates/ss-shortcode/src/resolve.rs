//! Settings resolution: site defaults merged with shortcode options.

use std::fmt;

use md5::{Digest, Md5};
use ss_config::{MessageKey, Messages, SiteDefaults};
use url::Url;

use crate::AttributeMap;

/// Path appended to the default booking domain.
const API_USERS_PATH: &str = "/api/users";

/// A shortcode that cannot be rendered as a booking form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A required setting is missing or empty.
    #[error("required setting `{0}` is missing")]
    MissingField(&'static str),
}

/// Site defaults merged with the options of one shortcode.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// SuperSaaS account name.
    pub account_name: String,
    /// SuperSaaS account password.
    pub password: String,
    /// Custom booking domain (may be empty).
    pub custom_domain: String,
    /// Redirect target after login.
    pub after: String,
    /// Button label or image alt text.
    pub label: String,
    /// Image for an image-type submit control.
    pub image: Option<String>,
}

impl fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("account_name", &self.account_name)
            .field("password", &"[redacted]")
            .field("custom_domain", &self.custom_domain)
            .field("after", &self.after)
            .field("label", &self.label)
            .field("image", &self.image)
            .finish()
    }
}

impl ResolvedSettings {
    /// Merge `attrs` over `defaults`, shortcode options taking precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingField`] when `account_name`, `password`
    /// or `after` ends up empty.
    pub fn resolve(
        defaults: &SiteDefaults,
        attrs: &AttributeMap,
        messages: &Messages,
    ) -> Result<Self, ResolveError> {
        let after = attrs.get("after").unwrap_or(defaults.after.as_str());

        require("account_name", &defaults.account_name)?;
        require("password", &defaults.password)?;
        require("after", after)?;

        Ok(Self {
            account_name: defaults.account_name.clone(),
            password: defaults.password.clone(),
            custom_domain: defaults.custom_domain.clone(),
            after: after.to_owned(),
            label: attrs
                .get("label")
                .unwrap_or_else(|| messages.text(MessageKey::BookNow))
                .to_owned(),
            image: attrs
                .get("image")
                .filter(|image| !image.is_empty())
                .map(str::to_owned),
        })
    }

    /// Form action URL for these settings.
    #[must_use]
    pub fn api_endpoint(&self, messages: &Messages) -> String {
        api_endpoint(&self.custom_domain, messages.text(MessageKey::Domain))
    }

    /// Checksum for `username` under these account credentials.
    #[must_use]
    pub fn checksum(&self, username: &str) -> String {
        checksum(&self.account_name, &self.password, username)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ResolveError> {
    if value.is_empty() {
        return Err(ResolveError::MissingField(field));
    }
    Ok(())
}

/// Derive the form action URL from the configured custom domain.
///
/// An empty domain points at `/api/users` on `default_domain`. A valid URL
/// with a host is used as-is. Anything else gets `https://` and loses trailing slashes, but
/// no path is appended.
///
/// # Examples
///
/// ```
/// use ss_shortcode::api_endpoint;
///
/// assert_eq!(api_endpoint("", "www.supersaas.com"), "https://www.supersaas.com/api/users");
/// assert_eq!(api_endpoint("booking.example.com/", "www.supersaas.com"), "https://booking.example.com");
/// assert_eq!(
///     api_endpoint("http://localhost:3000/api/users", "www.supersaas.com"),
///     "http://localhost:3000/api/users"
/// );
/// ```
#[must_use]
pub fn api_endpoint(custom_domain: &str, default_domain: &str) -> String {
    if custom_domain.is_empty() {
        format!("https://{default_domain}{API_USERS_PATH}")
    } else if is_absolute_url(custom_domain) {
        custom_domain.to_owned()
    } else {
        format!("https://{}", custom_domain.trim_end_matches('/'))
    }
}

fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| url.has_host())
}

/// Lowercase hex MD5 of `account_name`, `password` and `username`
/// concatenated without separators.
///
/// SuperSaaS recomputes this value to authenticate the login, so the inputs
/// and digest must not change.
#[must_use]
pub fn checksum(account_name: &str, password: &str, username: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(account_name.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(username.as_bytes());
    hex::encode(hasher.finalize())
}
