//! Custom booking domain normalization.

use url::Url;

/// Reduce a configured custom domain to `host[:port]` when it is a full URL.
///
/// Values that parse as a URL with a host (`https://host/...`, or the
/// network-path form `//host/...`) keep only the host and a non-default
/// port. Anything else, including a bare host with a path or a URL with an
/// invalid host or port, is returned unchanged.
///
/// # Examples
///
/// ```
/// use ss_config::clean_custom_domain;
///
/// assert_eq!(clean_custom_domain("https://book.example.com/app"), "book.example.com");
/// assert_eq!(clean_custom_domain("http://localhost:3000"), "localhost:3000");
/// assert_eq!(clean_custom_domain("book.example.com/"), "book.example.com/");
/// assert_eq!(clean_custom_domain(""), "");
/// ```
#[must_use]
pub fn clean_custom_domain(value: &str) -> String {
    let parsed = match value.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")),
        None => Url::parse(value),
    };

    parsed
        .ok()
        .and_then(|url| host_port(&url))
        .unwrap_or_else(|| value.to_owned())
}

fn host_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
