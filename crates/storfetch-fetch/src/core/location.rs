use url::Url;

use crate::error::{Error, Result};

/// Parse an endpoint base URL. Only http and https are accepted.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let url = Url::parse(base).map_err(|e| Error::InvalidUrl {
        url:    base.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl {
            url:    base.to_string(),
            reason: format!("unsupported scheme {scheme:?}"),
        }),
    }
}

/// Append a relative object path to a base URL.
///
/// Trailing slashes on the base and leading slashes on the path collapse to
/// one separator, so a base that carries a bucket path keeps it.
pub fn join_url(base: &Url, path: &str) -> Result<String> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    Url::parse(&joined).map(String::from).map_err(|e| Error::InvalidUrl {
        url:    joined,
        reason: e.to_string(),
    })
}
