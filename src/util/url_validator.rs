use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Why a URL was not handed to the system browser.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Refusing to open {0} URL (only http/https)")]
    UnsupportedScheme(String),
    #[error("Refusing to open URL with embedded credentials")]
    Credentials,
    #[error("Refusing to open private address {0}")]
    PrivateIp(String),
}

/// Check a URL before passing it to `open::that`.
///
/// Record page URLs are built from catalog-supplied keys, so the result of
/// parsing is what gets opened, never the raw string.
///
/// ```
/// use shelf::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://openlibrary.org/works/OL45804W").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedScheme(url.scheme().to_owned()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::Credentials);
    }

    if let Some(host) = url.host_str() {
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if let Ok(ip) = bare.parse::<IpAddr>() {
            if is_private_ip(&ip) && !ip.is_loopback() {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

// Loopback is allowed through: a localhost catalog is only ever configured
// on purpose.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            if v6.is_unspecified() {
                return true;
            }
            let first = v6.segments()[0];
            // fc00::/7 and fe80::/10
            (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_pages_accepted() {
        let url = validate_url_for_open("https://openlibrary.org/works/OL1W").unwrap();
        assert_eq!(url.host_str(), Some("openlibrary.org"));
        assert!(validate_url_for_open("http://127.0.0.1:8080/books/OL2M").is_ok());
    }

    #[test]
    fn test_non_web_schemes_rejected() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_credentials_rejected() {
        assert_eq!(
            validate_url_for_open("https://user:pw@openlibrary.org/"),
            Err(UrlValidationError::Credentials)
        );
    }

    #[test]
    fn test_private_ranges_rejected() {
        assert!(validate_url_for_open("http://192.168.1.1/").is_err());
        assert!(validate_url_for_open("http://10.0.0.1:3000/").is_err());
        assert!(validate_url_for_open("http://[fe80::1]/").is_err());
        assert!(validate_url_for_open("http://0.0.0.0/").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
