//! Website to domain normalization
//!
//! Turns whatever the caller typed as a company website (scheme, `www.`,
//! paths and query strings included) into the bare host used as the suffix of
//! every email candidate.

use tracing::debug;

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Extract a bare, lower-cased domain from a free-form website string
///
/// Removes an optional `http://`/`https://` prefix, then the first `www.`
/// occurrence anywhere in the string, then everything from the first `/`.
///
/// Examples:
/// - "https://www.example.com/about" -> "example.com"
/// - "Example.COM" -> "example.com"
/// - "shop.example.com/?ref=1" -> "shop.example.com"
pub fn normalize_domain(website: &str) -> String {
    let mut rest = website.trim();

    for scheme in SCHEMES {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
            break;
        }
    }

    // Unanchored: "mail.www.example.com" also loses its "www."
    let without_www = rest.replacen("www.", "", 1);

    let host = without_www.split('/').next().unwrap_or_default();
    let domain = host.to_lowercase();

    if domain != website {
        debug!("Normalized website '{}' to domain '{}'", website, domain);
    }

    domain
}
