//! URI and filesystem-path helpers.

use lsp_types::Uri;
use url::Url;

/// Parse a URI string into an `lsp_types::Uri`, falling back to a valid
/// placeholder if parsing fails.
pub fn parse_uri(s: &str) -> Uri {
    match s.parse::<Uri>() {
        Ok(uri) => uri,
        Err(_) => fallback_uri(),
    }
}

fn fallback_uri() -> Uri {
    for candidate in ["file:///unknown", "about:blank"] {
        if let Ok(uri) = candidate.parse::<Uri>() {
            return uri;
        }
    }
    // Unreachable with a conforming parser; loop keeps this panic-free.
    loop {
        if let Ok(uri) = "http://localhost/".parse::<Uri>() {
            return uri;
        }
    }
}

/// Filesystem path for a `file://` URI, or the URI itself when no path can
/// be derived (untitled buffers, non-file schemes). The native analyzer
/// accepts either as a source-file name.
pub fn file_path_of(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| uri.to_owned())
}
