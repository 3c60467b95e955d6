//! URL utilities for log-safe URL handling

use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Replace the value of a sensitive query parameter with `***`
    ///
    /// Used before logging provider request URLs that carry an API key.
    /// Unparseable input is returned with everything after `?` removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clipvote::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::redact_query_param("https://example.com/videos?id=abc&key=secret", "key"),
    ///     "https://example.com/videos?id=abc&key=***"
    /// );
    /// ```
    pub fn redact_query_param(url: &str, param: &str) -> String {
        let Ok(mut parsed) = Url::parse(url) else {
            return url.split('?').next().unwrap_or_default().to_string();
        };

        if !parsed.query_pairs().any(|(name, _)| name == param) {
            return parsed.to_string();
        }

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(name, value)| {
                if name == param {
                    (name.into_owned(), "***".to_string())
                } else {
                    (name.into_owned(), value.into_owned())
                }
            })
            .collect();

        parsed.query_pairs_mut().clear().extend_pairs(pairs);
        parsed.to_string()
    }
}
