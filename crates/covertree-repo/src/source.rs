//! URL pattern filters passed to repositories.

use globset::{Glob, GlobMatcher};

use covertree_core::RepositoryError;

/// A URL pattern restricting which URLs a repository inserts.
///
/// Patterns containing glob metacharacters are matched as globs against the
/// full URL. Anything else matches as a prefix ending on a segment boundary:
/// the URL must continue with `/`, `?`, `#` or end right after the prefix, so
/// `https://a.org/climate` does not match `https://a.org/climatechange`. The
/// scheme is ignored on both sides of a prefix comparison.
#[derive(Debug, Clone)]
pub struct Source {
    /// The pattern as supplied.
    pub url: String,
    matcher: Option<GlobMatcher>,
}

impl Source {
    /// Build a source from a pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, RepositoryError> {
        let url = pattern.into();
        let matcher = if is_glob(&url) {
            let glob = Glob::new(&url).map_err(|e| RepositoryError::InvalidPattern {
                pattern: url.clone(),
                message: e.to_string(),
            })?;
            Some(glob.compile_matcher())
        } else {
            None
        };
        Ok(Self { url, matcher })
    }

    /// Build one source per pattern, failing on the first invalid one.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Vec<Self>, RepositoryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns.into_iter().map(Self::new).collect()
    }

    /// Check whether `url` falls under this source.
    pub fn matches(&self, url: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(url),
            None => is_prefix_match(strip_scheme(&self.url), strip_scheme(url)),
        }
    }
}

/// True when `sources` is empty or any source matches `url`.
pub fn matches_any(sources: &[Source], url: &str) -> bool {
    sources.is_empty() || sources.iter().any(|s| s.matches(url))
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

fn is_prefix_match(prefix: &str, url: &str) -> bool {
    let Some(rest) = url.strip_prefix(prefix) else {
        return false;
    };
    rest.is_empty() || prefix.ends_with('/') || rest.starts_with(['/', '?', '#'])
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}
