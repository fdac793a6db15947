//! Sitemap error types.

/// Errors reading a sitemap document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SitemapError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("unsupported root element <{0}>, expected <sitemapindex> or <urlset>")]
    UnknownRoot(String),

    #[error("document has no root element")]
    Empty,
}
