//! Sitemap document model.

use serde::Serialize;

/// Namespace of sitemap and sitemap index elements.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the image extension.
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "lowercase")]
pub enum SitemapDocument {
    /// A `<sitemapindex>` listing other sitemaps.
    Index(Vec<IndexEntry>),
    /// A `<urlset>` listing pages.
    UrlSet(Vec<UrlEntry>),
}

impl SitemapDocument {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Index(entries) => entries.len(),
            Self::UrlSet(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `<sitemap>` entry of a sitemap index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// A `<url>` entry of a urlset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlEntry {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    /// Images in document order.
    pub images: Vec<ImageRef>,
}

/// An `<image:image>` child of a URL entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageRef {
    /// Text shown for the image link: the title, or the URL when untitled.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.loc)
    }
}
