//! Sitemap presentation.
//!
//! Parses a sitemap index or urlset (with the image extension) and renders it
//! as an HTML table for people browsing `/sitemap.xml`.
//!
//! # Example
//!
//! ```ignore
//! let html = sphere_sitemap::render_xml(&std::fs::read_to_string("sitemap_1.xml")?)?;
//! ```

mod error;
mod model;
mod parse;
mod render;

pub use error::*;
pub use model::*;
pub use parse::*;
pub use render::*;

/// Parse a sitemap document and render it.
pub fn render_xml(xml: &str) -> Result<String, SitemapError> {
    let document = parse(xml)?;
    Ok(render(&document))
}
