//! HTML rendering of parsed sitemaps.

use std::fmt::Write;

use crate::model::{IndexEntry, SitemapDocument, UrlEntry};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; color: #333; margin: 0; padding: 2rem; }
    h1 { font-size: 1.5rem; margin: 0 0 0.5rem; }
    p.count { color: #666; margin: 0 0 1.5rem; }
    table { border-collapse: collapse; width: 100%; }
    th { text-align: left; background: #4f46e5; color: #fff; padding: 0.5rem; }
    td { border-bottom: 1px solid #eee; padding: 0.5rem; vertical-align: top; }
    a { color: #4f46e5; text-decoration: none; word-break: break-all; }
    .badge { display: inline-block; min-width: 1.5rem; padding: 0.1rem 0.4rem; border-radius: 0.75rem; background: #e0e7ff; text-align: center; }
    ul.images { margin: 0.25rem 0 0; padding-left: 1.25rem; font-size: 0.875rem; }
"#;

/// Render a sitemap as a standalone HTML page.
///
/// Index documents get one row per listed sitemap. Urlsets get one row per
/// page with an image count badge and the page's image links.
pub fn render(document: &SitemapDocument) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>XML Sitemap</title>\n");
    html.push_str("<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<h1>XML Sitemap</h1>\n");

    match document {
        SitemapDocument::Index(entries) => render_index(&mut html, entries),
        SitemapDocument::UrlSet(entries) => render_urlset(&mut html, entries),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_index(html: &mut String, entries: &[IndexEntry]) {
    let _ = writeln!(
        html,
        "<p class=\"count\">This sitemap index contains {} sitemaps.</p>",
        entries.len()
    );
    html.push_str("<table>\n<thead><tr><th>Sitemap</th><th>Last Modified</th></tr></thead>\n<tbody>\n");

    for entry in entries {
        let loc = html_escape(&entry.loc);
        let _ = writeln!(
            html,
            "<tr><td><a href=\"{loc}\">{loc}</a></td><td>{}</td></tr>",
            html_escape(entry.lastmod.as_deref().unwrap_or_default())
        );
    }

    html.push_str("</tbody>\n</table>\n");
}

fn render_urlset(html: &mut String, entries: &[UrlEntry]) {
    let _ = writeln!(
        html,
        "<p class=\"count\">This sitemap contains {} URLs.</p>",
        entries.len()
    );
    html.push_str(
        "<table>\n<thead><tr><th>URL</th><th>Images</th><th>Last Modified</th></tr></thead>\n<tbody>\n",
    );

    for entry in entries {
        let loc = html_escape(&entry.loc);
        let _ = write!(html, "<tr><td><a href=\"{loc}\">{loc}</a>");

        if !entry.images.is_empty() {
            html.push_str("<ul class=\"images\">");
            for image in &entry.images {
                let _ = write!(
                    html,
                    "<li><a href=\"{}\">{}</a></li>",
                    html_escape(&image.loc),
                    html_escape(image.label())
                );
            }
            html.push_str("</ul>");
        }

        let _ = writeln!(
            html,
            "</td><td><span class=\"badge\">{}</span></td><td>{}</td></tr>",
            entry.images.len(),
            html_escape(entry.lastmod.as_deref().unwrap_or_default())
        );
    }

    html.push_str("</tbody>\n</table>\n");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageRef;
    use crate::{render_xml, SitemapError};

    fn index(n: usize) -> SitemapDocument {
        SitemapDocument::Index(
            (1..=n)
                .map(|i| IndexEntry {
                    loc: format!("https://wallsphere.example/sitemaps/sitemap_{}.xml", i),
                    lastmod: Some(format!("2024-05-0{}", i)),
                })
                .collect(),
        )
    }

    #[test]
    fn test_index_rows_link_each_sitemap() {
        let html = render(&index(3));

        assert!(html.contains("<h1>XML Sitemap</h1>"));
        assert!(html.contains("This sitemap index contains 3 sitemaps."));
        assert_eq!(html.matches("<tr><td><a href=").count(), 3);
        for i in 1..=3 {
            let loc = format!("https://wallsphere.example/sitemaps/sitemap_{}.xml", i);
            assert!(html.contains(&format!("<a href=\"{loc}\">{loc}</a>")));
            assert!(html.contains(&format!("<td>2024-05-0{}</td>", i)));
        }
    }

    #[test]
    fn test_urlset_badge_and_image_links() {
        let doc = SitemapDocument::UrlSet(vec![
            UrlEntry {
                loc: "https://wallsphere.example/".to_string(),
                lastmod: None,
                images: Vec::new(),
            },
            UrlEntry {
                loc: "https://wallsphere.example/view/wallpapers/12/misty-forest".to_string(),
                lastmod: Some("2024-04-30".to_string()),
                images: vec![
                    ImageRef {
                        loc: "https://cdn.wallsphere.example/forest_original.jpg".to_string(),
                        title: Some("Misty Forest".to_string()),
                    },
                    ImageRef {
                        loc: "https://cdn.wallsphere.example/forest_medium.jpg".to_string(),
                        title: None,
                    },
                ],
            },
        ]);

        let html = render(&doc);

        assert!(html.contains("This sitemap contains 2 URLs."));
        assert!(html.contains("<span class=\"badge\">0</span>"));
        assert!(html.contains("<span class=\"badge\">2</span>"));
        assert_eq!(html.matches("<li><a href=").count(), 2);
        assert!(html.contains(
            "<li><a href=\"https://cdn.wallsphere.example/forest_original.jpg\">Misty Forest</a></li>"
        ));
        // Untitled images fall back to their URL.
        assert!(html.contains(
            "<li><a href=\"https://cdn.wallsphere.example/forest_medium.jpg\">https://cdn.wallsphere.example/forest_medium.jpg</a></li>"
        ));
        assert!(html.contains("<td>2024-04-30</td>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let doc = SitemapDocument::UrlSet(vec![UrlEntry {
            loc: "https://a.test/search?q=a&b=\"c\"".to_string(),
            lastmod: None,
            images: vec![ImageRef {
                loc: "https://a.test/x.jpg".to_string(),
                title: Some("<script>alert(1)</script>".to_string()),
            }],
        }]);

        let html = render(&doc);

        assert!(html.contains("https://a.test/search?q=a&amp;b=&quot;c&quot;"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_urlset() {
        let html = render(&SitemapDocument::UrlSet(Vec::new()));
        assert!(html.contains("This sitemap contains 0 URLs."));
        assert!(!html.contains("<tr><td>"));
    }

    #[test]
    fn test_render_xml_end_to_end() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://wallsphere.example/view/wallpapers/3/dunes</loc>
    <lastmod>2024-03-03</lastmod>
    <image:image>
      <image:loc>https://cdn.wallsphere.example/dunes.jpg</image:loc>
      <image:title>Dunes</image:title>
    </image:image>
  </url>
</urlset>"#;

        let html = render_xml(xml).unwrap();
        assert!(html.contains("<span class=\"badge\">1</span>"));
        assert!(html.contains(">Dunes</a>"));

        assert!(matches!(render_xml("<urlset><url></urlset>"), Err(SitemapError::Xml(_))));
    }
}
