//! Sitemap XML parsing.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::SitemapError;
use crate::model::{ImageRef, IndexEntry, SitemapDocument, UrlEntry, IMAGE_NS, SITEMAP_NS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    SitemapIndex,
    UrlSet,
    Sitemap,
    Url,
    Loc,
    LastMod,
    Image,
    ImageLoc,
    ImageTitle,
    Other,
}

impl Element {
    fn resolve(ns: &ResolveResult, local: &[u8]) -> Self {
        // Documents without an xmlns declaration still render.
        let in_sitemap_ns = match ns {
            ResolveResult::Bound(Namespace(uri)) => *uri == SITEMAP_NS.as_bytes(),
            ResolveResult::Unbound => true,
            ResolveResult::Unknown(_) => false,
        };
        let in_image_ns =
            matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == IMAGE_NS.as_bytes());

        match local {
            b"sitemapindex" if in_sitemap_ns => Self::SitemapIndex,
            b"urlset" if in_sitemap_ns => Self::UrlSet,
            b"sitemap" if in_sitemap_ns => Self::Sitemap,
            b"url" if in_sitemap_ns => Self::Url,
            b"loc" if in_sitemap_ns => Self::Loc,
            b"lastmod" if in_sitemap_ns => Self::LastMod,
            b"image" if in_image_ns => Self::Image,
            b"loc" if in_image_ns => Self::ImageLoc,
            b"title" if in_image_ns => Self::ImageTitle,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Index,
    UrlSet,
}

#[derive(Debug, Default)]
struct Builder {
    root: Option<Root>,
    // Open elements below the root.
    stack: Vec<Element>,
    index: Vec<IndexEntry>,
    urls: Vec<UrlEntry>,
    sitemap: Option<IndexEntry>,
    url: Option<UrlEntry>,
    image: Option<ImageRef>,
    field: Option<Element>,
    text: String,
}

impl Builder {
    fn set_root(&mut self, element: Element, name: &[u8]) -> Result<(), SitemapError> {
        self.root = Some(match element {
            Element::SitemapIndex => Root::Index,
            Element::UrlSet => Root::UrlSet,
            _ => {
                return Err(SitemapError::UnknownRoot(
                    String::from_utf8_lossy(name).into_owned(),
                ))
            }
        });
        Ok(())
    }

    fn open(&mut self, element: Element) {
        let parent = self.stack.last().copied();

        match (self.root, parent, element) {
            (Some(Root::Index), None, Element::Sitemap) => {
                self.sitemap = Some(IndexEntry::default());
            }
            (Some(Root::UrlSet), None, Element::Url) => {
                self.url = Some(UrlEntry::default());
            }
            (Some(Root::UrlSet), Some(Element::Url), Element::Image) => {
                self.image = Some(ImageRef::default());
            }
            (_, Some(Element::Sitemap | Element::Url), Element::Loc | Element::LastMod)
            | (_, Some(Element::Image), Element::ImageLoc | Element::ImageTitle) => {
                self.field = Some(element);
                self.text.clear();
            }
            _ => {}
        }

        self.stack.push(element);
    }

    fn close(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };

        match element {
            Element::Loc | Element::LastMod | Element::ImageLoc | Element::ImageTitle => {
                if self.field == Some(element) {
                    let value = self.text.trim().to_string();
                    self.assign(element, value);
                    self.field = None;
                    self.text.clear();
                }
            }
            Element::Image => {
                if let (Some(image), Some(url)) = (self.image.take(), self.url.as_mut()) {
                    if !image.loc.is_empty() {
                        url.images.push(image);
                    }
                }
            }
            Element::Url => {
                if let Some(url) = self.url.take().filter(|u| !u.loc.is_empty()) {
                    self.urls.push(url);
                }
            }
            Element::Sitemap => {
                if let Some(entry) = self.sitemap.take().filter(|s| !s.loc.is_empty()) {
                    self.index.push(entry);
                }
            }
            _ => {}
        }
    }

    fn assign(&mut self, field: Element, value: String) {
        match field {
            Element::ImageLoc => {
                if let Some(image) = self.image.as_mut() {
                    image.loc = value;
                }
            }
            Element::ImageTitle => {
                if let Some(image) = self.image.as_mut() {
                    image.title = Some(value).filter(|t| !t.is_empty());
                }
            }
            Element::Loc => {
                if let Some(entry) = self.sitemap.as_mut() {
                    entry.loc = value;
                } else if let Some(url) = self.url.as_mut() {
                    url.loc = value;
                }
            }
            Element::LastMod => {
                let value = Some(value).filter(|v| !v.is_empty());
                if let Some(entry) = self.sitemap.as_mut() {
                    entry.lastmod = value;
                } else if let Some(url) = self.url.as_mut() {
                    url.lastmod = value;
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<SitemapDocument, SitemapError> {
        match self.root {
            Some(Root::Index) => Ok(SitemapDocument::Index(self.index)),
            Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(self.urls)),
            None => Err(SitemapError::Empty),
        }
    }
}

/// Parse a sitemap index or urlset.
///
/// Unknown elements are ignored, as are entries without a `loc`.
pub fn parse(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = Builder::default();

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| SitemapError::Xml(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let element = Element::resolve(&ns, e.local_name().as_ref());
                if builder.root.is_none() {
                    builder.set_root(element, e.name().as_ref())?;
                } else {
                    builder.open(element);
                }
            }
            Event::Empty(e) => {
                let element = Element::resolve(&ns, e.local_name().as_ref());
                if builder.root.is_none() {
                    builder.set_root(element, e.name().as_ref())?;
                } else {
                    builder.open(element);
                    builder.close();
                }
            }
            Event::End(_) => builder.close(),
            Event::Text(e) => {
                if builder.field.is_some() {
                    let text = e.unescape().map_err(|e| SitemapError::Xml(e.to_string()))?;
                    builder.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if builder.field.is_some() {
                    builder.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="/static/sitemap.xsl"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap>
    <loc>https://wallsphere.example/sitemaps/sitemap_1.xml</loc>
    <lastmod>2024-05-01</lastmod>
  </sitemap>
  <sitemap>
    <loc>https://wallsphere.example/sitemaps/sitemap_2.xml</loc>
    <lastmod>2024-05-02</lastmod>
  </sitemap>
</sitemapindex>"#;

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://wallsphere.example/</loc>
    <changefreq>daily</changefreq>
    <priority>1.0</priority>
  </url>
  <url>
    <loc>https://wallsphere.example/view/wallpapers/12/misty-forest</loc>
    <lastmod>2024-04-30</lastmod>
    <image:image>
      <image:loc>https://cdn.wallsphere.example/forest_original.jpg</image:loc>
      <image:title>Misty Forest &amp; Lake</image:title>
    </image:image>
    <image:image>
      <image:loc>https://cdn.wallsphere.example/forest_medium.jpg</image:loc>
    </image:image>
  </url>
</urlset>"#;

    #[test]
    fn test_parse_index() {
        let doc = parse(INDEX).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec![
                IndexEntry {
                    loc: "https://wallsphere.example/sitemaps/sitemap_1.xml".to_string(),
                    lastmod: Some("2024-05-01".to_string()),
                },
                IndexEntry {
                    loc: "https://wallsphere.example/sitemaps/sitemap_2.xml".to_string(),
                    lastmod: Some("2024-05-02".to_string()),
                },
            ])
        );
    }

    #[test]
    fn test_parse_urlset_with_images() {
        let SitemapDocument::UrlSet(urls) = parse(URLSET).unwrap() else {
            panic!("expected urlset");
        };

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].loc, "https://wallsphere.example/");
        assert_eq!(urls[0].lastmod, None);
        assert!(urls[0].images.is_empty());

        assert_eq!(urls[1].lastmod.as_deref(), Some("2024-04-30"));
        assert_eq!(
            urls[1].images,
            vec![
                ImageRef {
                    loc: "https://cdn.wallsphere.example/forest_original.jpg".to_string(),
                    title: Some("Misty Forest & Lake".to_string()),
                },
                ImageRef {
                    loc: "https://cdn.wallsphere.example/forest_medium.jpg".to_string(),
                    title: None,
                },
            ]
        );
    }

    #[test]
    fn test_image_elements_need_image_namespace() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>https://a.test/</loc><image><loc>https://a.test/x.jpg</loc></image></url>
        </urlset>"#;

        let SitemapDocument::UrlSet(urls) = parse(xml).unwrap() else {
            panic!("expected urlset");
        };
        assert!(urls[0].images.is_empty());
        assert_eq!(urls[0].loc, "https://a.test/");
    }

    #[test]
    fn test_unbound_namespace_is_accepted() {
        let xml = "<sitemapindex><sitemap><loc>https://a.test/s.xml</loc></sitemap></sitemapindex>";
        assert_eq!(parse(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_cdata_values() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc><![CDATA[https://a.test/?a=1&b=2]]></loc></url></urlset>"#;
        let SitemapDocument::UrlSet(urls) = parse(xml).unwrap() else {
            panic!("expected urlset");
        };
        assert_eq!(urls[0].loc, "https://a.test/?a=1&b=2");
    }

    #[test]
    fn test_entries_without_loc_are_skipped() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap><lastmod>2024-01-01</lastmod></sitemap>
        </sitemapindex>"#;
        assert!(parse(xml).unwrap().is_empty());
    }

    #[test]
    fn test_empty_root_element() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#;
        assert_eq!(parse(xml).unwrap(), SitemapDocument::UrlSet(Vec::new()));
    }

    #[test]
    fn test_unknown_root() {
        assert_eq!(
            parse("<rss><channel/></rss>").unwrap_err(),
            SitemapError::UnknownRoot("rss".to_string())
        );
    }

    #[test]
    fn test_no_root() {
        assert_eq!(parse("").unwrap_err(), SitemapError::Empty);
        assert_eq!(
            parse(r#"<?xml version="1.0"?>"#).unwrap_err(),
            SitemapError::Empty
        );
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse("<urlset><url><loc>x</url></urlset>").unwrap_err();
        assert!(matches!(err, SitemapError::Xml(_)));
    }
}
