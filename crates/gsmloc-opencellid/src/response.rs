//! Attribute-path extraction from lookup responses.
//!
//! A response is read once into a flat list of elements (absolute element
//! path plus attributes). Lookups then address an attribute with a path such
//! as `/rsp/cell/@lat` or its long form `/rsp/cell/attribute::lat`. The first
//! element in document order that matches wins.

use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::LookupError;

/// An absolute element path ending in an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    elements: Vec<String>,
    attribute: String,
}

impl AttributePath {
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl FromStr for AttributePath {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| LookupError::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let rest = s
            .trim()
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        let mut segments: Vec<&str> = rest.split('/').collect();
        let last = segments.pop().unwrap_or_default();
        let attribute = last
            .strip_prefix('@')
            .or_else(|| last.strip_prefix("attribute::"))
            .ok_or_else(|| invalid("last step must select an attribute"))?;

        if attribute.is_empty() {
            return Err(invalid("attribute name is empty"));
        }
        if segments.is_empty() {
            return Err(invalid("no element steps before the attribute"));
        }
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(invalid("empty element step"));
        }

        Ok(Self {
            elements: segments.into_iter().map(ToOwned::to_owned).collect(),
            attribute: attribute.to_string(),
        })
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.elements {
            write!(f, "/{element}")?;
        }
        write!(f, "/@{}", self.attribute)
    }
}

#[derive(Debug, Clone)]
struct Element {
    path: Vec<String>,
    attributes: Vec<(String, String)>,
}

/// A parsed, well-formed response document.
#[derive(Debug, Clone)]
pub struct ResponseDocument {
    elements: Vec<Element>,
}

impl ResponseDocument {
    /// Parses `xml`, rejecting anything that is not a single well-formed
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::ResponseParse`] on malformed markup, mismatched
    /// or unclosed tags, bad attributes, content outside a single root
    /// element, or an empty body.
    pub fn parse(xml: &str) -> Result<Self, LookupError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<String> = Vec::new();
        let mut elements = Vec::new();
        let mut root_closed = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| LookupError::ResponseParse(e.to_string()))?;
            match event {
                Event::Start(e) | Event::Empty(e) if root_closed => {
                    return Err(LookupError::ResponseParse(format!(
                        "element <{}> after the root element",
                        element_name(&e)
                    )));
                }
                Event::Start(e) => {
                    stack.push(element_name(&e));
                    elements.push(Element {
                        path: stack.clone(),
                        attributes: read_attributes(&e)?,
                    });
                }
                Event::Empty(e) => {
                    let mut path = stack.clone();
                    path.push(element_name(&e));
                    elements.push(Element {
                        path,
                        attributes: read_attributes(&e)?,
                    });
                    root_closed = stack.is_empty();
                }
                Event::End(_) => {
                    stack.pop();
                    root_closed = stack.is_empty();
                }
                Event::Text(_) | Event::CData(_) if stack.is_empty() => {
                    return Err(LookupError::ResponseParse(
                        "text outside the root element".to_string(),
                    ));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(LookupError::ResponseParse(format!(
                "unclosed element <{}>",
                stack.join("/")
            )));
        }
        if elements.is_empty() {
            return Err(LookupError::ResponseParse(
                "document has no root element".to_string(),
            ));
        }

        Ok(Self { elements })
    }

    /// Returns the raw value of the first attribute matching `path`.
    #[must_use]
    pub fn attribute(&self, path: &AttributePath) -> Option<&str> {
        self.elements
            .iter()
            .filter(|el| el.path == path.elements)
            .find_map(|el| {
                el.attributes
                    .iter()
                    .find(|(name, _)| *name == path.attribute)
                    .map(|(_, value)| value.as_str())
            })
    }

    /// Returns the attribute at `path` as a finite float, or `None` when it
    /// is absent or not a number.
    #[must_use]
    pub fn get_f64(&self, path: &AttributePath) -> Option<f64> {
        let raw = self.attribute(path)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                tracing::debug!(path = %path, value = %raw, "attribute is not a number");
                None
            }
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn read_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, LookupError> {
    e.attributes()
        .map(|attr| {
            let attr = attr.map_err(|err| LookupError::ResponseParse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| LookupError::ResponseParse(err.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> AttributePath {
        s.parse().expect("valid path")
    }

    #[test]
    fn parses_short_and_axis_forms() {
        let short = path("/rsp/cell/@lat");
        let long = path("/rsp/cell/attribute::lat");
        assert_eq!(short, long);
        assert_eq!(short.attribute(), "lat");
        assert_eq!(short.to_string(), "/rsp/cell/@lat");
    }

    #[test]
    fn rejects_relative_paths() {
        assert!(matches!(
            "rsp/cell/@lat".parse::<AttributePath>(),
            Err(LookupError::InvalidPath { .. })
        ));
    }

    #[test]
    fn rejects_paths_without_attribute_step() {
        for bad in ["/rsp/cell", "/rsp/cell/@", "/@lat", "/rsp//@lat"] {
            assert!(
                bad.parse::<AttributePath>().is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn reads_attribute_from_empty_element() {
        let doc = ResponseDocument::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rsp stat="ok"><cell lat="60.1699" lon="24.9384" range="1000"/></rsp>"#,
        )
        .unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), Some(60.1699));
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lon")), Some(24.9384));
        assert_eq!(doc.attribute(&path("/rsp/@stat")), Some("ok"));
    }

    #[test]
    fn reads_attribute_from_start_element() {
        let doc =
            ResponseDocument::parse(r#"<rsp><cell lat="1.5" lon="2.5"><x/></cell></rsp>"#).unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lon")), Some(2.5));
    }

    #[test]
    fn missing_attribute_is_none() {
        let doc = ResponseDocument::parse(r#"<rsp><cell lat="45.0"/></rsp>"#).unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), Some(45.0));
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lon")), None);
    }

    #[test]
    fn path_must_match_from_the_root() {
        let doc = ResponseDocument::parse(r#"<rsp><other><cell lat="3"/></other></rsp>"#).unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), None);
        assert_eq!(doc.get_f64(&path("/rsp/other/cell/@lat")), Some(3.0));
    }

    #[test]
    fn first_matching_element_wins() {
        let doc =
            ResponseDocument::parse(r#"<rsp><cell lat="1"/><cell lat="2"/></rsp>"#).unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), Some(1.0));
    }

    #[test]
    fn non_numeric_values_are_none() {
        let doc =
            ResponseDocument::parse(r#"<rsp><cell lat="north" lon="NaN"/></rsp>"#).unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), None);
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lon")), None);
    }

    #[test]
    fn comments_and_whitespace_around_the_root_are_allowed() {
        let doc = ResponseDocument::parse(
            "<?xml version=\"1.0\"?>\n<!-- cached -->\n<rsp><cell lat=\"2\"/></rsp>\n<!-- end -->\n",
        )
        .unwrap();
        assert_eq!(doc.get_f64(&path("/rsp/cell/@lat")), Some(2.0));
    }

    #[test]
    fn malformed_documents_are_errors() {
        for bad in [
            "",
            "not xml at all",
            "<rsp><cell lat=\"1\"></rsp>",
            "<rsp><cell lat=\"1\"/>",
            r#"<rsp><cell lat="45.0"/></rsp>trailing junk"#,
            r#"<rsp/><cell lat="1"/>"#,
            r#"<rsp><cell lat="45.0"/></rsp><rsp/>"#,
            "stray <rsp/>",
        ] {
            assert!(
                matches!(
                    ResponseDocument::parse(bad),
                    Err(LookupError::ResponseParse(_))
                ),
                "{bad:?} should fail to parse"
            );
        }
    }
}
