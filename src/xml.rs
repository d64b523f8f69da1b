//! Minimal owned XML tree for CallFire replies.
//!
//! CallFire answers with namespace-prefixed documents such as
//! `<r:ResourceReference xmlns:r="..."><r:Id>99</r:Id></r:ResourceReference>`. Elements are
//! looked up by prefix and local name with [`find_child`], which returns `None` instead
//! of failing when the child is absent.

use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed XML escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    NoRootElement,

    #[error("document has more than one root element")]
    MultipleRootElements,

    #[error("end tag without a matching start tag")]
    UnmatchedEndTag,

    #[error("element <{name}> is not closed")]
    UnclosedElement { name: String },

    #[error("text outside the root element: {text:?}")]
    TextOutsideRoot { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name, e.g. `xmlns:r`.
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An element with its namespace prefix, attributes, trimmed text and child elements.
pub struct Element {
    prefix: Option<String>,
    local_name: String,
    attributes: Vec<Attribute>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = start.name();
        let prefix = name
            .prefix()
            .map(|prefix| utf8(prefix.as_ref()))
            .transpose()?;
        let local_name = utf8(name.local_name().as_ref())?;

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            attributes.push(Attribute {
                name: utf8(attr.key.as_ref())?,
                value: attr.unescape_value()?.into_owned(),
            });
        }

        Ok(Self {
            prefix,
            local_name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// `prefix:local` or just `local` for unprefixed elements.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Text content directly inside this element (text and CDATA, trimmed).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.qualified_name(), indent = depth * 2)?;
        for attr in &self.attributes {
            write!(f, " [{}=\"{}\"]", attr.name, attr.value)?;
        }
        if !self.text.is_empty() {
            write!(f, ": {}", self.text)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Parse a complete document and return its root element.
pub fn parse_document(input: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open.pop().ok_or(XmlError::UnmatchedEndTag)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(text) => push_text(&mut open, &text.unescape()?)?,
            Event::CData(cdata) => push_text(&mut open, std::str::from_utf8(&cdata)?)?,
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.last() {
        return Err(XmlError::UnclosedElement {
            name: element.qualified_name(),
        });
    }
    root.ok_or(XmlError::NoRootElement)
}

/// Text belongs to the innermost open element; outside the root only whitespace is allowed.
fn push_text(open: &mut [Element], text: &str) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(current) => current.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(XmlError::TextOutsideRoot {
                text: text.trim().to_owned(),
            });
        }
    }
    Ok(())
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRootElements),
        None => *root = Some(element),
    }
    Ok(())
}

/// First direct child of `root` with the given namespace prefix and local name.
pub fn find_child<'a>(root: &'a Element, prefix: &str, local_name: &str) -> Option<&'a Element> {
    root.children
        .iter()
        .find(|child| child.prefix.as_deref() == Some(prefix) && child.local_name == local_name)
}

/// First direct child of `root` without a prefix and with the given local name.
pub fn find_child_unprefixed<'a>(root: &'a Element, local_name: &str) -> Option<&'a Element> {
    root.children
        .iter()
        .find(|child| child.prefix.is_none() && child.local_name == local_name)
}

fn utf8(bytes: &[u8]) -> Result<String, XmlError> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE_REFERENCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<r:ResourceReference xmlns:r="http://api.callfire.com/resource">
  <r:Id>ABC123</r:Id>
  <r:Location>https://www.callfire.com/api/1.0/rest/broadcast/ABC123</r:Location>
</r:ResourceReference>"#;

    #[test]
    fn parses_prefixed_document() {
        let root = parse_document(RESOURCE_REFERENCE).unwrap();
        assert_eq!(root.prefix(), Some("r"));
        assert_eq!(root.local_name(), "ResourceReference");
        assert_eq!(
            root.attribute("xmlns:r"),
            Some("http://api.callfire.com/resource")
        );
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn find_child_matches_prefix_and_local_name() {
        let root = parse_document(RESOURCE_REFERENCE).unwrap();
        let id = find_child(&root, "r", "Id").unwrap();
        assert_eq!(id.text(), "ABC123");

        assert!(find_child(&root, "x", "Id").is_none());
        assert!(find_child_unprefixed(&root, "Id").is_none());
        assert!(find_child(&root, "r", "Missing").is_none());
    }

    #[test]
    fn find_child_only_looks_at_direct_children() {
        let root = parse_document(
            r#"<response xmlns:r="urn:r"><wrapper><r:Id>1</r:Id></wrapper></response>"#,
        )
        .unwrap();
        assert!(find_child(&root, "r", "Id").is_none());
    }

    #[test]
    fn unprefixed_lookup() {
        let root = parse_document("<TextQueryResult><Text>hi</Text></TextQueryResult>").unwrap();
        assert_eq!(find_child_unprefixed(&root, "Text").unwrap().text(), "hi");
    }

    #[test]
    fn text_is_unescaped_and_cdata_kept() {
        let root = parse_document("<a>x &amp; y<![CDATA[ <z>]]></a>").unwrap();
        assert_eq!(root.text(), "x & y <z>");
    }

    #[test]
    fn empty_elements_become_children() {
        let root = parse_document(r#"<a><b id="1"/><c/></a>"#).unwrap();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].attribute("id"), Some("1"));
    }

    #[test]
    fn rejects_documents_without_root() {
        assert!(matches!(
            parse_document("   "),
            Err(XmlError::NoRootElement)
        ));
    }

    #[test]
    fn rejects_multiple_roots() {
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(XmlError::MultipleRootElements)
        ));
    }

    #[test]
    fn rejects_unclosed_elements() {
        assert!(parse_document("<a><b>").is_err());
    }

    #[test]
    fn rejects_mismatched_end_tags() {
        assert!(parse_document("<a></b>").is_err());
    }

    #[test]
    fn rejects_text_before_root() {
        let err = parse_document("Service Unavailable <Status>SENT</Status>").unwrap_err();
        assert!(matches!(
            err,
            XmlError::TextOutsideRoot { ref text } if text == "Service Unavailable"
        ));
    }

    #[test]
    fn rejects_text_after_root() {
        let err = parse_document("<Status>SENT</Status> trailing junk").unwrap_err();
        assert!(matches!(err, XmlError::TextOutsideRoot { .. }));
    }

    #[test]
    fn rejects_cdata_outside_root() {
        let err = parse_document("<![CDATA[x]]><a/>").unwrap_err();
        assert!(matches!(err, XmlError::TextOutsideRoot { .. }));
    }

    #[test]
    fn whitespace_around_root_is_allowed() {
        let root = parse_document("\n  <Status>SENT</Status>\n\n").unwrap();
        assert_eq!(root.text(), "SENT");
    }

    #[test]
    fn display_dumps_indented_tree() {
        let root = parse_document(
            r#"<Status code="3"><Text>SENT</Text><r:Id xmlns:r="urn:r">9</r:Id></Status>"#,
        )
        .unwrap();
        assert_eq!(
            root.to_string(),
            "Status [code=\"3\"]\n  Text: SENT\n  r:Id [xmlns:r=\"urn:r\"]: 9\n"
        );
    }
}
