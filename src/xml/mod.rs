//! XML payload canonicalization
//!
//! Payloads are parsed into a tree (which enforces well-formedness) and written
//! back out as UTF-8 with a fixed declaration. Parsing then re-serializing
//! rejects bad XML before it reaches the renderer, and normalizes whatever
//! encoding the client used.

mod encoding;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use roxmltree::{Document, Node, NodeType, ParsingOptions};
use std::borrow::Cow;
use std::io::Write;
use thiserror::Error;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Failures while canonicalizing an XML payload
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("payload is not valid {0}")]
    MalformedEncoding(String),

    #[error("{0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("error converting XML payload to string: {0}")]
    Serialize(String),
}

/// Canonicalize raw XML bytes into a standalone UTF-8 document string.
pub fn canonicalize(bytes: &[u8]) -> Result<String, XmlError> {
    let text = encoding::decode(bytes)?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(&text, options)?;
    serialize(&doc)
}

fn serialize(doc: &Document) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(serialize_error)?;

    for child in doc.root().children() {
        write_node(&mut writer, child)?;
    }

    String::from_utf8(writer.into_inner()).map_err(serialize_error)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: Node) -> Result<(), XmlError> {
    match node.node_type() {
        NodeType::Element => write_element(writer, node),
        NodeType::Text => {
            let text = escape_text(node.text().unwrap_or_default());
            writer
                .write_event(Event::Text(BytesText::from_escaped(text)))
                .map_err(serialize_error)
        }
        NodeType::Comment => writer
            .write_event(Event::Comment(BytesText::from_escaped(
                node.text().unwrap_or_default(),
            )))
            .map_err(serialize_error),
        NodeType::PI => match node.pi() {
            Some(pi) => {
                let out = writer.get_mut();
                let written = match pi.value {
                    Some(value) => write!(out, "<?{} {}?>", pi.target, value),
                    None => write!(out, "<?{}?>", pi.target),
                };
                written.map_err(serialize_error)
            }
            None => Ok(()),
        },
        NodeType::Root => Ok(()),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, node: Node) -> Result<(), XmlError> {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name(), false);
    let mut start = BytesStart::new(name.clone());

    // Only declarations this element introduces; inherited ones are already in scope.
    let parent = node.parent_element();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        start.push_attribute(escaped_attribute(&key, ns.uri()));
    }

    for attr in node.attributes() {
        let key = qualified_name(node, attr.namespace(), attr.name(), true);
        start.push_attribute(escaped_attribute(&key, attr.value()));
    }

    if !node.has_children() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialize_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialize_error)?;
    for child in node.children() {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(serialize_error)
}

/// Escape character data. A literal CR would be read back as LF.
fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\r', "&#13;")
}

/// Build an attribute with its value fully escaped. Literal TAB, LF and CR
/// would be normalized to spaces when read back.
fn escaped_attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let escaped = escape(value)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;");
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

/// Rebuild `prefix:local` for a resolved name. Attributes never take the default namespace.
fn qualified_name(node: Node, namespace: Option<&str>, local: &str, attribute: bool) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{}", local);
    }
    if !attribute
        && node
            .namespaces()
            .any(|ns| ns.name().is_none() && ns.uri() == uri)
    {
        return local.to_string();
    }
    let prefix = node
        .ancestors()
        .filter(Node::is_element)
        .flat_map(|n| n.namespaces())
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name());
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

fn serialize_error(e: impl std::fmt::Display) -> XmlError {
    XmlError::Serialize(e.to_string())
}
