use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};

/// A generic XML element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    /// Entity-escaped character data
    Text(String),
    /// Character data wrapped in CDATA sections
    CData(String),
    Children(Vec<Element>),
}

impl Element {
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content,
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, Content::Text(text.into()))
    }

    pub fn cdata(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, Content::CData(text.into()))
    }

    pub fn parent(name: impl Into<String>, children: Vec<Element>) -> Self {
        Self::new(name, Content::Children(children))
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Content::Empty)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Child elements, or an empty slice for leaf elements.
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub indent_char: u8,
    pub indent_size: usize,
    pub declaration: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_char: b'\t',
            indent_size: 1,
            declaration: true,
        }
    }
}

/// Serialize an element tree to UTF-8 XML.
pub fn render(root: &Element, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), options.indent_char, options.indent_size);
    if options.declaration {
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
    }
    write_element(&mut writer, root)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let attributes: Vec<(&str, Cow<'_, str>)> = element
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), xml_chars(v)))
        .collect();
    let start = BytesStart::new(element.name.as_str())
        .with_attributes(attributes.iter().map(|(k, v)| (*k, v.as_ref())));

    match &element.content {
        Content::Empty => emit(writer, Event::Empty(start)),
        Content::Text(text) => {
            let text = xml_chars(text);
            if text.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
        }
        Content::CData(text) => {
            emit(writer, Event::Start(start))?;
            for section in cdata_sections(&xml_chars(text)) {
                emit(writer, Event::CData(BytesCData::new(section)))?;
            }
            emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
        }
        Content::Children(children) => {
            emit(writer, Event::Start(start))?;
            for child in children {
                write_element(writer, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
        }
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::Render(e.to_string()))
}

/// Drop characters XML 1.0 does not allow anywhere in a document, escaped
/// or not: C0 controls other than tab, newline and carriage return, and the
/// noncharacters U+FFFE and U+FFFF.
fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Split text so that no section contains the `]]>` terminator.
fn cdata_sections(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let lead = if i == 0 { "" } else { ">" };
            let tail = if i == last { "" } else { "]]" };
            format!("{lead}{part}{tail}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn render_str(root: &Element) -> String {
        String::from_utf8(render(root, &RenderOptions::default()).unwrap()).unwrap()
    }

    /// Concatenated CDATA content of the first `name` element.
    fn read_text(xml: &str, name: &str) -> String {
        let mut reader = Reader::from_str(xml);
        let mut inside = false;
        let mut out = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == name.as_bytes() => inside = true,
                Event::End(e) if e.name().as_ref() == name.as_bytes() => return out,
                Event::CData(e) if inside => {
                    out.push_str(std::str::from_utf8(&e.into_inner()).unwrap())
                }
                Event::Eof => return out,
                _ => {}
            }
        }
    }

    #[test]
    fn declaration_and_tab_indent() {
        let root = Element::parent("a", vec![Element::text("b", "x")]);
        assert_eq!(
            render_str(&root),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n\t<b>x</b>\n</a>"
        );
    }

    #[test]
    fn declaration_can_be_disabled() {
        let options = RenderOptions {
            declaration: false,
            ..RenderOptions::default()
        };
        let out = render(&Element::text("a", "x"), &options).unwrap();
        assert_eq!(out, b"<a>x</a>");
    }

    #[test]
    fn attributes_are_escaped() {
        let root = Element::empty("enclosure").attr("url", "http://h/a?b=1&c=\"2\"");
        let xml = render_str(&root);
        assert!(xml.contains("url=\"http://h/a?b=1&amp;c=&quot;2&quot;\""), "{xml}");
    }

    #[test]
    fn text_is_escaped() {
        let xml = render_str(&Element::text("title", "A & B < C"));
        assert!(xml.contains("<title>A &amp; B &lt; C</title>"), "{xml}");
    }

    #[test]
    fn empty_text_renders_self_closing() {
        let xml = render_str(&Element::text("copyright", ""));
        assert!(xml.ends_with("<copyright/>"), "{xml}");
    }

    #[test]
    fn cdata_wraps_markup() {
        let xml = render_str(&Element::cdata("title", "A & B < C"));
        assert!(xml.contains("<title><![CDATA[A & B < C]]></title>"), "{xml}");
        assert_eq!(read_text(&xml, "title"), "A & B < C");
    }

    #[test]
    fn cdata_terminator_is_split() {
        let text = "x ]]> y ]]>";
        let xml = render_str(&Element::cdata("title", text));
        assert_eq!(read_text(&xml, "title"), text);
    }

    #[test]
    fn xml_chars_drops_forbidden_characters() {
        assert!(matches!(xml_chars("plain\ttext\n"), Cow::Borrowed(_)));
        assert_eq!(xml_chars("Live\u{8} stream \u{1b}[1m"), "Live stream [1m");
        assert_eq!(xml_chars("a\u{0}b\u{FFFE}c\u{FFFF}d"), "abcd");
        assert_eq!(xml_chars("caf\u{e9} \u{1F600}"), "caf\u{e9} \u{1F600}");
    }

    #[test]
    fn control_characters_never_reach_output() {
        let root = Element::parent(
            "item",
            vec![
                Element::cdata("title", "Live\u{8} stream \u{1b}[1m"),
                Element::text("author", "Bell\u{7}"),
                Element::empty("enclosure").attr("url", "http://h/\u{1}a"),
                Element::text("blank", "\u{1b}"),
            ],
        );
        let xml = render_str(&root);
        assert!(!xml.chars().any(|c| !is_xml_char(c)), "{xml:?}");
        assert_eq!(read_text(&xml, "title"), "Live stream [1m");
        assert!(xml.contains("<author>Bell</author>"), "{xml}");
        assert!(xml.contains("url=\"http://h/a\""), "{xml}");
        assert!(xml.contains("<blank/>"), "{xml}");
    }

    #[test]
    fn cdata_sections_plain() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections(""), vec![""]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
    }
}
