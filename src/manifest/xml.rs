//! Textual XML parsing and serialization for manifest trees.
//!
//! Bundles carry manifests in a compiled encoding handled by the external
//! codec; this module covers the human-readable form used by tests, debug
//! output and the plain APK serializer.

use crate::error::{Error, Result};
use crate::manifest::{XmlAttribute, XmlElement, XmlNode};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Parses an XML document into an element tree. Comments, processing
/// instructions and the XML declaration are dropped.
pub fn parse_xml(text: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => return Ok(element),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::invalid_bundle("unbalanced XML end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => return Ok(element),
                }
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .decode()
                    .map_err(|e| Error::invalid_bundle(format!("bad XML text: {e}")))?;
                if !value.trim().is_empty()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(XmlNode::Text(value.into_owned()));
                }
            }
            Ok(Event::Eof) => {
                return Err(Error::invalid_bundle("XML document has no root element"));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::invalid_bundle(format!("malformed XML: {e}"))),
        }
    }
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(split_prefix(&name).1);
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| Error::invalid_bundle(format!("malformed attribute: {e}")))?;
        element.attributes.push(attribute_from_raw(&attribute)?);
    }
    Ok(element)
}

fn attribute_from_raw(attribute: &Attribute) -> Result<XmlAttribute> {
    let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
    let value = attribute
        .unescape_value()
        .map_err(|e| Error::invalid_bundle(format!("malformed attribute value: {e}")))?
        .into_owned();
    let (namespace, name) = split_prefix(&key);
    Ok(XmlAttribute {
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
        value,
        ref_id: None,
    })
}

fn split_prefix(qualified: &str) -> (Option<&str>, &str) {
    match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified),
    }
}

/// Serializes an element tree back to XML text.
pub fn serialize_xml(root: &XmlElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    write_element(&mut writer, root)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| Error::internal(format!("non-UTF-8 XML output: {e}")))
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.clone());
    for attribute in &element.attributes {
        let key = match &attribute.namespace {
            Some(namespace) => format!("{namespace}:{}", attribute.name),
            None => attribute.name.clone(),
        };
        start.push_attribute((key.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::internal(format!("XML write failed: {e}")))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::internal(format!("XML write failed: {e}")))?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| Error::internal(format!("XML write failed: {e}")))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.clone())))
        .map_err(|e| Error::internal(format!("XML write failed: {e}")))?;
    Ok(())
}
