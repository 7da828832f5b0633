//! Bytes to [`Node`] conversion.
//!
//! Imagr configurations are property lists, usually XML and occasionally
//! binary. YAML (and therefore JSON) is accepted too, for configurations
//! kept in source control in a friendlier format.

use std::fmt;
use std::io::Cursor;

use imagr_validator_core::{Mapping, Node};
use serde::Serialize;

/// Serialization format a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    /// XML property list.
    XmlPlist,
    /// Binary property list (`bplist00`).
    BinaryPlist,
    /// YAML or JSON.
    Yaml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::XmlPlist => "XML property list",
            Self::BinaryPlist => "binary property list",
            Self::Yaml => "YAML",
        };
        f.write_str(name)
    }
}

const BINARY_PLIST_MAGIC: &[u8] = b"bplist";
const XML_PREFIXES: [&[u8]; 3] = [b"<?xml", b"<!DOCTYPE plist", b"<plist"];

/// Detects the format of `bytes` without parsing it.
#[must_use]
pub fn detect_format(bytes: &[u8]) -> DocumentFormat {
    if bytes.starts_with(BINARY_PLIST_MAGIC) {
        return DocumentFormat::BinaryPlist;
    }
    let text = trim_leading(bytes);
    if XML_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) {
        DocumentFormat::XmlPlist
    } else {
        DocumentFormat::Yaml
    }
}

/// Parses `bytes` into a document tree.
///
/// # Errors
///
/// Returns the parser's message if the bytes are not well-formed in the
/// detected format.
pub fn parse_document(bytes: &[u8]) -> Result<(DocumentFormat, Node), String> {
    let format = detect_format(bytes);
    let node = match format {
        DocumentFormat::BinaryPlist => parse_plist(bytes)?,
        DocumentFormat::XmlPlist => parse_plist(trim_leading(bytes))?,
        DocumentFormat::Yaml => {
            let text = trim_leading(bytes);
            if text.is_empty() {
                return Ok((format, Node::Null));
            }
            let value: serde_yaml::Value =
                serde_yaml::from_slice(text).map_err(|e| e.to_string())?;
            from_yaml(value)?
        }
    };
    Ok((format, node))
}

fn parse_plist(bytes: &[u8]) -> Result<Node, String> {
    let value = plist::Value::from_reader(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    Ok(from_plist(value))
}

/// Strips a UTF-8 BOM and leading whitespace.
pub(crate) fn trim_leading(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

#[allow(clippy::cast_precision_loss)]
fn from_plist(value: plist::Value) -> Node {
    match value {
        plist::Value::Dictionary(dict) => Node::Mapping(
            dict.into_iter()
                .map(|(key, value)| (key, from_plist(value)))
                .collect(),
        ),
        plist::Value::Array(items) => Node::Sequence(items.into_iter().map(from_plist).collect()),
        plist::Value::String(s) => Node::String(s),
        plist::Value::Boolean(b) => Node::Bool(b),
        plist::Value::Real(f) => Node::Number(f),
        plist::Value::Integer(i) => Node::Number(
            i.as_signed()
                .map(|i| i as f64)
                .or_else(|| i.as_unsigned().map(|u| u as f64))
                .unwrap_or_default(),
        ),
        plist::Value::Data(bytes) => Node::Data(bytes),
        plist::Value::Date(date) => Node::String(date.to_xml_format()),
        plist::Value::Uid(uid) => Node::Number(uid.get() as f64),
        _ => Node::Null,
    }
}

fn from_yaml(value: serde_yaml::Value) -> Result<Node, String> {
    Ok(match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => Node::Number(n.as_f64().unwrap_or_default()),
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut entries = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let serde_yaml::Value::String(key) = key else {
                    return Err(format!("mapping keys must be strings, found {key:?}"));
                };
                entries.insert(key, from_yaml(value)?);
            }
            Node::Mapping(entries)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}
