//! Structural well-formedness checks run before the rule engine.

use std::io::Cursor;

use imagr_validator_core::Node;
use plist::stream::{BinaryReader, Event, OwnedEvent, XmlReader};

use super::parse::{DocumentFormat, detect_format, trim_leading};

/// Rejects property lists nested deeper than `max_depth` before a tree is
/// built from them.
///
/// Walks the plist event stream, which does not recurse, so arbitrarily
/// deep input is refused without exhausting the stack. Malformed input
/// passes and is left to the parser to report. YAML is bounded by its own
/// parser's recursion limit.
///
/// # Errors
///
/// Returns a description of the overrun.
pub fn prescan(bytes: &[u8], max_depth: usize) -> Result<(), String> {
    match detect_format(bytes) {
        DocumentFormat::XmlPlist => {
            check_event_depth(XmlReader::new(Cursor::new(trim_leading(bytes))), max_depth)
        }
        DocumentFormat::BinaryPlist => {
            check_event_depth(BinaryReader::new(Cursor::new(bytes)), max_depth)
        }
        DocumentFormat::Yaml => Ok(()),
    }
}

fn check_event_depth(
    events: impl Iterator<Item = Result<OwnedEvent, plist::Error>>,
    max_depth: usize,
) -> Result<(), String> {
    let mut depth = 0_usize;
    for event in events {
        let Ok(event) = event else {
            return Ok(());
        };
        match event {
            Event::StartArray(_) | Event::StartDictionary(_) => {
                depth += 1;
                if depth > max_depth {
                    return Err(format!(
                        "document nests more than {max_depth} levels deep"
                    ));
                }
            }
            Event::EndCollection => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Checks that `root` can be handed to the validator.
///
/// # Errors
///
/// Returns a description of the first structural problem: an empty
/// document, a root that is not a dictionary, or nesting deeper than
/// `max_depth`.
pub fn lint(root: &Node, max_depth: usize) -> Result<(), String> {
    if matches!(root, Node::Null) {
        return Err("document is empty".to_string());
    }
    if !matches!(root, Node::Mapping(_)) {
        return Err(format!(
            "document root must be a dictionary, found {}",
            root.kind()
        ));
    }
    let depth = root.depth();
    if depth > max_depth {
        return Err(format!(
            "document nests {depth} levels deep, more than the {max_depth} allowed"
        ));
    }
    Ok(())
}
