//! XML persistence for stat trees.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <stats>
//!   <ok transcripts="3" transcript_annotations="0"/>
//!   <not_ok transcripts="2" transcript_annotations="4">
//!     <noStop transcripts="2" transcript_annotations="4"/>
//!   </not_ok>
//! </stats>
//! ```
//!
//! Element names are cleaned labels; the root carries no counters.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::Error;

use super::tree::{StatNode, StatTree};

const TRANSCRIPTS: &[u8] = b"transcripts";
const TRANSCRIPT_ANNOTATIONS: &[u8] = b"transcript_annotations";

pub fn write_stat_tree<W: Write>(writer: W, tree: &StatTree) -> Result<(), Error> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_node(&mut xml, tree.root(), true)?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &StatNode, is_root: bool) -> Result<(), Error> {
    let mut start = BytesStart::new(node.name());
    let transcripts = node.transcripts().to_string();
    let annotations = node.transcript_annotations().to_string();
    if !is_root {
        start.push_attribute(("transcripts", transcripts.as_str()));
        start.push_attribute(("transcript_annotations", annotations.as_str()));
    }

    if node.children().is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }
    xml.write_event(Event::Start(start))?;
    for child in node.children() {
        write_node(xml, child, false)?;
    }
    xml.write_event(Event::End(BytesEnd::new(node.name())))?;
    Ok(())
}

pub fn write_stat_tree_file(path: &Path, tree: &StatTree) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_stat_tree(&mut writer, tree)?;
    writer.flush()?;
    Ok(())
}

pub fn read_stat_tree<R: BufRead>(reader: R) -> Result<StatTree, Error> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<StatNode> = Vec::new();
    let mut root: Option<StatNode> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let node = node_from_element(&e, stack.is_empty() && root.is_none())?;
                stack.push(node);
            }
            Event::Empty(e) => {
                let node = node_from_element(&e, stack.is_empty() && root.is_none())?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::Format("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::Format("unclosed element in stat tree".to_string()));
    }
    let root = root.ok_or_else(|| Error::Format("stat tree document is empty".to_string()))?;
    StatTree::from_root(root)
}

pub fn read_stat_tree_file(path: &Path) -> Result<StatTree, Error> {
    let file = File::open(path)?;
    let tree = read_stat_tree(BufReader::new(file))?;
    log::debug!("read stat tree from {}", path.display());
    Ok(tree)
}

fn attach(
    stack: &mut [StatNode],
    root: &mut Option<StatNode>,
    node: StatNode,
) -> Result<(), Error> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(Error::Format("more than one root element".to_string())),
    }
    Ok(())
}

fn node_from_element(e: &BytesStart<'_>, is_root: bool) -> Result<StatNode, Error> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| Error::Format(format!("element name is not UTF-8: {err}")))?
        .to_string();
    if is_root {
        return Ok(StatNode::new(name));
    }

    let mut transcripts = None;
    let mut annotations = None;
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let slot = match attr.key.as_ref() {
            TRANSCRIPTS => &mut transcripts,
            TRANSCRIPT_ANNOTATIONS => &mut annotations,
            _ => continue,
        };
        *slot = Some(parse_counter(&name, &attr.value)?);
    }
    let missing = |what: &str| Error::Format(format!("<{name}> has no {what} attribute"));
    Ok(StatNode::with_counts(
        name.clone(),
        transcripts.ok_or_else(|| missing("transcripts"))?,
        annotations.ok_or_else(|| missing("transcript_annotations"))?,
    ))
}

fn parse_counter(name: &str, value: &[u8]) -> Result<u64, Error> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| {
            Error::Format(format!(
                "<{name}> counter '{}' is not an unsigned integer",
                String::from_utf8_lossy(value)
            ))
        })
}
