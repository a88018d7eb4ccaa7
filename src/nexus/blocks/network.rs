//! NETWORK block codec.
//!
//! ```text
//! DIMENSIONS NNODES=n NEDGES=m;
//! [TYPE HaplotypeNetwork|Other;]
//! [PROPERTIES key=value ..;]
//! NODES ID=i [LABEL=l] [key=value ..], ..;
//! EDGES ID=i SID=s TID=t [key=value ..], ..;
//! ```

use crate::model::{Attributes, NetworkBlock, NetworkEdge, NetworkNode, NetworkType};
use crate::nexus::blocks::{at_block_end, read_key_values, skip_command};
use crate::nexus::defs::{DIMENSIONS, EDGES, NODES, PROPERTIES, TYPE};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Tokenizer, Warnings};
use std::io;
use std::io::Write;

/// Key/value pairs of one NODES or EDGES record and its line.
struct Record {
    pairs: Vec<(String, String)>,
    line: usize,
}

impl Record {
    fn error(&self, msg: String) -> ParsingError {
        ParsingError::at_line(ParsingErrorType::Structural(msg), self.line)
    }

    /// Removes `key` and parses its value as an id.
    fn take_id(&mut self, key: &str) -> Result<usize, ParsingError> {
        let index = self
            .pairs
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| self.error(format!("record without {}", key.to_uppercase())))?;
        let (_, value) = self.pairs.remove(index);
        value
            .parse::<usize>()
            .map_err(|_| ParsingError::at_line(
                ParsingErrorType::Lexical(format!("integer for {key}, got '{value}'")),
                self.line,
            ))
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    fn into_attributes(self) -> Attributes {
        let mut attributes = Attributes::new();
        for (key, value) in self.pairs {
            attributes.insert(key, value);
        }
        attributes
    }
}

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a NETWORK block.
///
/// # Errors
/// Structural error on node or edge counts differing from DIMENSIONS,
/// duplicate ids, and edges whose endpoints are no node ids.
pub fn parse_network<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    warnings: &mut Warnings,
) -> Result<NetworkBlock, ParsingError> {
    let mut nnodes: Option<usize> = None;
    let mut nedges: Option<usize> = None;
    let mut network_type = NetworkType::default();
    let mut properties = Attributes::new();
    let mut nodes: Vec<Record> = Vec::new();
    let mut edges: Vec<Record> = Vec::new();

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            nnodes = dimensions.take_usize("nnodes")?;
            nedges = dimensions.take_usize("nedges")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("type")? {
            let name = tokenizer.next_label()?;
            network_type = NetworkType::from_name(&name).ok_or_else(|| {
                ParsingError::unknown_construct(tokenizer, format!("network type '{name}'"))
            })?;
            tokenizer.match_ignore_case(";")?;
        } else if tokenizer.consume_if_ignore_case("properties")? {
            for record in read_records(tokenizer)? {
                for (key, value) in record.pairs {
                    properties.insert(key, value);
                }
            }
        } else if tokenizer.consume_if_ignore_case("nodes")? {
            nodes = read_records(tokenizer)?;
        } else if tokenizer.consume_if_ignore_case("edges")? {
            edges = read_records(tokenizer)?;
        } else {
            skip_command(tokenizer, "NETWORK", warnings)?;
        }
    }

    check_count("nodes", nnodes, nodes.len(), tokenizer)?;
    check_count("edges", nedges, edges.len(), tokenizer)?;

    let mut block = NetworkBlock::new(network_type);
    *block.properties_mut() = properties;

    for mut record in nodes {
        let id = record.take_id("id")?;
        let label = record.take("label");
        let line = record.line;
        let node = NetworkNode {
            id,
            label,
            attributes: record.into_attributes(),
        };
        if !block.add_node(node) {
            return Err(ParsingError::at_line(
                ParsingErrorType::Structural(format!("duplicate node id {id}")),
                line,
            ));
        }
    }
    for mut record in edges {
        let id = record.take_id("id")?;
        let source = record.take_id("sid")?;
        let target = record.take_id("tid")?;
        for endpoint in [source, target] {
            if block.node(endpoint).is_none() {
                return Err(record.error(format!("unresolved node id {endpoint} in edge {id}")));
            }
        }
        let line = record.line;
        let edge = NetworkEdge {
            id,
            source,
            target,
            attributes: record.into_attributes(),
        };
        if !block.add_edge(edge) {
            return Err(ParsingError::at_line(
                ParsingErrorType::Structural(format!("duplicate edge id {id}")),
                line,
            ));
        }
    }
    Ok(block)
}

/// Reads comma separated records of `key=value` pairs up to and including `;`.
fn read_records<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<Vec<Record>, ParsingError> {
    let mut records = Vec::new();
    loop {
        tokenizer.skip_eols()?;
        let line = tokenizer.line();
        let (pairs, ended) = read_key_values(tokenizer)?;
        if !pairs.is_empty() {
            records.push(Record { pairs, line });
        }
        if ended {
            return Ok(records);
        }
    }
}

fn check_count<S: ByteSource>(
    what: &str,
    declared: Option<usize>,
    found: usize,
    tokenizer: &Tokenizer<S>,
) -> Result<(), ParsingError> {
    match declared {
        Some(declared) if declared != found => Err(ParsingError::structural(
            tokenizer,
            format!("DIMENSIONS declares {declared} {what}, found {found}"),
        )),
        _ => Ok(()),
    }
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a NETWORK block.
pub fn write_network<W: Write>(writer: &mut NexusWriter<W>, block: &NetworkBlock) -> io::Result<()> {
    // "\tDIMENSIONS nNodes=n nEdges=m;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("nNodes", &block.nodes().len().to_string())?
        .option("nEdges", &block.edges().len().to_string())?
        .semicolon_ln()?;

    writer
        .tab()?
        .write_all(TYPE)?
        .space()?
        .text(block.network_type().name())?
        .semicolon_ln()?;

    if !block.properties().is_empty() {
        writer.tab()?.write_all(PROPERTIES)?;
        write_attributes(writer, block.properties())?;
        writer.semicolon_ln()?;
    }

    // "\t\tid=i label=l key=value,"
    writer.tab()?.write_all(NODES)?.newline()?;
    let count = block.nodes().len();
    for (i, node) in block.nodes().iter().enumerate() {
        writer.tab()?.tab()?.text("id")?.equals()?.integer(node.id)?;
        if let Some(label) = &node.label {
            writer.space()?.text("label")?.equals()?.label(label)?;
        }
        write_attributes(writer, &node.attributes)?;
        if i + 1 < count {
            writer.comma()?;
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;

    // "\t\tid=i sid=s tid=t key=value,"
    writer.tab()?.write_all(EDGES)?.newline()?;
    let count = block.edges().len();
    for (i, edge) in block.edges().iter().enumerate() {
        writer
            .tab()?
            .tab()?
            .text("id")?
            .equals()?
            .integer(edge.id)?
            .option("sid", &edge.source.to_string())?
            .option("tid", &edge.target.to_string())?;
        write_attributes(writer, &edge.attributes)?;
        if i + 1 < count {
            writer.comma()?;
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}

fn write_attributes<W: Write>(writer: &mut NexusWriter<W>, attributes: &Attributes) -> io::Result<()> {
    for (key, value) in attributes.iter() {
        writer.space()?.label(key)?.equals()?.label(value)?;
    }
    Ok(())
}
