//! Graph dumps for inspection outside the process.
//!
//! ```text
//! WordGraph → export_cypher_dump() → CREATE / MATCH…CREATE statements
//!   → paste into Neo4j Browser to look at the graph
//! WordGraph → export_json() → {"nodes": [...], "relationships": [...]}
//! ```

use std::io::Write;

use serde::Serialize;

use crate::model::*;
use crate::storage::StorageBackend;
use crate::tx::TxMode;
use crate::Result;

/// Write the graph as a Cypher script.
///
/// Node ids are kept in an `_id` property so relationships can be matched
/// back to their endpoints. Properties are written in key order.
pub fn export_cypher_dump<B: StorageBackend>(backend: &B, writer: &mut dyn Write) -> Result<()> {
    let tx = backend.begin_tx(TxMode::ReadOnly)?;

    writeln!(writer, "// msc word graph dump")?;
    writeln!(writer, "// Nodes: {}", backend.node_count(&tx)?)?;
    writeln!(writer, "// Relationships: {}", backend.relationship_count(&tx)?)?;
    writeln!(writer)?;

    let nodes = backend.all_nodes(&tx)?;
    for node in &nodes {
        let labels_str = if node.labels.is_empty() {
            String::new()
        } else {
            format!(":{}", node.labels.join(":"))
        };
        let props_str = format_properties(&node.properties);
        writeln!(
            writer,
            "CREATE (n{} {{_id: {}{}}});",
            labels_str,
            node.id,
            if props_str.is_empty() { String::new() } else { format!(", {props_str}") }
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Relationships")?;

    for rel in outgoing_relationships(backend, &tx, &nodes)? {
        let props_str = format_properties(&rel.properties);
        let props_part = if props_str.is_empty() { String::new() } else { format!(" {{{props_str}}}") };
        writeln!(
            writer,
            "MATCH (a {{_id: {}}}), (b {{_id: {}}}) CREATE (a)-[:{}{}]->(b);",
            rel.src, rel.dst, rel.rel_type, props_part,
        )?;
    }

    backend.commit_tx(tx)?;
    Ok(())
}

#[derive(Serialize)]
struct Snapshot {
    nodes: Vec<Node>,
    relationships: Vec<Relationship>,
}

/// Write the graph as one pretty-printed JSON document.
pub fn export_json<B: StorageBackend>(backend: &B, writer: &mut dyn Write) -> Result<()> {
    let tx = backend.begin_tx(TxMode::ReadOnly)?;
    let nodes = backend.all_nodes(&tx)?;
    let relationships = outgoing_relationships(backend, &tx, &nodes)?;
    backend.commit_tx(tx)?;

    serde_json::to_writer_pretty(&mut *writer, &Snapshot { nodes, relationships })
        .map_err(std::io::Error::from)?;
    writeln!(writer)?;
    Ok(())
}

/// Every relationship exactly once, grouped by source node, in id order.
fn outgoing_relationships<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    nodes: &[Node],
) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    for node in nodes {
        let mut out = backend.get_relationships(tx, node.id, Direction::Outgoing, None)?;
        out.sort_by_key(|rel| rel.id);
        rels.extend(out);
    }
    Ok(rels)
}

/// Format a PropertyMap as Cypher property string (key: value, ...).
fn format_properties(props: &PropertyMap) -> String {
    let mut keys: Vec<&String> = props.keys().filter(|key| !key.starts_with('_')).collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{}: {}", key, format_value(&props[key])))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a Value as a Cypher literal.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_infinite() && *f > 0.0 => "1.0/0.0".to_string(),
        Value::Float(f) if f.is_infinite() => "-1.0/0.0".to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::String("hello".into())), "'hello'");
        assert_eq!(format_value(&Value::String("Clinton's".into())), "'Clinton\\'s'");
        assert_eq!(format_value(&Value::Int(42)), "42");
        assert_eq!(format_value(&Value::Float(0.5)), "0.5");
        assert_eq!(format_value(&Value::Float(2.0)), "2.0");
        assert_eq!(format_value(&Value::Float(f64::INFINITY)), "1.0/0.0");
        assert_eq!(format_value(&Value::Bool(true)), "true");
        assert_eq!(format_value(&Value::Null), "null");
    }

    #[test]
    fn test_format_properties_sorted() {
        let props = props([("text", Value::from("cat")), ("freq", Value::from(2)), ("_hidden", Value::from(1))]);
        assert_eq!(format_properties(&props), "freq: 2, text: 'cat'");
    }

    fn sample() -> MemoryBackend {
        let backend = MemoryBackend::new();
        let mut tx = backend.begin_tx(TxMode::ReadWrite).unwrap();
        let a = backend.create_node(&mut tx, &["START"], props([("freq", 1)])).unwrap();
        let b = backend.create_node(&mut tx, &["WORD"], props([("text", "cat")])).unwrap();
        backend.create_relationship(&mut tx, a, b, "FOLLOWS", props([("freq", 1)])).unwrap();
        backend.commit_tx(tx).unwrap();
        backend
    }

    #[test]
    fn test_cypher_dump() {
        let mut out = Vec::new();
        export_cypher_dump(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("// Nodes: 2"));
        assert!(text.contains("CREATE (n:WORD {_id: 2, text: 'cat'});"));
        assert!(text.contains("MATCH (a {_id: 1}), (b {_id: 2}) CREATE (a)-[:FOLLOWS {freq: 1}]->(b);"));
    }

    #[test]
    fn test_json_snapshot() {
        let mut out = Vec::new();
        export_json(&sample(), &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["relationships"][0]["rel_type"], "FOLLOWS");
    }
}
