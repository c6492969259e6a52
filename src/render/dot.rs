use crate::heap::ObjectId;
use crate::retention::{RetentionGraph, RetentionNode};

use super::GraphRenderer;

const TARGET_COLOR: &str = "#FFB6C1";
const STRONG_ROOT_COLOR: &str = "#ADD8E6";
const WEAK_ROOT_COLOR: &str = "#D3D3D3";

/// Graphviz DOT output.
///
/// Roots are filled blue (grey for the finalizer queue), the traced instance is
/// filled pink, and finalizer or ephemeron references are drawn dashed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl GraphRenderer for DotRenderer {
    fn extension(&self) -> &str {
        "dot"
    }

    fn render(&self, graph: &RetentionGraph) -> String {
        let mut dot = String::new();
        dot.push_str("digraph retention {\n");
        dot.push_str("    rankdir=LR;\n");
        dot.push_str("    node [shape=box, fontname=\"Arial\"];\n");
        dot.push_str("    edge [fontname=\"Arial\"];\n");

        // Roots first so the layout reads left to right from the root.
        let mut nodes: Vec<&RetentionNode> = graph.roots().collect();
        nodes.extend(graph.nodes().iter().filter(|node| node.root.is_none()));
        for node in nodes {
            dot.push_str(&format!("    {};\n", node_statement(node, graph.target())));
        }

        for edge in graph.edges() {
            let mut attrs = format!("label=\"{}\"", escape(&edge.kind.to_string()));
            if !edge.kind.is_strong() {
                attrs.push_str(", style=dashed");
            }
            dot.push_str(&format!(
                "    {} -> {} [{}];\n",
                node_name(edge.from),
                node_name(edge.to),
                attrs
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn node_name(id: ObjectId) -> String {
    format!("o{}", id.raw())
}

fn node_statement(node: &RetentionNode, target: ObjectId) -> String {
    let mut label = format!("{}\\n{}", escape(&node.type_name), node.id);
    let fill = match &node.root {
        Some(root) => {
            label.push_str(&format!("\\nroot: {}", escape(&root.to_string())));
            Some(if root.is_strong() {
                STRONG_ROOT_COLOR
            } else {
                WEAK_ROOT_COLOR
            })
        }
        None if node.id == target => Some(TARGET_COLOR),
        None => None,
    };

    match fill {
        Some(color) => format!(
            "{} [label=\"{}\", style=filled, fillcolor=\"{}\"]",
            node_name(node.id),
            label,
            color
        ),
        None => format!("{} [label=\"{}\"]", node_name(node.id), label),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
