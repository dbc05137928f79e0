//! Graphviz rendering of a parse tree.

use std::fmt;

use crate::tree::ParseTree;

/// Leaf text longer than this is cut off in labels.
const MAX_LABEL_TEXT: usize = 24;

/// `Display` adapter that writes a tree as a DOT digraph.
pub struct Dot<'t>(pub &'t ParseTree);

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        writeln!(f, "digraph parse_tree {{")?;
        writeln!(f, "    node [shape=box, fontname=\"monospace\"];")?;
        for id in tree.preorder() {
            let node = tree.node(id);
            write!(f, "    {} [label=\"{:?} {}", id, node.rule(), node.position())?;
            if node.children().is_empty() {
                write!(f, "\\n{}", escape(&truncate(tree.text(id))))?;
            }
            writeln!(f, "\"];")?;
            for child in node.children() {
                writeln!(f, "    {} -> {};", id, child)?;
            }
        }
        writeln!(f, "}}")
    }
}

pub fn to_dot(tree: &ParseTree) -> String {
    Dot(tree).to_string()
}

fn truncate(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_LABEL_TEXT).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
