use std::env;

use xilang_frontend::{lower, FileParser, NodeId, ParseTree};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: print_ast <path.xi>");
        std::process::exit(2);
    });
    let parser = FileParser::new(&path);
    match parser.parse() {
        Ok(tree) => print_node(tree, tree.root(), 0),
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn print_node(tree: &ParseTree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    let indent = "  ".repeat(depth);
    let payload = if lower::has_lowering(node.rule()) {
        match tree.data(id) {
            Ok(ast) => format!(" => {}", ast),
            Err(e) => format!(" => <{}>", e),
        }
    } else {
        String::new()
    };
    if node.children().is_empty() {
        println!(
            "{}{:?} {:?} @{}{}",
            indent,
            node.rule(),
            tree.text(id),
            node.position(),
            payload
        );
    } else {
        println!("{}{:?} @{}{}", indent, node.rule(), node.position(), payload);
        for &child in node.children() {
            print_node(tree, child, depth + 1);
        }
    }
}
