//! Xilang CLI - command-line driver for the xilang compiler front end
//!
//! Usage:
//!   xilang <file>                 # Parse and lower a .xi file
//!   xilang <file> --ast           # Also dump the parse tree as DOT and JSON
//!   xilang <file> --cache-dir out # Put dumps somewhere other than .xicache

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xilang_frontend::{dot, lower, Config, ErrorClass, FrontendError, ParseTree};

#[derive(Parser)]
#[command(name = "xilang")]
#[command(version)]
#[command(about = "Xilang compiler front end")]
struct Cli {
    /// Entry source file
    #[arg(value_name = "FILE")]
    entry: PathBuf,

    /// Emit bytecode only, do not run
    #[arg(short, long)]
    compile: bool,

    /// Dump the parse tree as DOT and JSON into the cache directory
    #[arg(long)]
    ast: bool,

    /// Do not load the system modules
    #[arg(long)]
    no_sys: bool,

    /// Directory for dumps and build artifacts (default: .xicache next to FILE)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.entry);
        config.compile = self.compile;
        config.dump_ast = self.ast;
        config.no_sys = self.no_sys;
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.into_config();
    tracing::debug!("{:?}", config);

    let parser = config.entry_parser();
    let tree = match parser.parse() {
        Ok(tree) => tree,
        Err(e) => exit_with(&config.entry, &e),
    };

    if config.dump_ast {
        if let Err(e) = dump_ast(&config, tree) {
            eprintln!("Error writing AST dump: {}", e);
            process::exit(1);
        }
    }

    match tree.lower_all() {
        Ok(count) => {
            println!(
                "✓ {} parsed ({} nodes, {} lowered)",
                config.entry.display(),
                tree.len(),
                count
            );
        }
        Err(e) => exit_with(&config.entry, &e),
    }

    if config.compile || config.no_sys {
        tracing::debug!("compile/no-sys requested; no later stage to hand off to");
    }
}

fn exit_with(entry: &Path, e: &FrontendError) -> ! {
    let label = match e.class() {
        ErrorClass::Syntax => "syntax error",
        ErrorClass::Unsupported => "unsupported",
        ErrorClass::Internal => "internal compiler error",
        ErrorClass::Io => "io error",
    };
    eprintln!("{}: {}: {}", entry.display(), label, e);
    process::exit(match e.class() {
        ErrorClass::Internal => 101,
        _ => 1,
    });
}

fn dump_ast(config: &Config, tree: &ParseTree) -> std::io::Result<()> {
    fs::create_dir_all(&config.cache_dir)?;
    let stem = config.entry_stem();

    let dot_path = config.cache_dir.join(format!("{}.ast.dot", stem));
    fs::write(&dot_path, dot::to_dot(tree))?;

    let json_path = config.cache_dir.join(format!("{}.ast.json", stem));
    let value = json!({
        "entry": config.entry.display().to_string(),
        "uses": use_paths(tree),
        "tree": node_json(tree, tree.root()),
    });
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(&json_path, text)?;

    tracing::debug!("wrote {} and {}", dot_path.display(), json_path.display());
    Ok(())
}

fn use_paths(tree: &ParseTree) -> Value {
    let Ok(file) = tree.file() else {
        return Value::Null;
    };
    let paths: Vec<Value> = file
        .uses
        .iter(tree)
        .filter_map(Result::ok)
        .map(|u| json!({ "path": u.path, "alias": u.alias }))
        .collect();
    Value::Array(paths)
}

fn node_json(tree: &ParseTree, id: xilang_frontend::NodeId) -> Value {
    let node = tree.node(id);
    let mut value = json!({
        "rule": format!("{:?}", node.rule()),
        "line": node.position().line,
        "column": node.position().column,
    });
    if node.children().is_empty() {
        value["text"] = Value::String(tree.text(id).to_string());
    } else {
        value["children"] = node
            .children()
            .iter()
            .map(|&child| node_json(tree, child))
            .collect();
    }
    if lower::has_lowering(node.rule()) {
        if let Ok(ast) = tree.data(id) {
            value["ast"] = Value::String(ast.to_string());
        }
    }
    value
}
