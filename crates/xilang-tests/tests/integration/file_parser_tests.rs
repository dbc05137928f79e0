//! FileParser caching and the checked-in fixture programs.

use std::fs;
use std::path::PathBuf;

use xilang_frontend::{Config, ErrorClass, FileParser};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn parse_twice_returns_the_same_tree() {
    let parser = FileParser::new(fixtures_dir().join("hello.xi"));
    let first = parser.parse().unwrap();
    let second = parser.parse().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(
        first.file().unwrap(),
        second.file().unwrap()
    ));
}

#[test]
fn every_fixture_parses_and_lowers() {
    let mut found = 0usize;
    for entry in fs::read_dir(fixtures_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) != Some("xi") {
            continue;
        }
        found += 1;
        let parser = FileParser::new(&path);
        let tree = parser
            .parse()
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        tree.lower_all()
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
    }
    assert!(found > 0, "no .xi fixtures found");
}

#[test]
fn shapes_fixture_contents() {
    let parser = FileParser::new(fixtures_dir().join("shapes.xi"));
    let tree = parser.parse().unwrap();
    let file = tree.file().unwrap();
    assert_eq!(file.uses.len(), 2);
    assert_eq!(file.interfaces.len(), 2);
    assert_eq!(file.structs.len(), 2);
    assert_eq!(file.enums.len(), 1);
    assert_eq!(file.fns.len(), 1);
    assert_eq!(file.globals.len(), 1);

    let alias = file.uses.get(&tree, 1).unwrap().unwrap();
    assert_eq!(alias.path.to_string(), "::std::collections::List<::Shape>");
    assert_eq!(alias.alias.as_deref(), Some("Shapes"));

    let solid = file.interfaces.get(&tree, 1).unwrap().unwrap();
    assert_eq!(solid.impls.len(), 1);
    assert_eq!(solid.impls[0].to_string(), "::Shape");

    let rect = file.structs.get(&tree, 0).unwrap().unwrap();
    assert_eq!(rect.attribs.len(), 1);
    assert_eq!(rect.fields.len(), 2);
    assert_eq!(rect.fns.len(), 1);
    assert_eq!(rect.methods.len(), 2);

    let kind = file.enums.get(&tree, 0).unwrap().unwrap();
    assert_eq!(kind.fields.len(), 3);
    assert_eq!(kind.methods.len(), 1);
}

#[test]
fn config_builds_the_entry_parser() {
    let config = Config::new(fixtures_dir().join("control_flow.xi"));
    assert_eq!(config.cache_dir, fixtures_dir().join(".xicache"));
    let parser = config.entry_parser();
    assert!(parser.parse().is_ok());
}

#[test]
fn missing_entry_reports_io() {
    let parser = FileParser::new(fixtures_dir().join("does_not_exist.xi"));
    assert_eq!(parser.parse().unwrap_err().class(), ErrorClass::Io);
    assert_eq!(parser.parse().unwrap_err().class(), ErrorClass::Io);
}
