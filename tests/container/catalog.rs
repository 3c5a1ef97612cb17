//! Integration tests for ScriptCatalog

use intvm_container::{Catalog, ScriptCatalog};

fn catalog() -> ScriptCatalog {
    ScriptCatalog::new()
        .with_procedure("start", 0)
        .with_procedure("talk_p_proc", 0x40)
        .with_procedure("critter_p_proc", 0x9A)
        .with_string(0, "Hello")
        .with_string(12, "Goodbye")
}

#[test]
fn procedures_by_name() {
    let catalog = catalog();
    let proc = catalog.procedure("talk_p_proc").unwrap();
    assert_eq!(proc.offset, 0x40);
    assert_eq!(&*proc.name, "talk_p_proc");
    assert!(catalog.procedure("missing").is_none());
}

#[test]
fn procedures_by_index_follow_insertion_order() {
    let catalog = catalog();
    assert_eq!(&*catalog.procedure_at(2).unwrap().name, "critter_p_proc");
    assert!(catalog.procedure_at(3).is_none());
    assert!(catalog.procedure_at(-1).is_none());
}

#[test]
fn strings_by_index() {
    let catalog = catalog();
    assert_eq!(catalog.string(12).map(|s| &**s), Some("Goodbye"));
    assert!(catalog.string(1).is_none());
    assert_eq!(catalog.string_count(), 2);
}

#[test]
fn add_procedure_returns_index() {
    let mut catalog = ScriptCatalog::new();
    assert_eq!(catalog.add_procedure("a", 0), 0);
    assert_eq!(catalog.add_procedure("b", 8), 1);
    assert_eq!(catalog.procedures().len(), 2);
}
