//! Tests for loading definition files and applying toggle batches

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use checktree::application::services::{SelectionService, ToggleOp, TreeSummary};
use checktree::application::ApplicationError;
use checktree::domain::{CheckState, ConstructionError, Definition, DomainError, NodeDef};
use checktree::infrastructure::traits::RealFileSystem;
use checktree::util::testing;

fn service() -> SelectionService {
    testing::init_test_setup();
    SelectionService::new(Arc::new(RealFileSystem))
}

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(name)
}

/// Helper to create a temp definition file for testing
fn create_definition(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write definition");
    path
}

// ============================================================
// Loading
// ============================================================

#[test]
fn given_shop_definition_when_loading_then_builds_unchecked_tree() {
    let svc = service();
    let selection = svc.load(&resource("shop.toml")).unwrap();

    assert!(selection.is_empty());
    assert_eq!(selection.tree().name("surface_pro").unwrap(), "Surface Pro");
    assert_eq!(
        svc.summary(selection.tree()),
        TreeSummary {
            nodes: 11,
            roots: 3,
            leaves: 7,
            depth: 3,
        }
    );
}

#[test]
fn given_parent_only_links_when_loading_then_children_resolved() {
    let svc = service();
    let selection = svc.load(&resource("shop.toml")).unwrap();

    assert_eq!(
        selection.tree().children("books").unwrap(),
        vec!["fiction", "nonfiction"]
    );
}

#[test]
fn given_initially_checked_nodes_when_loading_then_propagated() {
    let svc = service();
    let selection = svc.load(&resource("preselected.toml")).unwrap();

    assert_eq!(selection.checked_leaf_ids(), vec!["tools", "basil"]);
    assert_eq!(selection.tristate("seeds").unwrap(), CheckState::Indeterminate);
    assert_eq!(selection.tristate("garden").unwrap(), CheckState::Indeterminate);
}

#[test]
fn given_missing_file_when_loading_then_definition_not_found() {
    let svc = service();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");

    let err = svc.load(&missing).unwrap_err();

    assert!(
        matches!(err, ApplicationError::DefinitionNotFound(ref p) if p == &missing),
        "got {err:?}"
    );
}

#[test]
fn given_invalid_toml_when_loading_then_invalid_definition() {
    let svc = service();
    let temp = TempDir::new().unwrap();
    let path = create_definition(&temp, "broken.toml", "[[nodes]\nid = 1\n");

    let err = svc.load(&path).unwrap_err();

    assert!(
        matches!(err, ApplicationError::InvalidDefinition { .. }),
        "got {err:?}"
    );
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_cyclic_definition_when_loading_then_construction_error() {
    let svc = service();
    let err = svc.load(&resource("cycle.toml")).unwrap_err();

    assert!(
        matches!(
            err,
            ApplicationError::Domain(DomainError::Construction(
                ConstructionError::CycleDetected(_)
            ))
        ),
        "got {err:?}"
    );
}

#[test]
fn given_dangling_parent_when_building_from_definition_then_fails() {
    let definition = Definition {
        nodes: vec![
            NodeDef::new("a").with_parent("ghost").with_checked(true),
            NodeDef::new("b"),
        ],
    };

    let err = SelectionService::from_definition(definition).unwrap_err();

    assert!(err.to_string().contains("ghost"), "got {err}");
}

#[test]
fn given_deep_chain_when_summarizing_then_reports_full_depth() {
    let svc = service();
    let nodes = (0..150_000)
        .map(|i| match i {
            0 => NodeDef::new("n0"),
            _ => NodeDef::new(format!("n{i}")).with_parent(format!("n{}", i - 1)),
        })
        .collect();
    let selection = SelectionService::from_definition(Definition { nodes }).unwrap();

    let summary = svc.summary(selection.tree());

    assert_eq!(
        summary,
        TreeSummary {
            nodes: 150_000,
            roots: 1,
            leaves: 1,
            depth: 150_000,
        }
    );
}

// ============================================================
// Applying toggles
// ============================================================

#[test]
fn given_ordered_ops_when_applying_then_later_ops_win() {
    let svc = service();
    let mut selection = svc.load(&resource("shop.toml")).unwrap();
    let ops = vec![
        ToggleOp::new("electronics", true),
        ToggleOp::new("laptops", false),
        ToggleOp::new("macbook", true),
    ];

    svc.apply(&mut selection, &ops).unwrap();

    assert_eq!(selection.tristate("mobile_phones").unwrap(), CheckState::Checked);
    assert_eq!(selection.tristate("laptops").unwrap(), CheckState::Indeterminate);
    assert_eq!(
        selection.checked_leaf_ids(),
        vec!["iphone", "android", "macbook"]
    );
}

#[test]
fn given_unknown_id_in_batch_when_applying_then_nothing_applied() {
    let svc = service();
    let mut selection = svc.load(&resource("shop.toml")).unwrap();
    let ops = vec![ToggleOp::new("books", true), ToggleOp::new("games", true)];

    let err = svc.apply(&mut selection, &ops).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Domain(DomainError::NotFound(ref id)) if id == "games"),
        "got {err:?}"
    );
    assert!(selection.is_empty());
}
