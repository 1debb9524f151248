//! Tests for CheckTree construction and lookups

use rstest::{fixture, rstest};

use checktree::domain::{CheckTree, ConstructionError, DomainError, NodeDef};
use checktree::util::testing;

#[fixture]
fn shop() -> CheckTree {
    testing::init_test_setup();
    CheckTree::build(vec![
        NodeDef::new("electronics")
            .with_name("Electronics")
            .with_children(["mobile_phones", "laptops"]),
        NodeDef::new("mobile_phones").with_children(["iphone", "android"]),
        NodeDef::new("iphone").with_name("iPhone"),
        NodeDef::new("android"),
        NodeDef::new("laptops").with_children(["macbook", "surface_pro"]),
        NodeDef::new("macbook"),
        NodeDef::new("surface_pro"),
        NodeDef::new("books").with_children(["fiction", "nonfiction"]),
        NodeDef::new("fiction"),
        NodeDef::new("nonfiction"),
        NodeDef::new("toys"),
    ])
    .expect("shop tree builds")
}

// ============================================================
// Lookups
// ============================================================

#[rstest]
fn given_shop_when_listing_roots_then_definition_order(shop: CheckTree) {
    assert_eq!(shop.roots().collect::<Vec<_>>(), vec!["electronics", "books", "toys"]);
    assert_eq!(shop.len(), 11);
    assert_eq!(shop.depth(), 3);
}

#[rstest]
fn given_internal_node_when_getting_children_then_ordered(shop: CheckTree) {
    assert_eq!(
        shop.children("electronics").unwrap(),
        vec!["mobile_phones", "laptops"]
    );
    assert!(shop.children("toys").unwrap().is_empty());
}

#[rstest]
#[case("iphone", Some("mobile_phones"))]
#[case("mobile_phones", Some("electronics"))]
#[case("electronics", None)]
#[case("toys", None)]
fn given_node_when_getting_parent_then_precomputed(
    shop: CheckTree,
    #[case] id: &str,
    #[case] parent: Option<&str>,
) {
    assert_eq!(shop.parent(id).unwrap(), parent);
}

#[rstest]
fn given_subtree_when_walking_descendants_then_preorder_excluding_self(shop: CheckTree) {
    let descendants: Vec<_> = shop.descendants("electronics").unwrap().collect();
    assert_eq!(
        descendants,
        vec![
            "mobile_phones",
            "iphone",
            "android",
            "laptops",
            "macbook",
            "surface_pro"
        ]
    );
    assert_eq!(shop.descendants("iphone").unwrap().count(), 0);
}

#[rstest]
fn given_descendants_when_restarted_then_yields_same_sequence(shop: CheckTree) {
    let walk = shop.descendants("books").unwrap();
    let first: Vec<_> = walk.clone().collect();
    let second: Vec<_> = walk.collect();
    let fresh: Vec<_> = shop.descendants("books").unwrap().collect();

    assert_eq!(first, vec!["fiction", "nonfiction"]);
    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[rstest]
fn given_leaf_when_walking_ancestors_then_stops_at_root(shop: CheckTree) {
    let ancestors: Vec<_> = shop.ancestors("surface_pro").unwrap().collect();
    assert_eq!(ancestors, vec!["laptops", "electronics"]);
    assert_eq!(shop.ancestors("toys").unwrap().count(), 0);
}

#[rstest]
fn given_shop_when_listing_leaves_then_tree_order(shop: CheckTree) {
    assert_eq!(
        shop.leaf_ids(),
        vec![
            "iphone",
            "android",
            "macbook",
            "surface_pro",
            "fiction",
            "nonfiction",
            "toys"
        ]
    );
}

#[rstest]
fn given_names_when_looking_up_then_defaults_to_id(shop: CheckTree) {
    assert_eq!(shop.name("iphone").unwrap(), "iPhone");
    assert_eq!(shop.name("android").unwrap(), "android");
    assert!(shop.is_leaf("toys").unwrap());
    assert!(!shop.is_leaf("books").unwrap());
}

#[rstest]
fn given_unknown_id_when_looking_up_then_not_found(shop: CheckTree) {
    let missing = DomainError::NotFound("phones".into());
    assert_eq!(shop.children("phones").unwrap_err(), missing);
    assert_eq!(shop.parent("phones").unwrap_err(), missing);
    assert!(shop.descendants("phones").is_err());
    assert!(shop.ancestors("phones").is_err());
    assert!(!shop.contains("phones"));
}

#[rstest]
fn given_postorder_when_iterating_then_children_before_parents(shop: CheckTree) {
    let order: Vec<_> = shop.iter_postorder().map(|(_, n)| n.id()).collect();
    let pos = |id: &str| order.iter().position(|&x| x == id).unwrap();

    assert_eq!(order.len(), shop.len());
    assert!(pos("iphone") < pos("mobile_phones"));
    assert!(pos("mobile_phones") < pos("electronics"));
    assert!(pos("surface_pro") < pos("laptops"));
}

#[test]
fn given_empty_definition_when_building_then_empty_tree() {
    let tree = CheckTree::build(Vec::new()).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.depth(), 0);
    assert!(tree.leaf_ids().is_empty());
}

// ============================================================
// Large shapes
// ============================================================

fn chain(levels: usize) -> Vec<NodeDef> {
    (0..levels)
        .map(|i| match i {
            0 => NodeDef::new("n0"),
            _ => NodeDef::new(format!("n{i}")).with_parent(format!("n{}", i - 1)),
        })
        .collect()
}

#[test]
fn given_deep_chain_when_measuring_depth_then_counts_every_level() {
    let tree = CheckTree::build(chain(200_000)).unwrap();

    assert_eq!(tree.depth(), 200_000);
    assert_eq!(tree.leaf_ids(), vec!["n199999"]);
    assert_eq!(tree.ancestors("n199999").unwrap().count(), 199_999);
}

#[test]
fn given_wide_parent_only_star_when_building_then_children_keep_input_order() {
    const WIDTH: usize = 200_000;
    let mut defs = vec![NodeDef::new("hub").with_children(["c7", "c3"])];
    defs.extend((0..WIDTH).map(|i| NodeDef::new(format!("c{i}")).with_parent("hub")));

    let tree = CheckTree::build(defs).unwrap();

    let children = tree.children("hub").unwrap();
    assert_eq!(children.len(), WIDTH);
    assert_eq!(&children[..4], ["c7", "c3", "c0", "c1"]);
    assert_eq!(children[WIDTH - 1], format!("c{}", WIDTH - 1));
    assert_eq!(tree.depth(), 2);
}

// ============================================================
// Construction errors
// ============================================================

#[rstest]
#[case::duplicate_id(
    vec![NodeDef::new("a"), NodeDef::new("a")],
    ConstructionError::DuplicateId("a".into())
)]
#[case::dangling_parent(
    vec![NodeDef::new("a").with_parent("ghost")],
    ConstructionError::DanglingParent { id: "a".into(), parent: "ghost".into() }
)]
#[case::dangling_child(
    vec![NodeDef::new("a").with_children(["ghost"])],
    ConstructionError::DanglingChild { id: "a".into(), child: "ghost".into() }
)]
#[case::duplicate_child(
    vec![NodeDef::new("a").with_children(["b", "b"]), NodeDef::new("b")],
    ConstructionError::DuplicateChild { id: "a".into(), child: "b".into() }
)]
#[case::contradicting_links(
    vec![
        NodeDef::new("a").with_children(["c"]),
        NodeDef::new("b"),
        NodeDef::new("c").with_parent("b"),
    ],
    ConstructionError::ConflictingParent { id: "c".into(), first: "b".into(), second: "a".into() }
)]
#[case::self_parent(
    vec![NodeDef::new("a").with_parent("a")],
    ConstructionError::SelfParent("a".into())
)]
fn given_malformed_definition_when_building_then_construction_error(
    #[case] defs: Vec<NodeDef>,
    #[case] expected: ConstructionError,
) {
    assert_eq!(CheckTree::build(defs).unwrap_err(), expected);
}

#[test]
fn given_two_node_cycle_when_building_then_cycle_detected() {
    let result = CheckTree::build(vec![
        NodeDef::new("root"),
        NodeDef::new("a").with_children(["b"]),
        NodeDef::new("b").with_children(["a"]),
    ]);

    assert!(matches!(
        result,
        Err(ConstructionError::CycleDetected(ref id)) if id == "a" || id == "b"
    ));
}
