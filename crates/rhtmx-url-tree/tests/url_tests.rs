//! Integration tests for the URL grammar
//!
//! Covers:
//! - Round trips through `parse` and `serialize`
//! - Matrix and query parameter decoding
//! - The `UrlSerializer` trait object seam
//! - Rejection of malformed input

use pretty_assertions::assert_eq;
use rstest::rstest;
use rhtmx_url_tree::url::{parse, serialize};
use rhtmx_url_tree::*;

#[rstest]
#[case("/")]
#[case("/a")]
#[case("/a;x=1;y=2")]
#[case("/a/(b//aux:c)")]
#[case("/a/(b/(c//aux:d)//aux2:e)")]
#[case("/a?x=1&x=2")]
#[case("/a#frag")]
#[case("/team/33/user/11")]
#[case("/inbox/33(popup:compose)")]
#[case("/(aux:a)")]
#[case("/a%20b;k=v%2Fw?q=hello%20world#top")]
fn test_round_trip(#[case] url: &str) {
    let tree = parse(url).unwrap();
    assert_eq!(serialize(&tree), url);
    assert_eq!(parse(&serialize(&tree)).unwrap(), tree);
}

#[test]
fn test_matrix_params_attach_to_segment() {
    let tree = parse("/a;x=1;y=2").unwrap();
    let segment = &tree.root.primary().unwrap().segments[0];

    assert_eq!(segment.path, "a");
    assert_eq!(segment.parameters, Params::from([
        ("x".to_string(), "1".to_string()),
        ("y".to_string(), "2".to_string()),
    ]));
    assert_eq!(segment.parameter_map().get("y"), Some("2"));
}

#[test]
fn test_repeated_query_keys_accumulate() {
    let tree = parse("/a?x=1&x=2&y=3").unwrap();
    let query = tree.query_param_map();

    assert_eq!(query.get_all("x"), vec!["1", "2"]);
    assert_eq!(query.get("x"), Some("1"));
    assert_eq!(query.get("y"), Some("3"));
    assert!(!query.has("z"));
}

#[test]
fn test_parsed_trees_hold_invariants() {
    let tree = parse("/a/(b//aux:c)").unwrap();
    assert!(tree.root.segments.is_empty());
    assert_eq!(tree.root.number_of_children(), 1);

    let a = tree.root.primary().unwrap();
    assert_eq!(a.number_of_children(), 2);
    assert_eq!(a.child("aux").unwrap().to_string(), "c");
}

#[test]
fn test_serializer_trait_object() {
    let serializer: Box<dyn UrlSerializer> = Box::new(DefaultUrlSerializer);
    let tree = serializer.parse("/a/(b//aux:c)?q=1").unwrap();
    assert_eq!(serializer.serialize(&tree), "/a/(b//aux:c)?q=1");
}

#[test]
fn test_from_str_and_display_agree() {
    let tree: UrlTree = "/a;k=v/b#f".parse().unwrap();
    assert_eq!(tree.to_string(), "/a;k=v/b#f");
}

#[rstest]
#[case("/a/(b")]
#[case("/;x=1")]
#[case("/a/(c//aux:(d)")]
fn test_malformed_urls_fail(#[case] url: &str) {
    assert!(parse(url).is_err());
}

#[test]
fn test_empty_path_with_params_error() {
    let err = parse("/;x=1").unwrap_err();
    assert!(matches!(err, UrlTreeError::EmptyPathWithMatrixParams { .. }));
}

#[test]
fn test_tree_new_rejects_root_segments() {
    let root = UrlSegmentGroup::leaf(vec!["a".into()]);
    let err = UrlTree::new(root, QueryParams::new(), None).unwrap_err();
    assert_eq!(err, UrlTreeError::RootHasSegments);
}

#[test]
fn test_deserialize_rejects_root_segments() {
    let err = serde_json::from_str::<UrlTree>(r#"{"root":{"segments":[{"path":"a"}]}}"#).unwrap_err();
    assert!(err.to_string().contains("cannot contain segments"), "{err}");
}

#[test]
fn test_serde_json_round_trip() {
    let tree = parse("/a;k=v/(b//aux:c)?x=1&x=2#f").unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(serde_json::from_str::<UrlTree>(&json).unwrap(), tree);
}
