//! Integration tests for `contains_tree`

use rstest::rstest;
use rhtmx_url_tree::*;

fn tree(url: &str) -> UrlTree {
    url.parse().unwrap()
}

fn paths_only(paths: MatchStrategy) -> MatchOptions {
    MatchOptions {
        paths,
        query_params: MatchStrategy::Ignored,
        matrix_params: MatchStrategy::Ignored,
        fragment: MatchStrategy::Ignored,
    }
}

#[test]
fn test_prefix_contained_only_as_subset() {
    let container = tree("/a/b");
    let containee = tree("/a");

    assert!(contains_tree(&container, &containee, &paths_only(MatchStrategy::Subset)));
    assert!(!contains_tree(&container, &containee, &paths_only(MatchStrategy::Exact)));
}

#[rstest]
#[case("/a/b/c", "/a/b", true)]
#[case("/a/b", "/a/b", true)]
#[case("/a/b", "/a/c", false)]
#[case("/a/(b//aux:c)", "/a/(b//aux:c)", true)]
#[case("/a/(b//aux:c)", "/a/(aux:c)", true)]
#[case("/a/b", "/a/(b//aux:c)", false)]
#[case("/a(aux:b)", "/(aux:b)", true)]
#[case("/", "/a", false)]
#[case("/a", "/", true)]
fn test_subset_paths(#[case] container: &str, #[case] containee: &str, #[case] expected: bool) {
    let options = paths_only(MatchStrategy::Subset);
    assert_eq!(contains_tree(&tree(container), &tree(containee), &options), expected);
}

#[test]
fn test_query_subset_with_repeats() {
    let container = tree("/a?tag=x&tag=y&page=1");
    let options = MatchOptions::subset();

    assert!(contains_tree(&container, &tree("/a?tag=y&tag=x"), &options));
    assert!(!contains_tree(&container, &tree("/a?tag=x"), &options));
    assert!(contains_tree(&container, &tree("/a?page=1"), &options));
}

#[test]
fn test_options_loaded_from_toml() {
    let options = MatchOptions::from_toml_str(
        r#"
        paths = "subset"
        queryParams = "ignored"
        matrixParams = "subset"
        fragment = "exact"
        "#,
    )
    .unwrap();

    assert!(contains_tree(&tree("/a;x=1;y=2/b?q=1#f"), &tree("/a;x=1#f"), &options));
    assert!(!contains_tree(&tree("/a;x=1;y=2/b#f"), &tree("/a;x=2#f"), &options));
    assert!(!contains_tree(&tree("/a/b#f"), &tree("/a#g"), &options));
}
