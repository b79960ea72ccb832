/// Structural normalization of segment groups
///
/// Both functions are **pure**: they take a group and return a new one.
///
/// - [`create_root`] keeps the root free of its own segments
/// - [`squash_segment_group`] merges trivial primary-only nesting and prunes
///   children that hold neither segments nor children
use std::collections::BTreeMap;

use crate::tree::{UrlSegmentGroup, PRIMARY_OUTLET};

/// Wraps a candidate that carries segments as the primary child of an empty root
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::normalize::create_root;
/// use rhtmx_url_tree::{UrlSegmentGroup, PRIMARY_OUTLET};
///
/// let candidate = UrlSegmentGroup::leaf(vec!["a".into()]);
/// let root = create_root(candidate.clone());
/// assert!(root.segments.is_empty());
/// assert_eq!(root.child(PRIMARY_OUTLET), Some(&candidate));
/// ```
pub fn create_root(candidate: UrlSegmentGroup) -> UrlSegmentGroup {
    if candidate.segments.is_empty() {
        candidate
    } else {
        UrlSegmentGroup::with_primary(Vec::new(), candidate)
    }
}

/// Post-order squash of a group and all its descendants
///
/// For each child, after squashing it:
/// - an empty-path primary child with children hands those children to this group
/// - a child with neither segments nor children is dropped
///
/// Finally a group left with only a primary child absorbs that child.
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::normalize::squash_segment_group;
/// use rhtmx_url_tree::UrlSegmentGroup;
///
/// let inner = UrlSegmentGroup::leaf(vec!["b".into()]);
/// let group = UrlSegmentGroup::with_primary(vec!["a".into()], inner);
///
/// let squashed = squash_segment_group(&group);
/// assert_eq!(squashed.to_string(), "a/b");
/// assert!(!squashed.has_children());
/// ```
pub fn squash_segment_group(group: &UrlSegmentGroup) -> UrlSegmentGroup {
    let mut children = BTreeMap::new();
    let mut lifted = BTreeMap::new();

    for (outlet, child) in &group.children {
        let candidate = squash_segment_group(child);

        if outlet == PRIMARY_OUTLET && candidate.segments.is_empty() && candidate.has_children() {
            // lift the empty primary child's outlets one level up
            lifted = candidate.children;
        } else if !candidate.segments.is_empty() || candidate.has_children() {
            children.insert(outlet.clone(), candidate);
        }
    }

    // existing siblings win over lifted outlets of the same name
    for (outlet, child) in lifted {
        children.entry(outlet).or_insert(child);
    }

    merge_trivial_children(UrlSegmentGroup::new(group.segments.clone(), children))
}

fn merge_trivial_children(mut group: UrlSegmentGroup) -> UrlSegmentGroup {
    if group.number_of_children() != 1 {
        return group;
    }
    match group.children.remove(PRIMARY_OUTLET) {
        Some(child) => {
            group.segments.extend(child.segments);
            UrlSegmentGroup::new(group.segments, child.children)
        }
        None => group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::UrlSegment;
    use crate::url::parse;

    fn leaf(paths: &[&str]) -> UrlSegmentGroup {
        UrlSegmentGroup::leaf(paths.iter().map(|p| UrlSegment::from(*p)).collect())
    }

    #[test]
    fn test_create_root_leaves_empty_group() {
        let group = UrlSegmentGroup::with_primary(Vec::new(), leaf(&["a"]));
        assert_eq!(create_root(group.clone()), group);
    }

    #[test]
    fn test_squash_drops_empty_children() {
        let group = UrlSegmentGroup::new(
            vec!["a".into()],
            BTreeMap::from([
                ("aux".to_string(), UrlSegmentGroup::empty()),
                ("right".to_string(), leaf(&["r"])),
                ("primary".to_string(), leaf(&["p"])),
            ]),
        );
        let squashed = squash_segment_group(&group);
        assert_eq!(squashed.number_of_children(), 2);
        assert!(squashed.child("aux").is_none());
    }

    #[test]
    fn test_squash_lifts_empty_primary_outlets() {
        let empty_primary = UrlSegmentGroup::new(
            Vec::new(),
            BTreeMap::from([
                ("primary".to_string(), leaf(&["b"])),
                ("aux".to_string(), leaf(&["c"])),
            ]),
        );
        let group = UrlSegmentGroup::with_primary(vec!["a".into()], empty_primary);

        let squashed = squash_segment_group(&group);
        assert_eq!(squashed.segments, vec![UrlSegment::from("a")]);
        assert_eq!(squashed.child("primary"), Some(&leaf(&["b"])));
        assert_eq!(squashed.child("aux"), Some(&leaf(&["c"])));
    }

    #[test]
    fn test_squash_sibling_wins_over_lifted_outlet() {
        let empty_primary = UrlSegmentGroup::new(
            Vec::new(),
            BTreeMap::from([
                ("primary".to_string(), leaf(&["a"])),
                ("aux".to_string(), leaf(&["x"])),
            ]),
        );
        let group = UrlSegmentGroup::new(
            Vec::new(),
            BTreeMap::from([
                ("primary".to_string(), empty_primary),
                ("aux".to_string(), leaf(&["y"])),
            ]),
        );

        let squashed = squash_segment_group(&group);
        assert_eq!(squashed.child("aux"), Some(&leaf(&["y"])));
        assert_eq!(squashed.child("primary"), Some(&leaf(&["a"])));
    }

    #[test]
    fn test_squash_merges_chain_of_primaries() {
        let group = UrlSegmentGroup::with_primary(
            Vec::new(),
            UrlSegmentGroup::with_primary(vec!["a".into()], UrlSegmentGroup::with_primary(vec!["b".into()], leaf(&["c"]))),
        );
        let squashed = squash_segment_group(&group);
        assert_eq!(squashed, leaf(&["a", "b", "c"]));
    }

    #[test]
    fn test_squash_is_idempotent() {
        for url in ["/a/(b//aux:c)", "/a/(b/(c//aux:d)//aux2:e)", "/(aux:x)", "/a/b/c"] {
            let tree = parse(url).unwrap();
            let once = squash_segment_group(&tree.root);
            assert_eq!(squash_segment_group(&once), once, "{url}");
        }
    }
}
