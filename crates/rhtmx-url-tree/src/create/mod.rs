//! Applying navigation commands to an existing [`UrlTree`]
//!
//! [`create_url_tree`] runs the full pipeline:
//!
//! 1. [`compute_navigation`] folds raw commands into a [`Navigation`]
//! 2. [`find_starting_position`] resolves where patching starts
//! 3. the [`patch`] functions rebuild the subtree at that position
//! 4. [`assemble`] stitches the subtree back into the old root and
//!    re-normalizes the result
//!
//! The input tree is never modified. The result shares no nodes with it.

pub mod patch;
pub mod position;

use std::collections::BTreeMap;

use tracing::debug;

use crate::command::{compute_navigation, Command, Navigation};
use crate::error::Result;
use crate::normalize::{create_root, squash_segment_group};
use crate::tree::{OutletPath, QueryParams, UrlSegmentGroup, UrlTree};

use patch::{update_segment_group, update_segment_group_children};
use position::{find_starting_position, Position};

/// Builds a new tree by applying `commands` relative to the group at `relative_to`
///
/// The resulting tree always carries the supplied `query_params` and
/// `fragment`; the ones on `tree` are not inherited.
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::{create_url_tree, OutletPath, UrlTree};
///
/// let tree: UrlTree = "/team/33/user/11".parse().unwrap();
/// let anchor = OutletPath::primary(1);
///
/// let next = create_url_tree(&tree, &anchor, &["../22".into()], None, None).unwrap();
/// assert_eq!(next.to_string(), "/team/33/user/22");
///
/// let home = create_url_tree(&tree, &anchor, &["/".into()], None, None).unwrap();
/// assert_eq!(home.to_string(), "/");
/// ```
#[tracing::instrument(level = "debug", skip_all)]
pub fn create_url_tree(
    tree: &UrlTree,
    relative_to: &OutletPath,
    commands: &[Command],
    query_params: Option<QueryParams>,
    fragment: Option<String>,
) -> Result<UrlTree> {
    let query_params = query_params.unwrap_or_default();

    if commands.is_empty() {
        debug!("no commands, keeping the current root");
        return Ok(assemble(
            &tree.root,
            &OutletPath::root(),
            tree.root.clone(),
            query_params,
            fragment,
        ));
    }

    let navigation = compute_navigation(commands)?;
    if navigation.to_root() {
        debug!("navigating to the empty root");
        return Ok(assemble(
            &tree.root,
            &OutletPath::root(),
            UrlSegmentGroup::empty(),
            query_params,
            fragment,
        ));
    }

    let position = find_starting_position(&navigation, &tree.root, relative_to)?;
    debug!(
        group = %position.group,
        index = position.index,
        process_children = position.process_children,
        "resolved starting position"
    );

    let updated = patch_at(&navigation, &tree.root, &position);
    Ok(assemble(
        &tree.root,
        &position.group,
        updated,
        query_params,
        fragment,
    ))
}

fn patch_at(navigation: &Navigation, root: &UrlSegmentGroup, position: &Position) -> UrlSegmentGroup {
    let empty = UrlSegmentGroup::empty();
    let target = root.descendant(&position.group).unwrap_or(&empty);

    if position.process_children {
        update_segment_group_children(target, position.index, &navigation.commands)
    } else {
        update_segment_group(Some(target), position.index, &navigation.commands)
    }
}

/// Rebuilds `current` with the group at `target` swapped for `replacement`
///
/// Every node off the path to `target` is cloned as-is.
pub fn replace_segment(
    current: &UrlSegmentGroup,
    target: &[String],
    replacement: UrlSegmentGroup,
) -> UrlSegmentGroup {
    let Some((outlet, rest)) = target.split_first() else {
        return replacement;
    };

    let mut replacement = Some(replacement);
    let mut children = BTreeMap::new();
    for (name, child) in &current.children {
        let child = match (name == outlet).then(|| replacement.take()).flatten() {
            Some(replacement) => replace_segment(child, rest, replacement),
            None => child.clone(),
        };
        children.insert(name.clone(), child);
    }

    UrlSegmentGroup::new(current.segments.clone(), children)
}

/// Substitutes the patched anchor into the old root and normalizes the result
pub fn assemble(
    old_root: &UrlSegmentGroup,
    anchor: &OutletPath,
    new_subtree: UrlSegmentGroup,
    query_params: QueryParams,
    fragment: Option<String>,
) -> UrlTree {
    let candidate = if anchor.is_root() {
        new_subtree
    } else {
        replace_segment(old_root, anchor.outlets(), new_subtree)
    };

    UrlTree {
        root: create_root(squash_segment_group(&candidate)),
        query_params,
        fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{QueryValue, UrlSegment};
    use pretty_assertions::assert_eq;

    fn tree(url: &str) -> UrlTree {
        url.parse().unwrap()
    }

    #[test]
    fn test_replace_segment_swaps_only_target() {
        let root = tree("/a/(b//aux:c)").root;
        let path = OutletPath::primary(2);
        let replaced = replace_segment(&root, path.outlets(), UrlSegmentGroup::leaf(vec!["x".into()]));

        let primary = replaced.primary().unwrap();
        assert_eq!(primary.child("primary").unwrap().segments, vec![UrlSegment::from("x")]);
        assert_eq!(primary.child("aux"), root.primary().unwrap().child("aux"));
    }

    #[test]
    fn test_replace_segment_at_root() {
        let root = tree("/a").root;
        let replaced = replace_segment(&root, &[], UrlSegmentGroup::empty());
        assert_eq!(replaced, UrlSegmentGroup::empty());
    }

    #[test]
    fn test_assemble_restores_invariants() {
        let candidate = UrlSegmentGroup::with_primary(
            Vec::new(),
            UrlSegmentGroup::with_primary(vec!["a".into()], UrlSegmentGroup::empty()),
        );
        let assembled = assemble(&UrlSegmentGroup::empty(), &OutletPath::root(), candidate, QueryParams::new(), None);

        assert!(assembled.root.segments.is_empty());
        assert_eq!(assembled.to_string(), "/a");
    }

    #[test]
    fn test_no_commands_replaces_query_and_fragment() {
        let current = tree("/a?x=1#top");
        let query = QueryParams::from([("y".to_string(), QueryValue::from("2"))]);
        let next = create_url_tree(&current, &OutletPath::root(), &[], Some(query), None).unwrap();
        assert_eq!(next.to_string(), "/a?y=2");
    }

    #[test]
    fn test_relative_append() {
        let current = tree("/a/b");
        let next = create_url_tree(&current, &OutletPath::primary(1), &["c".into()], None, None).unwrap();
        assert_eq!(next.to_string(), "/a/b/c");
    }

    #[test]
    fn test_input_tree_unchanged() {
        let current = tree("/a/(b//aux:c)");
        let before = current.clone();
        let _ = create_url_tree(&current, &OutletPath::root(), &["/x".into()], None, None).unwrap();
        assert_eq!(current, before);
    }
}
