/// Where in the existing tree a navigation starts patching
///
/// Relative navigations start after the anchor group's last segment (or at it,
/// when the first command only carries matrix parameters) and climb one
/// segment per `..`, crossing into parent groups as needed.
use tracing::trace;

use crate::command::Navigation;
use crate::error::{Result, UrlTreeError};
use crate::tree::{OutletPath, UrlSegmentGroup};

/// Resolved starting point for the patcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Group the patch applies to
    pub group: OutletPath,
    /// Patch the group's children rather than the group itself
    pub process_children: bool,
    /// Segment index inside the group where patching begins
    pub index: usize,
}

impl Position {
    fn new(group: OutletPath, process_children: bool, index: usize) -> Self {
        Self {
            group,
            process_children,
            index,
        }
    }
}

/// Computes the patch position for `navigation` anchored at `relative_to`
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::command::compute_navigation;
/// use rhtmx_url_tree::create::position::find_starting_position;
/// use rhtmx_url_tree::{OutletPath, UrlTree};
///
/// let tree: UrlTree = "/team/33/user/11".parse().unwrap();
/// let nav = compute_navigation(&["../22".into()]).unwrap();
///
/// let position = find_starting_position(&nav, &tree.root, &OutletPath::primary(1)).unwrap();
/// assert_eq!(position.group, OutletPath::primary(1));
/// assert_eq!(position.index, 3);
/// assert!(!position.process_children);
/// ```
pub fn find_starting_position(
    navigation: &Navigation,
    root: &UrlSegmentGroup,
    relative_to: &OutletPath,
) -> Result<Position> {
    if navigation.is_absolute {
        return Ok(Position::new(OutletPath::root(), true, 0));
    }

    let target = root
        .descendant(relative_to)
        .ok_or_else(|| UrlTreeError::UnknownAnchor {
            path: relative_to.to_string(),
        })?;

    if relative_to.is_root() {
        return Ok(Position::new(relative_to.clone(), true, 0));
    }

    let modifier = if navigation
        .commands
        .first()
        .is_some_and(|command| command.is_matrix_params())
    {
        0
    } else {
        1
    };
    let index = target.segments.len() as isize - 1 + modifier;

    apply_double_dots(root, relative_to, index, navigation.double_dots as isize)
}

/// Climbs `double_dots` segments up from `index` inside the group at `path`
fn apply_double_dots(
    root: &UrlSegmentGroup,
    path: &OutletPath,
    index: isize,
    double_dots: isize,
) -> Result<Position> {
    let mut ancestors = path.ancestors();
    let mut current = ancestors.next().unwrap_or_default();
    let mut index = index;
    let mut double_dots = double_dots;

    while double_dots > index {
        double_dots -= index;
        current = ancestors.next().ok_or(UrlTreeError::InvalidDoubleDots)?;
        index = root
            .descendant(&OutletPath::new(current.iter().cloned()))
            .map_or(0, |group| group.segments.len() as isize);
        trace!(depth = current.len(), index, double_dots, "climbed to parent group");
    }

    Ok(Position::new(
        OutletPath::new(current.iter().cloned()),
        false,
        (index - double_dots) as usize,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::compute_navigation;
    use crate::tree::UrlSegment;
    use crate::Command;

    /// `/team/33` → `user/11`, as two separate groups
    fn nested_root() -> UrlSegmentGroup {
        let user = UrlSegmentGroup::leaf(vec!["user".into(), "11".into()]);
        let team = UrlSegmentGroup::with_primary(vec!["team".into(), "33".into()], user);
        UrlSegmentGroup::with_primary(Vec::new(), team)
    }

    fn position(commands: &[Command], anchor: &OutletPath) -> Result<Position> {
        let nav = compute_navigation(commands)?;
        find_starting_position(&nav, &nested_root(), anchor)
    }

    #[test]
    fn test_absolute_starts_at_root_children() {
        let pos = position(&["/a".into()], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::root(), true, 0));
    }

    #[test]
    fn test_root_anchor_processes_children() {
        let pos = position(&["a".into()], &OutletPath::root()).unwrap();
        assert_eq!(pos, Position::new(OutletPath::root(), true, 0));
    }

    #[test]
    fn test_relative_appends_after_last_segment() {
        let pos = position(&["details".into()], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(2), false, 2));
    }

    #[test]
    fn test_matrix_params_retarget_last_segment() {
        let pos = position(&[Command::matrix([("a", "1")])], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(2), false, 1));
    }

    #[test]
    fn test_double_dots_within_group() {
        let pos = position(&["../22".into()], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(2), false, 1));
    }

    #[test]
    fn test_double_dots_cross_into_parent() {
        let pos = position(&["../../../x".into()], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(1), false, 1));
    }

    #[test]
    fn test_double_dots_consume_parent_segments() {
        let pos = position(&["../../../../x".into()], &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(1), false, 0));
    }

    #[test]
    fn test_too_many_double_dots_fail() {
        // the root holds no segments, so climbing past `team/33` has nowhere to go
        let err = position(&["../../../../../x".into()], &OutletPath::primary(2)).unwrap_err();
        assert_eq!(err, UrlTreeError::InvalidDoubleDots);
    }

    #[test]
    fn test_unknown_anchor_fails() {
        let err = position(&["x".into()], &OutletPath::new(["aux"])).unwrap_err();
        assert!(matches!(err, UrlTreeError::UnknownAnchor { .. }));
    }

    #[test]
    fn test_empty_group_anchor_with_matrix_params() {
        let empty = UrlSegmentGroup::empty();
        let team = UrlSegmentGroup::with_primary(vec![UrlSegment::from("team")], empty);
        let root = UrlSegmentGroup::with_primary(Vec::new(), team);
        let nav = compute_navigation(&[Command::matrix([("a", "1")])]).unwrap();

        let pos = find_starting_position(&nav, &root, &OutletPath::primary(2)).unwrap();
        assert_eq!(pos, Position::new(OutletPath::primary(1), false, 0));
    }
}
