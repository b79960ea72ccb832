/// Prefix-matching patcher for segment groups
///
/// Commands are matched against existing segments for as long as they agree.
/// What happens next depends on where the match stopped:
///
/// | Match result                                  | Outcome                                 |
/// |-----------------------------------------------|-----------------------------------------|
/// | stopped inside the group (outlets command)    | split the group, patch the children     |
/// | consumed the group, no commands left          | keep segments, drop children            |
/// | consumed the group, commands left, no children| append new segments                     |
/// | consumed the group, commands left, children   | patch the children                      |
/// | no match                                      | replace everything from the start index |
use std::borrow::Cow;
use std::collections::BTreeMap;

use tracing::trace;

use crate::command::{Command, OutletTarget};
use crate::tree::{Params, UrlSegment, UrlSegmentGroup, PRIMARY_OUTLET};

/// Outcome of walking commands over existing segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    pub matched: bool,
    /// First segment index not consumed
    pub path_index: usize,
    /// First command index not consumed
    pub command_index: usize,
}

impl PrefixMatch {
    const NONE: PrefixMatch = PrefixMatch {
        matched: false,
        path_index: 0,
        command_index: 0,
    };
}

/// Patches `group` (or an empty group when absent) starting at `start_index`
pub fn update_segment_group(
    group: Option<&UrlSegmentGroup>,
    start_index: usize,
    commands: &[Command],
) -> UrlSegmentGroup {
    let empty = UrlSegmentGroup::empty();
    let group = group.unwrap_or(&empty);

    if group.segments.is_empty() && group.has_children() {
        return update_segment_group_children(group, start_index, commands);
    }

    let m = prefixed_with(group, start_index, commands);
    let remaining = &commands[m.command_index..];

    if m.matched && m.path_index < group.segments.len() {
        trace!(at = m.path_index, "splitting segment group");
        let tail = UrlSegmentGroup::new(
            group.segments[m.path_index..].to_vec(),
            group.children.clone(),
        );
        let split = UrlSegmentGroup::with_primary(group.segments[..m.path_index].to_vec(), tail);
        update_segment_group_children(&split, 0, remaining)
    } else if m.matched && remaining.is_empty() {
        trace!("navigation ends at segment group, dropping children");
        UrlSegmentGroup::leaf(group.segments.clone())
    } else if m.matched && !group.has_children() {
        create_new_segment_group(group, start_index, commands)
    } else if m.matched {
        trace!(consumed = m.command_index, "descending into children");
        update_segment_group_children(group, 0, remaining)
    } else {
        create_new_segment_group(group, start_index, commands)
    }
}

/// Patches the children of `group`, keeping its own segments
pub fn update_segment_group_children(
    group: &UrlSegmentGroup,
    start_index: usize,
    commands: &[Command],
) -> UrlSegmentGroup {
    if commands.is_empty() {
        return UrlSegmentGroup::leaf(group.segments.clone());
    }

    let outlets = outlets_of(commands);

    // Secondary outlets next to an empty-path primary child belong to that
    // child, which the url tree has already squashed away.
    if outlets.keys().any(|outlet| outlet != PRIMARY_OUTLET) && group.number_of_children() == 1 {
        if let Some(empty_primary) = group.primary().filter(|child| child.segments.is_empty()) {
            trace!("applying outlets to empty-path primary child");
            let lifted = update_segment_group_children(empty_primary, start_index, commands);
            return UrlSegmentGroup::new(group.segments.clone(), lifted.children);
        }
    }

    let mut children = BTreeMap::new();
    for (outlet, target) in outlets.iter() {
        if let Some(commands) = target_commands(target) {
            let child = update_segment_group(group.child(outlet), start_index, &commands);
            children.insert(outlet.clone(), child);
        }
    }

    for (outlet, child) in &group.children {
        if !outlets.contains_key(outlet) {
            children.insert(outlet.clone(), child.clone());
        }
    }

    UrlSegmentGroup::new(group.segments.clone(), children)
}

/// Walks commands over the segments of `group` from `start_index`
///
/// A path token directly followed by matrix parameters must match both the
/// path and the parameters; a lone path token must match a segment without
/// parameters. An `outlets` command stops the walk.
pub fn prefixed_with(group: &UrlSegmentGroup, start_index: usize, commands: &[Command]) -> PrefixMatch {
    let mut command_index = 0;
    let mut path_index = start_index;

    while path_index < group.segments.len() {
        let Some(command) = commands.get(command_index) else {
            return PrefixMatch::NONE;
        };
        if command.is_outlets() {
            break;
        }
        let Some(path) = command.as_path() else {
            return PrefixMatch::NONE;
        };

        let segment = &group.segments[path_index];
        match commands.get(command_index + 1) {
            Some(Command::MatrixParams(params)) if !path.is_empty() => {
                if !compare(path, params, segment) {
                    return PrefixMatch::NONE;
                }
                command_index += 2;
            }
            _ => {
                if !compare(path, &Params::new(), segment) {
                    return PrefixMatch::NONE;
                }
                command_index += 1;
            }
        }
        path_index += 1;
    }

    PrefixMatch {
        matched: true,
        path_index,
        command_index,
    }
}

/// Keeps the first `start_index` segments and builds the rest from `commands`
pub fn create_new_segment_group(
    group: &UrlSegmentGroup,
    start_index: usize,
    commands: &[Command],
) -> UrlSegmentGroup {
    trace!(start_index, commands = commands.len(), "creating new segments");

    let keep = start_index.min(group.segments.len());
    let mut paths: Vec<UrlSegment> = group.segments[..keep].to_vec();

    let mut i = 0;
    while i < commands.len() {
        match &commands[i] {
            Command::Outlets(outlets) => {
                return UrlSegmentGroup::new(paths, create_new_segment_children(outlets));
            }
            // leading matrix parameters re-target the segment at the start index
            Command::MatrixParams(params) if i == 0 => {
                let path = group
                    .segments
                    .get(start_index)
                    .map(|segment| segment.path.clone())
                    .unwrap_or_default();
                paths.push(UrlSegment::with_params(path, params.clone()));
                i += 1;
            }
            Command::MatrixParams(params) => {
                if let Some(last) = paths.last_mut() {
                    last.parameters = params.clone();
                }
                i += 1;
            }
            Command::Path(path) | Command::SegmentPath(path) => match commands.get(i + 1) {
                Some(Command::MatrixParams(params)) if !path.is_empty() => {
                    paths.push(UrlSegment::with_params(path.clone(), params.clone()));
                    i += 2;
                }
                _ => {
                    paths.push(UrlSegment::from(path.clone()));
                    i += 1;
                }
            },
        }
    }

    UrlSegmentGroup::leaf(paths)
}

/// Builds fresh child groups for every outlet that is not cleared
pub fn create_new_segment_children(
    outlets: &BTreeMap<String, OutletTarget>,
) -> BTreeMap<String, UrlSegmentGroup> {
    outlets
        .iter()
        .filter_map(|(outlet, target)| {
            let commands = target_commands(target)?;
            let group = create_new_segment_group(&UrlSegmentGroup::empty(), 0, &commands);
            Some((outlet.clone(), group))
        })
        .collect()
}

/// The explicit outlets of a leading `outlets` command, else everything to primary
fn outlets_of(commands: &[Command]) -> Cow<'_, BTreeMap<String, OutletTarget>> {
    match commands.first() {
        Some(Command::Outlets(outlets)) => Cow::Borrowed(outlets),
        _ => Cow::Owned(BTreeMap::from([(
            PRIMARY_OUTLET.to_string(),
            OutletTarget::Commands(commands.to_vec()),
        )])),
    }
}

fn target_commands(target: &OutletTarget) -> Option<Cow<'_, [Command]>> {
    match target {
        OutletTarget::Clear => None,
        OutletTarget::Path(path) => Some(Cow::Owned(vec![Command::Path(path.clone())])),
        OutletTarget::Commands(commands) => Some(Cow::Borrowed(commands)),
    }
}

fn compare(path: &str, params: &Params, segment: &UrlSegment) -> bool {
    path == segment.path && *params == segment.parameters
}
