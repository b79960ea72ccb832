// File: src/contains.rs
// Purpose: Tree containment checks with per-part match strategies

use serde::{Deserialize, Serialize};

use crate::error::{Result, UrlTreeError};
use crate::tree::params::{contains_query_params, equal_query_params};
use crate::tree::{Params, UrlSegment, UrlSegmentGroup, UrlTree, PRIMARY_OUTLET};

/// How one part of a tree is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Both sides must be equal
    Exact,
    /// The container may carry more than the containee
    Subset,
    /// Not compared at all
    Ignored,
}

/// Containment options, loadable from TOML
///
/// ```toml
/// paths = "subset"
/// queryParams = "ignored"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    #[serde(default = "default_exact")]
    pub paths: MatchStrategy,

    #[serde(default = "default_exact")]
    pub query_params: MatchStrategy,

    #[serde(default = "default_ignored")]
    pub matrix_params: MatchStrategy,

    #[serde(default = "default_ignored")]
    pub fragment: MatchStrategy,
}

fn default_exact() -> MatchStrategy {
    MatchStrategy::Exact
}

fn default_ignored() -> MatchStrategy {
    MatchStrategy::Ignored
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::exact()
    }
}

impl MatchOptions {
    /// Same paths and query; matrix parameters and fragment ignored
    pub fn exact() -> Self {
        Self {
            paths: MatchStrategy::Exact,
            query_params: MatchStrategy::Exact,
            matrix_params: MatchStrategy::Ignored,
            fragment: MatchStrategy::Ignored,
        }
    }

    /// Containee paths and query are a subset of the container's
    pub fn subset() -> Self {
        Self {
            paths: MatchStrategy::Subset,
            query_params: MatchStrategy::Subset,
            matrix_params: MatchStrategy::Ignored,
            fragment: MatchStrategy::Ignored,
        }
    }

    /// Parse options from a TOML document; missing keys take the `exact` defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| UrlTreeError::InvalidConfig(err.to_string()))
    }
}

/// Whether `containee` is contained in `container` under `options`
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::{contains_tree, MatchOptions, UrlTree};
///
/// let container: UrlTree = "/a/b?x=1&y=2".parse().unwrap();
/// let containee: UrlTree = "/a?x=1".parse().unwrap();
///
/// assert!(contains_tree(&container, &containee, &MatchOptions::subset()));
/// assert!(!contains_tree(&container, &containee, &MatchOptions::exact()));
/// ```
pub fn contains_tree(container: &UrlTree, containee: &UrlTree, options: &MatchOptions) -> bool {
    let query_matches = match options.query_params {
        MatchStrategy::Exact => equal_query_params(&container.query_params, &containee.query_params),
        MatchStrategy::Subset => contains_query_params(&container.query_params, &containee.query_params),
        MatchStrategy::Ignored => true,
    };

    let paths_match = match options.paths {
        MatchStrategy::Exact => equal_segment_groups(&container.root, &containee.root, options.matrix_params),
        MatchStrategy::Subset => contains_segment_group(&container.root, &containee.root, options.matrix_params),
        MatchStrategy::Ignored => true,
    };

    let fragment_matches =
        options.fragment != MatchStrategy::Exact || container.fragment == containee.fragment;

    query_matches && paths_match && fragment_matches
}

fn equal_segment_groups(
    container: &UrlSegmentGroup,
    containee: &UrlSegmentGroup,
    matrix_params: MatchStrategy,
) -> bool {
    equal_path(&container.segments, &containee.segments)
        && matrix_params_match(&container.segments, &containee.segments, matrix_params)
        && container.number_of_children() == containee.number_of_children()
        && containee.children.iter().all(|(outlet, child)| {
            container
                .child(outlet)
                .is_some_and(|other| equal_segment_groups(other, child, matrix_params))
        })
}

fn contains_segment_group(
    container: &UrlSegmentGroup,
    containee: &UrlSegmentGroup,
    matrix_params: MatchStrategy,
) -> bool {
    contains_segment_group_helper(container, containee, &containee.segments, matrix_params)
}

/// Walks `containee_paths` down the container, crossing into primary children
/// while the container's own segments run out first
fn contains_segment_group_helper(
    container: &UrlSegmentGroup,
    containee: &UrlSegmentGroup,
    containee_paths: &[UrlSegment],
    matrix_params: MatchStrategy,
) -> bool {
    let own = container.segments.len();

    if own > containee_paths.len() {
        let current = &container.segments[..containee_paths.len()];
        equal_path(current, containee_paths)
            && !containee.has_children()
            && matrix_params_match(current, containee_paths, matrix_params)
    } else if own == containee_paths.len() {
        equal_path(&container.segments, containee_paths)
            && matrix_params_match(&container.segments, containee_paths, matrix_params)
            && containee.children.iter().all(|(outlet, child)| {
                container
                    .child(outlet)
                    .is_some_and(|other| contains_segment_group(other, child, matrix_params))
            })
    } else {
        let (current, next) = containee_paths.split_at(own);
        equal_path(&container.segments, current)
            && matrix_params_match(&container.segments, current, matrix_params)
            && container.child(PRIMARY_OUTLET).is_some_and(|primary| {
                contains_segment_group_helper(primary, containee, next, matrix_params)
            })
    }
}

fn equal_path(a: &[UrlSegment], b: &[UrlSegment]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.path == y.path)
}

fn matrix_params_match(
    container: &[UrlSegment],
    containee: &[UrlSegment],
    strategy: MatchStrategy,
) -> bool {
    containee.iter().zip(container).all(|(inner, outer)| {
        params_match(&outer.parameters, &inner.parameters, strategy)
    })
}

fn params_match(container: &Params, containee: &Params, strategy: MatchStrategy) -> bool {
    match strategy {
        MatchStrategy::Exact => container == containee,
        MatchStrategy::Subset => containee
            .iter()
            .all(|(key, value)| container.get(key) == Some(value)),
        MatchStrategy::Ignored => true,
    }
}
