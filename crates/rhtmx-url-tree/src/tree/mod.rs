/// Tree data model for parsed URLs
///
/// A `UrlTree` owns a root `UrlSegmentGroup`; each group owns its segments and
/// its named child outlets. Ownership only flows downward. Upward traversal
/// goes through an [`OutletPath`] instead of parent pointers.
///
/// All types are values: updates build new trees and never mutate old ones.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UrlTreeError};
use crate::url;

pub mod outlet_path;
pub mod params;

pub use outlet_path::{OutletPath, OutletPathHierarchy};
pub use params::{ParamMap, Params, QueryParams, QueryValue};

/// Name of the default, unnamed outlet
pub const PRIMARY_OUTLET: &str = "primary";

// ============================================================================
// UrlSegment
// ============================================================================

/// One path component between slashes, with its matrix parameters
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::UrlSegment;
///
/// let segment = UrlSegment::new("team", [("id", "33")]);
/// assert_eq!(segment.to_string(), "team;id=33");
/// assert_eq!(segment.parameter_map().get("id"), Some("33"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSegment {
    /// Decoded path text
    pub path: String,
    /// Matrix parameters of this segment
    #[serde(default)]
    pub parameters: Params,
}

impl UrlSegment {
    /// Segment from a path and any `(key, value)` pairs
    pub fn new<I, K, V>(path: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: path.into(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Segment from a path and an already built parameter map
    pub fn with_params(path: impl Into<String>, parameters: Params) -> Self {
        Self {
            path: path.into(),
            parameters,
        }
    }

    pub fn parameter_map(&self) -> ParamMap {
        ParamMap::from(&self.parameters)
    }
}

impl From<&str> for UrlSegment {
    fn from(path: &str) -> Self {
        Self::with_params(path, Params::new())
    }
}

impl From<String> for UrlSegment {
    fn from(path: String) -> Self {
        Self::with_params(path, Params::new())
    }
}

impl fmt::Display for UrlSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&url::serialize_path(self))
    }
}

// ============================================================================
// UrlSegmentGroup
// ============================================================================

/// A node of the tree: consecutive segments of one outlet plus named children
///
/// Children are built before their parent, so construction never reaches back
/// into an already built child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSegmentGroup {
    #[serde(default)]
    pub segments: Vec<UrlSegment>,
    #[serde(default)]
    pub children: BTreeMap<String, UrlSegmentGroup>,
}

impl UrlSegmentGroup {
    /// Group from its segments and already built children
    pub fn new(segments: Vec<UrlSegment>, children: BTreeMap<String, UrlSegmentGroup>) -> Self {
        Self { segments, children }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Group with segments only
    pub fn leaf(segments: Vec<UrlSegment>) -> Self {
        Self::new(segments, BTreeMap::new())
    }

    /// Group whose only child is `child`, under the primary outlet
    pub fn with_primary(segments: Vec<UrlSegment>, child: UrlSegmentGroup) -> Self {
        Self::new(segments, BTreeMap::from([(PRIMARY_OUTLET.to_string(), child)]))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn number_of_children(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, outlet: &str) -> Option<&UrlSegmentGroup> {
        self.children.get(outlet)
    }

    pub fn primary(&self) -> Option<&UrlSegmentGroup> {
        self.child(PRIMARY_OUTLET)
    }

    /// Group reached by following `path` from this group
    pub fn descendant(&self, path: &OutletPath) -> Option<&UrlSegmentGroup> {
        path.outlets()
            .iter()
            .try_fold(self, |group, outlet| group.child(outlet))
    }

    /// Children with the primary outlet first, then named outlets by name
    pub fn children_primary_first(&self) -> impl Iterator<Item = (&str, &UrlSegmentGroup)> {
        let primary = self.primary().map(|group| (PRIMARY_OUTLET, group));
        let named = self
            .children
            .iter()
            .filter(|(outlet, _)| outlet.as_str() != PRIMARY_OUTLET)
            .map(|(outlet, group)| (outlet.as_str(), group));
        primary.into_iter().chain(named)
    }
}

impl fmt::Display for UrlSegmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&url::serialize_paths(self))
    }
}

// ============================================================================
// UrlTree
// ============================================================================

/// A parsed or constructed URL
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::{UrlTree, PRIMARY_OUTLET};
///
/// let tree: UrlTree = "/team/33/(user/11//right:chat)?a=1#top".parse().unwrap();
/// let team = tree.root.child(PRIMARY_OUTLET).unwrap();
///
/// assert_eq!(team.to_string(), "team/33");
/// assert_eq!(team.number_of_children(), 2);
/// assert_eq!(tree.fragment.as_deref(), Some("top"));
/// assert_eq!(tree.to_string(), "/team/33/(user/11//right:chat)?a=1#top");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUrlTree")]
pub struct UrlTree {
    /// Root group; never holds segments itself
    pub root: UrlSegmentGroup,
    pub query_params: QueryParams,
    pub fragment: Option<String>,
}

impl UrlTree {
    /// Builds a tree, rejecting a root that carries its own segments
    pub fn new(
        root: UrlSegmentGroup,
        query_params: QueryParams,
        fragment: Option<String>,
    ) -> Result<Self> {
        if !root.segments.is_empty() {
            return Err(UrlTreeError::RootHasSegments);
        }
        Ok(Self {
            root,
            query_params,
            fragment,
        })
    }

    pub fn query_param_map(&self) -> ParamMap {
        ParamMap::from(&self.query_params)
    }
}

/// Unvalidated shape of a deserialized tree
#[derive(Deserialize)]
struct RawUrlTree {
    root: UrlSegmentGroup,
    #[serde(default)]
    query_params: QueryParams,
    #[serde(default)]
    fragment: Option<String>,
}

impl TryFrom<RawUrlTree> for UrlTree {
    type Error = UrlTreeError;

    fn try_from(raw: RawUrlTree) -> Result<Self> {
        UrlTree::new(raw.root, raw.query_params, raw.fragment)
    }
}

impl fmt::Display for UrlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&url::serialize(self))
    }
}

impl FromStr for UrlTree {
    type Err = UrlTreeError;

    fn from_str(s: &str) -> Result<Self> {
        url::parse(s)
    }
}
