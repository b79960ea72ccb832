/// Addressing groups inside a tree without parent pointers
///
/// A group is identified by the outlet names walked from the root to reach it.
/// Moving to a parent drops the last name; the root is the empty path.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::PRIMARY_OUTLET;

/// Location of a segment group, as outlet names from the root
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::OutletPath;
///
/// let path = OutletPath::root().child("primary").child("aux");
/// assert_eq!(path.to_string(), "/primary/aux");
/// assert_eq!(path.parent(), Some(OutletPath::root().child("primary")));
/// assert!(OutletPath::root().parent().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutletPath(Vec<String>);

impl OutletPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(outlets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(outlets.into_iter().map(Into::into).collect())
    }

    /// Path following `depth` primary outlets from the root
    pub fn primary(depth: usize) -> Self {
        Self(vec![PRIMARY_OUTLET.to_string(); depth])
    }

    pub fn child(&self, outlet: impl Into<String>) -> Self {
        let mut outlets = self.0.clone();
        outlets.push(outlet.into());
        Self(outlets)
    }

    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn outlets(&self) -> &[String] {
        &self.0
    }

    /// Lazy walk from this path up to the root
    pub fn ancestors(&self) -> OutletPathHierarchy<'_> {
        OutletPathHierarchy::new(&self.0)
    }
}

impl fmt::Display for OutletPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for outlet in &self.0 {
            write!(f, "/{}", outlet)?;
        }
        Ok(())
    }
}

/// Lazy iterator over a path and its ancestors
///
/// For `[primary, aux]`, yields: `[primary, aux]` → `[primary]` → `[]`
///
/// Only borrows the outlet names; each step shortens the slice by one.
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::OutletPath;
///
/// let path = OutletPath::new(["primary", "aux"]);
/// let depths: Vec<usize> = path.ancestors().map(|p| p.len()).collect();
/// assert_eq!(depths, vec![2, 1, 0]);
/// ```
#[derive(Clone)]
pub struct OutletPathHierarchy<'a> {
    current: Option<&'a [String]>,
}

impl<'a> OutletPathHierarchy<'a> {
    pub fn new(outlets: &'a [String]) -> Self {
        Self {
            current: Some(outlets),
        }
    }
}

impl<'a> Iterator for OutletPathHierarchy<'a> {
    type Item = &'a [String];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = current.split_last().map(|(_, parent)| parent);

        Some(current)
    }
}
