/// Parameter maps carried by segments and trees
///
/// Matrix parameters are plain `key → value` maps; query parameters may repeat
/// a key, so each value is either a single string or an ordered list.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Matrix parameters attached to a single segment (`;id=33`)
pub type Params = BTreeMap<String, String>;

/// Query parameters attached to a whole tree
pub type QueryParams = BTreeMap<String, QueryValue>;

/// A query parameter value: `?a=1` or `?a=1&a=2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// Appends another occurrence of the same key, promoting to `Multiple`
    pub fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multiple(vec![std::mem::take(first), value]);
            }
            QueryValue::Multiple(values) => values.push(value),
        }
    }

    /// All values in order of appearance
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Array-or-string aware equality
    ///
    /// Two lists are equal when they hold the same values regardless of order.
    /// A single value never equals a list, even a one-element list.
    pub fn equivalent(&self, other: &QueryValue) -> bool {
        match (self, other) {
            (QueryValue::Single(a), QueryValue::Single(b)) => a == b,
            (QueryValue::Multiple(a), QueryValue::Multiple(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                a == b
            }
            _ => false,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryValue {
    fn from(values: Vec<S>) -> Self {
        QueryValue::Multiple(values.into_iter().map(Into::into).collect())
    }
}

/// Read-only view over a parameter map
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::UrlTree;
///
/// let tree: UrlTree = "/a?x=1&x=2&y=3".parse().unwrap();
/// let params = tree.query_param_map();
///
/// assert_eq!(params.get("x"), Some("1"));
/// assert_eq!(params.get_all("x"), vec!["1", "2"]);
/// assert!(params.has("y"));
/// assert!(!params.has("z"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    params: QueryParams,
}

impl ParamMap {
    pub fn new(params: QueryParams) -> Self {
        Self { params }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|value| value.values().into_iter().next())
    }

    /// Every value for `name`, empty when the key is absent
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.params
            .get(name)
            .map(QueryValue::values)
            .unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

impl From<&Params> for ParamMap {
    fn from(params: &Params) -> Self {
        Self::new(
            params
                .iter()
                .map(|(key, value)| (key.clone(), QueryValue::Single(value.clone())))
                .collect(),
        )
    }
}

impl From<&QueryParams> for ParamMap {
    fn from(params: &QueryParams) -> Self {
        Self::new(params.clone())
    }
}

/// Equal key sets and equivalent values
pub fn equal_query_params(container: &QueryParams, containee: &QueryParams) -> bool {
    container.len() == containee.len()
        && containee.iter().all(|(key, value)| {
            container
                .get(key)
                .map_or(false, |other| other.equivalent(value))
        })
}

/// Every containee key is present in the container with an equivalent value
pub fn contains_query_params(container: &QueryParams, containee: &QueryParams) -> bool {
    containee.len() <= container.len()
        && containee.iter().all(|(key, value)| {
            container
                .get(key)
                .map_or(false, |other| other.equivalent(value))
        })
}
