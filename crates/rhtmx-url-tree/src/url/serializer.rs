/// Canonical string form of URL trees
///
/// At the root, the primary outlet is written bare and the named outlets
/// follow in one parenthesized block. Below the root, a lone primary child is
/// appended after `/`; any other set of children goes inside `/( ... )`.
use crate::error::Result;
use crate::tree::{
    Params, QueryParams, QueryValue, UrlSegment, UrlSegmentGroup, UrlTree, PRIMARY_OUTLET,
};

use super::encoding::{encode_uri_fragment, encode_uri_query, encode_uri_segment};
use super::parser::UrlParser;

/// Converts between URL strings and `UrlTree`s
///
/// The seam through which callers swap in their own URL format.
pub trait UrlSerializer {
    fn parse(&self, url: &str) -> Result<UrlTree>;

    fn serialize(&self, tree: &UrlTree) -> String;
}

/// The outlet-aware format used throughout RHTMX
///
/// `/team/33;open=true/(user/11//right:chat)?a=1&a=2#frag`
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::{DefaultUrlSerializer, UrlSerializer};
///
/// let serializer = DefaultUrlSerializer;
/// let tree = serializer.parse("/a/(b//aux:c)?x=1&x=2").unwrap();
/// assert_eq!(serializer.serialize(&tree), "/a/(b//aux:c)?x=1&x=2");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUrlSerializer;

impl UrlSerializer for DefaultUrlSerializer {
    fn parse(&self, url: &str) -> Result<UrlTree> {
        UrlParser::new(url).parse_tree()
    }

    fn serialize(&self, tree: &UrlTree) -> String {
        let segment = format!("/{}", serialize_segment(&tree.root, true));
        let query = serialize_query_params(&tree.query_params);
        let fragment = tree
            .fragment
            .as_deref()
            .map(|fragment| format!("#{}", encode_uri_fragment(fragment)))
            .unwrap_or_default();

        format!("{segment}{query}{fragment}")
    }
}

/// Serializes a tree with the default format
pub fn serialize(tree: &UrlTree) -> String {
    DefaultUrlSerializer.serialize(tree)
}

/// The group's own segments joined by `/`
pub fn serialize_paths(group: &UrlSegmentGroup) -> String {
    group
        .segments
        .iter()
        .map(serialize_path)
        .collect::<Vec<_>>()
        .join("/")
}

/// One segment: encoded path followed by `;key=value` pairs
pub fn serialize_path(segment: &UrlSegment) -> String {
    format!(
        "{}{}",
        encode_uri_segment(&segment.path),
        serialize_matrix_params(&segment.parameters)
    )
}

fn serialize_matrix_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!(";{}={}", encode_uri_segment(key), encode_uri_segment(value)))
        .collect()
}

fn serialize_segment(group: &UrlSegmentGroup, root: bool) -> String {
    if !group.has_children() {
        return serialize_paths(group);
    }

    if root {
        let primary = group
            .primary()
            .map(|primary| serialize_segment(primary, false))
            .unwrap_or_default();
        let named: Vec<String> = group
            .children_primary_first()
            .filter(|(outlet, _)| *outlet != PRIMARY_OUTLET)
            .map(|(outlet, child)| format!("{}:{}", outlet, serialize_segment(child, false)))
            .collect();

        if named.is_empty() {
            primary
        } else {
            format!("{}({})", primary, named.join("//"))
        }
    } else {
        let children: Vec<String> = group
            .children_primary_first()
            .map(|(outlet, child)| {
                if outlet == PRIMARY_OUTLET {
                    serialize_segment(child, false)
                } else {
                    format!("{}:{}", outlet, serialize_segment(child, false))
                }
            })
            .collect();

        // no parentheses when the only child is the primary outlet
        if group.number_of_children() == 1 && group.primary().is_some() {
            format!("{}/{}", serialize_paths(group), children[0])
        } else {
            format!("{}/({})", serialize_paths(group), children.join("//"))
        }
    }
}

fn serialize_query_params(params: &QueryParams) -> String {
    let parts: Vec<String> = params
        .iter()
        .map(|(name, value)| {
            let name = encode_uri_query(name);
            match value {
                QueryValue::Single(value) => format!("{}={}", name, encode_uri_query(value)),
                QueryValue::Multiple(values) => values
                    .iter()
                    .map(|value| format!("{}={}", name, encode_uri_query(value)))
                    .collect::<Vec<_>>()
                    .join("&"),
            }
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
