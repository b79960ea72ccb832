/// Recursive-descent parser from URL strings to `UrlTree`s
///
/// The parser keeps a cursor over the unconsumed suffix of the input and
/// matches prefixes by hand-written character classes. Grammar, informally:
///
/// ```text
/// url      = ["/"] [children] ["?" query] ["#" fragment]
/// children = ["/"] [segment] ("/" segment)* ["/" parens] [parens]
/// segment  = path (";" key ["=" value])*
/// parens   = "(" (outlet ":"? children ["//"])* ")"
/// ```
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, UrlTreeError};
use crate::tree::{Params, QueryParams, QueryValue, UrlSegment, UrlSegmentGroup, UrlTree, PRIMARY_OUTLET};

use super::encoding::{decode, decode_query};

/// Parses a URL string into a tree
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::url::parse;
///
/// let tree = parse("/a;x=1;y=2").unwrap();
/// let segment = &tree.root.children["primary"].segments[0];
/// assert_eq!(segment.path, "a");
/// assert_eq!(segment.parameters["x"], "1");
/// assert_eq!(segment.parameters["y"], "2");
/// ```
pub fn parse(url: &str) -> Result<UrlTree> {
    let mut parser = UrlParser::new(url);
    let tree = parser.parse_tree();
    if let Err(err) = &tree {
        debug!(url, error = %err, "failed to parse url");
    }
    tree
}

/// Cursor-based parser state
pub struct UrlParser<'a> {
    url: &'a str,
    remaining: &'a str,
}

impl<'a> UrlParser<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            remaining: url,
        }
    }

    pub fn parse_tree(&mut self) -> Result<UrlTree> {
        let root = self.parse_root_segment()?;
        let query_params = self.parse_query_params()?;
        let fragment = self.parse_fragment()?;
        UrlTree::new(root, query_params, fragment)
    }

    /// The root group never carries segments of its own
    pub fn parse_root_segment(&mut self) -> Result<UrlSegmentGroup> {
        self.consume_optional("/");

        if self.remaining.is_empty() || self.peek_starts_with("?") || self.peek_starts_with("#") {
            return Ok(UrlSegmentGroup::empty());
        }

        Ok(UrlSegmentGroup::new(Vec::new(), self.parse_children()?))
    }

    pub fn parse_query_params(&mut self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        if self.consume_optional("?") {
            loop {
                self.parse_query_param(&mut params)?;
                if !self.consume_optional("&") {
                    break;
                }
            }
        }
        Ok(params)
    }

    pub fn parse_fragment(&mut self) -> Result<Option<String>> {
        if self.consume_optional("#") {
            let fragment = decode(self.remaining)?.into_owned();
            self.remaining = "";
            Ok(Some(fragment))
        } else {
            Ok(None)
        }
    }

    fn parse_children(&mut self) -> Result<BTreeMap<String, UrlSegmentGroup>> {
        if self.remaining.is_empty() {
            return Ok(BTreeMap::new());
        }

        self.consume_optional("/");

        let mut segments = Vec::new();
        if !self.peek_starts_with("(") {
            segments.push(self.parse_segment()?);
        }

        while self.peek_starts_with("/")
            && !self.peek_starts_with("//")
            && !self.peek_starts_with("/(")
        {
            self.capture("/")?;
            segments.push(self.parse_segment()?);
        }

        let mut children = BTreeMap::new();
        if self.peek_starts_with("/(") {
            self.capture("/")?;
            children = self.parse_parens(true)?;
        }

        let mut res = BTreeMap::new();
        if self.peek_starts_with("(") {
            res = self.parse_parens(false)?;
        }

        if !segments.is_empty() || !children.is_empty() {
            res.insert(
                PRIMARY_OUTLET.to_string(),
                UrlSegmentGroup::new(segments, children),
            );
        }

        Ok(res)
    }

    fn parse_segment(&mut self) -> Result<UrlSegment> {
        let path = match_segment(self.remaining);
        if path.is_empty() && self.peek_starts_with(";") {
            return Err(UrlTreeError::EmptyPathWithMatrixParams {
                remaining: self.remaining.to_string(),
            });
        }

        self.capture(path)?;
        let path = decode(path)?.into_owned();
        Ok(UrlSegment::with_params(path, self.parse_matrix_params()?))
    }

    fn parse_matrix_params(&mut self) -> Result<Params> {
        let mut params = Params::new();
        while self.consume_optional(";") {
            self.parse_param(&mut params)?;
        }
        Ok(params)
    }

    fn parse_param(&mut self, params: &mut Params) -> Result<()> {
        let key = match_matrix_key(self.remaining);
        if key.is_empty() {
            return Ok(());
        }
        self.capture(key)?;

        let mut value = "";
        if self.consume_optional("=") {
            value = match_segment(self.remaining);
            if !value.is_empty() {
                self.capture(value)?;
            }
        }

        params.insert(decode(key)?.into_owned(), decode(value)?.into_owned());
        Ok(())
    }

    /// Parses a single query parameter `name[=value]`
    fn parse_query_param(&mut self, params: &mut QueryParams) -> Result<()> {
        let key = match_query_key(self.remaining);
        if key.is_empty() {
            return Ok(());
        }
        self.capture(key)?;

        let mut value = "";
        if self.consume_optional("=") {
            value = match_query_value(self.remaining);
            if !value.is_empty() {
                self.capture(value)?;
            }
        }

        let key = decode_query(key)?.into_owned();
        let value = decode_query(value)?.into_owned();

        match params.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => {
                params.insert(key, QueryValue::Single(value));
            }
        }
        Ok(())
    }

    /// Parses `(a/b//outlet_name:c/d)`
    fn parse_parens(&mut self, allow_primary: bool) -> Result<BTreeMap<String, UrlSegmentGroup>> {
        let mut groups = BTreeMap::new();
        self.capture("(")?;

        while !self.consume_optional(")") && !self.remaining.is_empty() {
            let path = match_segment(self.remaining);

            // anything else means an unescaped character or an unclosed group
            let next = self.remaining[path.len()..].chars().next();
            if !matches!(next, Some('/') | Some(')') | Some(';')) {
                return Err(self.cannot_parse());
            }

            let outlet = match path.find(':') {
                Some(colon) => {
                    let outlet = &path[..colon];
                    self.capture(outlet)?;
                    self.capture(":")?;
                    outlet.to_string()
                }
                None if allow_primary => PRIMARY_OUTLET.to_string(),
                None => return Err(self.cannot_parse()),
            };

            let mut children = self.parse_children()?;
            let group = match children.remove(PRIMARY_OUTLET) {
                Some(primary) if children.is_empty() => primary,
                Some(primary) => {
                    children.insert(PRIMARY_OUTLET.to_string(), primary);
                    UrlSegmentGroup::new(Vec::new(), children)
                }
                None => UrlSegmentGroup::new(Vec::new(), children),
            };
            groups.insert(outlet, group);

            self.consume_optional("//");
        }

        Ok(groups)
    }

    fn peek_starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Consumes `prefix` when present and reports whether it did
    fn consume_optional(&mut self, prefix: &str) -> bool {
        match self.remaining.strip_prefix(prefix) {
            Some(rest) => {
                self.remaining = rest;
                true
            }
            None => false,
        }
    }

    fn capture(&mut self, prefix: &str) -> Result<()> {
        if self.consume_optional(prefix) {
            Ok(())
        } else {
            Err(UrlTreeError::Expected {
                expected: prefix.to_string(),
                remaining: self.remaining.to_string(),
            })
        }
    }

    fn cannot_parse(&self) -> UrlTreeError {
        UrlTreeError::CannotParseUrl {
            url: self.url.to_string(),
        }
    }
}

// ============================================================================
// Character classes
// ============================================================================

fn take_until<'a>(s: &'a str, stop: &[char]) -> &'a str {
    s.find(stop).map_or(s, |end| &s[..end])
}

/// Longest prefix without `/ ( ) ? ; #`
fn match_segment(s: &str) -> &str {
    take_until(s, &['/', '(', ')', '?', ';', '#'])
}

/// Longest prefix without `/ ( ) ? ; = #`
fn match_matrix_key(s: &str) -> &str {
    take_until(s, &['/', '(', ')', '?', ';', '=', '#'])
}

/// Longest prefix without `= ? & #`
fn match_query_key(s: &str) -> &str {
    take_until(s, &['=', '?', '&', '#'])
}

/// Longest prefix without `& #`
fn match_query_value(s: &str) -> &str {
    take_until(s, &['&', '#'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(group: &UrlSegmentGroup) -> Vec<&str> {
        group.segments.iter().map(|s| s.path.as_str()).collect()
    }

    #[test]
    fn test_parse_root_only() {
        for url in ["", "/", "/?a=1", "/#frag"] {
            let tree = parse(url).unwrap();
            assert!(!tree.root.has_children(), "{url}");
        }
    }

    #[test]
    fn test_parse_segments_under_primary() {
        let tree = parse("/one/two").unwrap();
        assert!(tree.root.segments.is_empty());
        assert_eq!(paths(&tree.root.children[PRIMARY_OUTLET]), vec!["one", "two"]);
    }

    #[test]
    fn test_parse_named_outlets_after_slash() {
        let tree = parse("/a/(b//aux:c)").unwrap();
        let a = &tree.root.children[PRIMARY_OUTLET];
        assert_eq!(paths(a), vec!["a"]);
        assert_eq!(paths(&a.children[PRIMARY_OUTLET]), vec!["b"]);
        assert_eq!(paths(&a.children["aux"]), vec!["c"]);
    }

    #[test]
    fn test_parse_named_outlets_at_root() {
        let tree = parse("/a(aux:b//right:c)").unwrap();
        assert_eq!(paths(&tree.root.children[PRIMARY_OUTLET]), vec!["a"]);
        assert_eq!(paths(&tree.root.children["aux"]), vec!["b"]);
        assert_eq!(paths(&tree.root.children["right"]), vec!["c"]);
    }

    #[test]
    fn test_parse_only_named_outlet() {
        let tree = parse("/(aux:b)").unwrap();
        assert_eq!(tree.root.number_of_children(), 1);
        assert_eq!(paths(&tree.root.children["aux"]), vec!["b"]);
    }

    #[test]
    fn test_parse_nested_outlet_keeps_children() {
        let tree = parse("/(aux:b/(c//x:d))").unwrap();
        let aux = &tree.root.children["aux"];
        assert_eq!(paths(aux), vec!["b"]);
        assert_eq!(aux.number_of_children(), 2);
    }

    #[test]
    fn test_parse_matrix_params() {
        let tree = parse("/a;x=1;flag/b;y=%20z").unwrap();
        let group = &tree.root.children[PRIMARY_OUTLET];
        assert_eq!(group.segments[0].parameters["x"], "1");
        assert_eq!(group.segments[0].parameters["flag"], "");
        assert_eq!(group.segments[1].parameters["y"], " z");
    }

    #[test]
    fn test_parse_empty_path_with_params_fails() {
        let err = parse("/a/;x=1").unwrap_err();
        assert!(matches!(err, UrlTreeError::EmptyPathWithMatrixParams { .. }));
    }

    #[test]
    fn test_parse_unclosed_parens_fails() {
        let err = parse("/a/(b").unwrap_err();
        assert_eq!(
            err,
            UrlTreeError::CannotParseUrl {
                url: "/a/(b".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unescaped_char_in_parens_fails() {
        assert!(matches!(
            parse("/a/(b?c)").unwrap_err(),
            UrlTreeError::CannotParseUrl { .. }
        ));
    }

    #[test]
    fn test_parse_bare_token_without_slash_fails() {
        assert!(matches!(
            parse("/(b)").unwrap_err(),
            UrlTreeError::CannotParseUrl { .. }
        ));
    }

    #[test]
    fn test_parse_query_repeats_accumulate() {
        let tree = parse("/a?x=1&y=&x=2&z").unwrap();
        assert_eq!(tree.query_params["x"], QueryValue::from(vec!["1", "2"]));
        assert_eq!(tree.query_params["y"], QueryValue::from(""));
        assert_eq!(tree.query_params["z"], QueryValue::from(""));
    }

    #[test]
    fn test_parse_query_decodes_plus() {
        let tree = parse("/?q=hello+world%21").unwrap();
        assert_eq!(tree.query_params["q"], QueryValue::from("hello world!"));
    }

    #[test]
    fn test_parse_fragment_is_opaque() {
        let tree = parse("/a?b=1#x/y?z=%20").unwrap();
        assert_eq!(tree.fragment.as_deref(), Some("x/y?z= "));
    }

    #[test]
    fn test_parse_decodes_segments() {
        let tree = parse("/a%20b/%28c%29").unwrap();
        assert_eq!(paths(&tree.root.children[PRIMARY_OUTLET]), vec!["a b", "(c)"]);
    }
}
