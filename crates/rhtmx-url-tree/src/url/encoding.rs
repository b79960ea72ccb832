/// Percent-encoding rules for URL trees
///
/// `urlencoding` escapes everything outside the RFC 3986 unreserved set. The
/// encoders below start from that and restore the characters each URL part
/// may carry literally:
///
/// - component level (`encodeURIComponent`): `! * ' ( )`
/// - path and matrix parameters: `@ : $ , ! * '` (parentheses and `&` stay escaped)
/// - query: `@ : $ , ! * ' ( )`
/// - fragment (`encodeURI`): every reserved character except `%`, `[`, `]`
///
/// Encoders return `Cow::Borrowed` when the input needs no escaping.
use std::borrow::Cow;

use crate::error::{Result, UrlTreeError};

const SEGMENT_LITERALS: &[u8] = b"@:$,!*'";
const QUERY_LITERALS: &[u8] = b"@:$,!*'()";
const FRAGMENT_LITERALS: &[u8] = b";,/?:@&=+$!*'()#";

/// Encodes a path segment or a matrix parameter key/value
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::url::encoding::encode_uri_segment;
///
/// assert_eq!(encode_uri_segment("team"), "team");
/// assert_eq!(encode_uri_segment("a b"), "a%20b");
/// assert_eq!(encode_uri_segment("user@host:80"), "user@host:80");
/// assert_eq!(encode_uri_segment("(x)&y"), "%28x%29%26y");
/// ```
pub fn encode_uri_segment(s: &str) -> Cow<'_, str> {
    encode_keeping(s, SEGMENT_LITERALS)
}

/// Encodes a query parameter key or value
///
/// ```
/// use rhtmx_url_tree::url::encoding::encode_uri_query;
///
/// assert_eq!(encode_uri_query("a=b&c"), "a%3Db%26c");
/// assert_eq!(encode_uri_query("a;b"), "a%3Bb");
/// assert_eq!(encode_uri_query("f(x)"), "f(x)");
/// ```
pub fn encode_uri_query(s: &str) -> Cow<'_, str> {
    encode_keeping(s, QUERY_LITERALS)
}

/// Encodes a fragment with URI-level (not component-level) rules
///
/// ```
/// use rhtmx_url_tree::url::encoding::encode_uri_fragment;
///
/// assert_eq!(encode_uri_fragment("a/b?c#d"), "a/b?c#d");
/// assert_eq!(encode_uri_fragment("a b"), "a%20b");
/// ```
pub fn encode_uri_fragment(s: &str) -> Cow<'_, str> {
    encode_keeping(s, FRAGMENT_LITERALS)
}

/// Percent-decodes a path, matrix parameter or fragment
///
/// A `%` not followed by two hex digits is rejected, as is a decoded byte
/// sequence that is not UTF-8.
pub fn decode(s: &str) -> Result<Cow<'_, str>> {
    let invalid = || UrlTreeError::InvalidEncoding {
        input: s.to_string(),
    };
    if has_malformed_escape(s) {
        return Err(invalid());
    }
    urlencoding::decode(s).map_err(|_| invalid())
}

fn has_malformed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, byte)| {
        *byte == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

/// Percent-decodes a query key or value, reading `+` as a space first
///
/// ```
/// use rhtmx_url_tree::url::encoding::decode_query;
///
/// assert_eq!(decode_query("a+b%21").unwrap(), "a b!");
/// ```
pub fn decode_query(s: &str) -> Result<Cow<'_, str>> {
    if !s.contains('+') {
        return decode(s);
    }
    let spaced = s.replace('+', "%20");
    decode(&spaced).map(|decoded| Cow::Owned(decoded.into_owned()))
}

/// Encodes `s`, then turns the escapes of `literals` back into characters
fn encode_keeping<'a>(s: &'a str, literals: &[u8]) -> Cow<'a, str> {
    match urlencoding::encode(s) {
        Cow::Borrowed(_) => Cow::Borrowed(s),
        Cow::Owned(encoded) => Cow::Owned(restore_literals(&encoded, literals)),
    }
}

fn restore_literals(encoded: &str, literals: &[u8]) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = &rest[pos..];
        let literal = escape
            .get(1..3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .filter(|byte| literals.contains(byte));

        match literal {
            Some(byte) => {
                out.push(char::from(byte));
                rest = &escape[3..];
            }
            None => {
                out.push('%');
                rest = &escape[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
