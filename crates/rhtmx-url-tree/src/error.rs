//! Error types for URL tree parsing and navigation
//!
//! Every failure is a rejection: nothing in this crate recovers from one
//! internally, and no partially built tree is ever returned alongside an error.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, UrlTreeError>;

/// Errors raised while parsing, normalizing or patching URL trees
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlTreeError {
    /// A segment with an empty path was followed by `;key=value` parameters
    #[error("empty path url segment cannot have parameters: '{remaining}'")]
    EmptyPathWithMatrixParams { remaining: String },

    /// A parenthesized outlet group was malformed or never closed
    #[error("cannot parse url '{url}'")]
    CannotParseUrl { url: String },

    /// The parser required a literal that was not present
    #[error("expected \"{expected}\" at '{remaining}'")]
    Expected { expected: String, remaining: String },

    /// Percent-decoding produced bytes that are not valid UTF-8
    #[error("invalid percent-encoding in '{input}'")]
    InvalidEncoding { input: String },

    /// An absolute navigation started with a matrix parameter object
    #[error("root segment cannot have matrix parameters")]
    RootMatrixParams,

    /// An `outlets` command appeared before the last position
    #[error("{{outlets:{{}}}} has to be the last command")]
    OutletsNotLast,

    /// More `..` tokens than there are ancestor groups
    #[error("invalid number of '../'")]
    InvalidDoubleDots,

    /// The anchor path does not address a group inside the tree
    #[error("no segment group at outlet path {path}")]
    UnknownAnchor { path: String },

    /// A tree root was constructed with its own segments
    #[error("the root segment group of a url tree cannot contain segments")]
    RootHasSegments,

    /// A raw command could not be interpreted
    #[error("invalid navigation command: {0}")]
    InvalidCommand(String),

    /// Match options could not be loaded
    #[error("invalid match options: {0}")]
    InvalidConfig(String),
}
