//! # RHTMX URL Tree
//!
//! A hierarchical URL model with support for:
//! - Path segments with matrix parameters (`/team;id=33`)
//! - Named parallel outlets (`/inbox/(message//popup:compose)`)
//! - Repeated query parameters (`?tag=a&tag=b`)
//! - Fragments (`#section`)
//!
//! ## Pipeline
//!
//! - **Grammar**: [`url::parse`] turns a string into a [`UrlTree`],
//!   [`url::serialize`] turns it back
//! - **Commands**: a list of [`Command`]s describes a navigation relative to a
//!   group of the current tree (`".."`, `"user"`, `{outlets: ...}`)
//! - **Patching**: [`create_url_tree`] applies the commands and returns a new,
//!   normalized tree
//! - **Containment**: [`contains_tree`] compares two trees with per-part
//!   [`MatchStrategy`]s
//!
//! ## Tree Invariants
//!
//! Every tree produced by this crate satisfies:
//! - the root group holds no segments of its own
//! - no group has a primary child as its only child (they are merged)
//! - no child is empty
//!
//! ## Example
//!
//! ```
//! use rhtmx_url_tree::{create_url_tree, Command, OutletPath, OutletTarget, UrlTree};
//!
//! let tree: UrlTree = "/inbox/33".parse().unwrap();
//!
//! let commands = vec![Command::outlets([("popup", OutletTarget::from("compose"))])];
//! let next = create_url_tree(&tree, &OutletPath::root(), &commands, None, None).unwrap();
//!
//! assert_eq!(next.to_string(), "/inbox/33(popup:compose)");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod command;
pub mod contains;
pub mod create;
pub mod error;
pub mod normalize;
pub mod tree;
pub mod url;

pub use command::{compute_navigation, Command, Navigation, OutletTarget};
pub use contains::{contains_tree, MatchOptions, MatchStrategy};
pub use create::create_url_tree;
pub use error::{Result, UrlTreeError};
pub use tree::{
    OutletPath, ParamMap, Params, QueryParams, QueryValue, UrlSegment, UrlSegmentGroup, UrlTree,
    PRIMARY_OUTLET,
};
pub use url::{DefaultUrlSerializer, UrlSerializer};
