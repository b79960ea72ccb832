/// Navigation commands and their normalization
///
/// Raw commands arrive as a heterogeneous list; [`compute_navigation`] folds
/// them into a [`Navigation`]: absolute or relative, how many `..` to climb,
/// and the remaining commands in canonical form.
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, UrlTreeError};
use crate::tree::Params;

pub mod json;

pub use json::{commands_from_json, query_params_from_json};

// ============================================================================
// Command Types
// ============================================================================

/// One element of a navigation command list
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::{Command, OutletTarget};
///
/// let commands = vec![
///     Command::from("/team"),
///     Command::from(33),
///     Command::matrix([("open", "true")]),
///     Command::outlets([
///         ("primary", OutletTarget::from("user/11")),
///         ("right", OutletTarget::Clear),
///     ]),
/// ];
/// assert!(commands[2].is_matrix_params());
/// assert!(commands[3].is_outlets());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A path token; only the first command of a list is split on `/`
    Path(String),
    /// An opaque path token that is never split
    SegmentPath(String),
    /// Matrix parameters for the preceding path token
    MatrixParams(Params),
    /// Per-outlet commands; must be the last command
    Outlets(BTreeMap<String, OutletTarget>),
}

/// What an `outlets` command does to one outlet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutletTarget {
    /// Remove the outlet
    Clear,
    /// A path string, split on `/` during normalization
    Path(String),
    /// An explicit command list
    Commands(Vec<Command>),
}

impl Command {
    pub fn path(token: impl ToString) -> Self {
        Command::Path(token.to_string())
    }

    pub fn segment_path(path: impl Into<String>) -> Self {
        Command::SegmentPath(path.into())
    }

    pub fn matrix<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Command::MatrixParams(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }

    pub fn outlets<I, K>(outlets: I) -> Self
    where
        I: IntoIterator<Item = (K, OutletTarget)>,
        K: Into<String>,
    {
        Command::Outlets(outlets.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_matrix_params(&self) -> bool {
        matches!(self, Command::MatrixParams(_))
    }

    pub fn is_outlets(&self) -> bool {
        matches!(self, Command::Outlets(_))
    }

    /// Path text of a path-like command
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Command::Path(path) | Command::SegmentPath(path) => Some(path),
            _ => None,
        }
    }
}

impl From<&str> for Command {
    fn from(token: &str) -> Self {
        Command::Path(token.to_string())
    }
}

impl From<String> for Command {
    fn from(token: String) -> Self {
        Command::Path(token)
    }
}

macro_rules! command_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Command {
                fn from(token: $ty) -> Self {
                    Command::Path(token.to_string())
                }
            }
        )*
    };
}

command_from_number!(i32, i64, u32, u64, usize);

impl From<&str> for OutletTarget {
    fn from(path: &str) -> Self {
        OutletTarget::Path(path.to_string())
    }
}

impl From<String> for OutletTarget {
    fn from(path: String) -> Self {
        OutletTarget::Path(path)
    }
}

impl From<Vec<Command>> for OutletTarget {
    fn from(commands: Vec<Command>) -> Self {
        OutletTarget::Commands(commands)
    }
}

impl<T: Into<OutletTarget>> From<Option<T>> for OutletTarget {
    fn from(target: Option<T>) -> Self {
        target.map_or(OutletTarget::Clear, Into::into)
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Canonical form of a command list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub is_absolute: bool,
    pub double_dots: usize,
    pub commands: Vec<Command>,
}

impl Navigation {
    /// Validates and builds a navigation
    ///
    /// Fails when an absolute navigation starts with matrix parameters, or when
    /// an `outlets` command is not the last command.
    pub fn new(is_absolute: bool, double_dots: usize, commands: Vec<Command>) -> Result<Self> {
        if is_absolute && commands.first().is_some_and(Command::is_matrix_params) {
            return Err(UrlTreeError::RootMatrixParams);
        }

        let outlets_at = commands.iter().position(Command::is_outlets);
        if outlets_at.is_some_and(|at| at + 1 != commands.len()) {
            return Err(UrlTreeError::OutletsNotLast);
        }

        Ok(Self {
            is_absolute,
            double_dots,
            commands,
        })
    }

    /// Navigation to the bare root (`["/"]`)
    pub fn to_root(&self) -> bool {
        self.is_absolute && self.commands.is_empty()
    }
}

/// Fold accumulator for [`compute_navigation`]
#[derive(Default)]
struct NavigationState {
    is_absolute: bool,
    double_dots: usize,
    commands: Vec<Command>,
}

impl NavigationState {
    /// Interprets the first command positionally: `/a`, `./a`, `../../a`
    fn with_leading_path(mut self, path: &str) -> Self {
        for (index, part) in path.split('/').enumerate() {
            match part {
                "." if index == 0 => {}
                "" if index == 0 => self.is_absolute = true,
                ".." => self.double_dots += 1,
                "" => {}
                part => self.commands.push(Command::Path(part.to_string())),
            }
        }
        self
    }

    fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    fn into_navigation(self) -> Result<Navigation> {
        Navigation::new(self.is_absolute, self.double_dots, self.commands)
    }
}

/// Splits outlet path strings into command lists
fn normalize_outlets(outlets: &BTreeMap<String, OutletTarget>) -> BTreeMap<String, OutletTarget> {
    outlets
        .iter()
        .map(|(name, target)| {
            let target = match target {
                OutletTarget::Path(path) => OutletTarget::Commands(
                    path.split('/')
                        .filter(|part| !part.is_empty())
                        .map(Command::from)
                        .collect(),
                ),
                other => other.clone(),
            };
            (name.clone(), target)
        })
        .collect()
}

/// Processes a single command and updates the fold state
fn process_command(state: NavigationState, (index, command): (usize, &Command)) -> NavigationState {
    match command {
        Command::Outlets(outlets) => state.with_command(Command::Outlets(normalize_outlets(outlets))),
        Command::SegmentPath(path) => state.with_command(Command::Path(path.clone())),
        Command::Path(path) if index == 0 => state.with_leading_path(path),
        other => state.with_command(other.clone()),
    }
}

/// Normalizes a raw command list into a [`Navigation`]
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::command::compute_navigation;
/// use rhtmx_url_tree::Command;
///
/// let nav = compute_navigation(&["../../team/44".into(), Command::from("user")]).unwrap();
/// assert!(!nav.is_absolute);
/// assert_eq!(nav.double_dots, 2);
/// assert_eq!(nav.commands, vec!["team".into(), "44".into(), Command::from("user")]);
///
/// assert!(compute_navigation(&["/".into()]).unwrap().to_root());
/// ```
pub fn compute_navigation(commands: &[Command]) -> Result<Navigation> {
    if let [Command::Path(only)] = commands {
        if only == "/" {
            return Navigation::new(true, 0, Vec::new());
        }
    }

    let navigation = commands
        .iter()
        .enumerate()
        .fold(NavigationState::default(), process_command)
        .into_navigation();

    if let Err(err) = &navigation {
        debug!(error = %err, "rejected navigation commands");
    }
    navigation
}
