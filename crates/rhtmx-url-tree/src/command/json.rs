/// JSON boundary for commands and query parameters
///
/// Callers that receive navigation requests as JSON (`["/team", 33,
/// {"outlets": {"right": "chat"}}]`) convert them here, once. Past this point
/// everything works on the closed [`Command`] enum.
use serde_json::{Map, Value};

use crate::error::{Result, UrlTreeError};
use crate::tree::{Params, QueryParams, QueryValue};

use super::{Command, OutletTarget};

/// Converts a JSON array into commands
///
/// # Examples
///
/// ```
/// use rhtmx_url_tree::command::commands_from_json;
/// use rhtmx_url_tree::{Command, OutletTarget};
/// use serde_json::json;
///
/// let commands = commands_from_json(&json!([
///     "/team", 33, {"open": true}, {"outlets": {"right": "chat", "aux": null}}
/// ])).unwrap();
///
/// assert_eq!(commands[1], Command::from("33"));
/// assert_eq!(commands[2], Command::matrix([("open", "true")]));
/// assert_eq!(
///     commands[3],
///     Command::outlets([("aux", OutletTarget::Clear), ("right", OutletTarget::from("chat"))])
/// );
/// ```
pub fn commands_from_json(value: &Value) -> Result<Vec<Command>> {
    match value {
        Value::Array(items) => items.iter().map(command_from_json).collect(),
        other => Err(UrlTreeError::InvalidCommand(format!(
            "expected an array of commands, got {other}"
        ))),
    }
}

/// Converts a single JSON value into a command
pub fn command_from_json(value: &Value) -> Result<Command> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(Command::Path(stringify(value))),
        Value::Object(object) => object_command(object),
        other => Err(UrlTreeError::InvalidCommand(format!(
            "unsupported command {other}"
        ))),
    }
}

fn object_command(object: &Map<String, Value>) -> Result<Command> {
    if let Some(outlets) = object.get("outlets") {
        let Value::Object(outlets) = outlets else {
            return Err(UrlTreeError::InvalidCommand(format!(
                "outlets must be an object, got {outlets}"
            )));
        };
        return outlets
            .iter()
            .map(|(name, target)| Ok((name.clone(), outlet_target(target)?)))
            .collect::<Result<_>>()
            .map(Command::Outlets);
    }

    if let Some(Value::String(path)) = object.get("segmentPath") {
        return Ok(Command::SegmentPath(path.clone()));
    }

    let params: Params = object
        .iter()
        .map(|(key, value)| (key.clone(), stringify(value)))
        .collect();
    Ok(Command::MatrixParams(params))
}

fn outlet_target(value: &Value) -> Result<OutletTarget> {
    match value {
        Value::Null => Ok(OutletTarget::Clear),
        Value::String(path) => Ok(OutletTarget::Path(path.clone())),
        Value::Array(_) => commands_from_json(value).map(OutletTarget::Commands),
        other => Err(UrlTreeError::InvalidCommand(format!(
            "unsupported outlet target {other}"
        ))),
    }
}

/// Converts a JSON object (or `null`) into query parameters
///
/// Scalars become single values, arrays become repeated values. Every value
/// is stringified.
///
/// ```
/// use rhtmx_url_tree::command::query_params_from_json;
/// use rhtmx_url_tree::QueryValue;
/// use serde_json::json;
///
/// let params = query_params_from_json(&json!({"page": 2, "tag": ["a", "b"]})).unwrap();
/// assert_eq!(params["page"], QueryValue::from("2"));
/// assert_eq!(params["tag"], QueryValue::from(vec!["a", "b"]));
/// assert!(query_params_from_json(&json!(null)).unwrap().is_empty());
/// ```
pub fn query_params_from_json(value: &Value) -> Result<QueryParams> {
    match value {
        Value::Null => Ok(QueryParams::new()),
        Value::Object(object) => Ok(object
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Array(values) => QueryValue::Multiple(values.iter().map(stringify).collect()),
                    scalar => QueryValue::Single(stringify(scalar)),
                };
                (key.clone(), value)
            })
            .collect()),
        other => Err(UrlTreeError::InvalidCommand(format!(
            "expected query parameter object, got {other}"
        ))),
    }
}

/// String form of a JSON scalar; strings are taken without quotes
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
