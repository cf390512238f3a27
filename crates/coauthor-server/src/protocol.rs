//! JSON-RPC 2.0 message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// The row source could not be read, so no graph exists to query.
pub const DATA_SOURCE_ERROR: i32 = -32002;

/// A client request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

/// A server response. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl Response {
    pub fn success(id: Option<Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Failed to encode result: {}", e)),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn invalid_params(id: Option<Value>, detail: impl Into<String>) -> Self {
        Self::error(
            id,
            INVALID_PARAMS,
            format!("Invalid params: {}", detail.into()),
        )
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }
}

/// Parameters of the `query` method.
///
/// `author_b` is only read by `shortest_path`, and `remove` only by
/// `create_bst`. Both default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub action: String,
    #[serde(default)]
    pub author_a: String,
    #[serde(default)]
    pub author_b: String,
    /// Author names to remove from the tree built by `create_bst`.
    /// They are normalized first; names not in the tree are ignored.
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Whether a query produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

/// Result of a `query` call.
///
/// Query failures such as an unknown author are reported here with
/// `status: error`, not as JSON-RPC errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub status: Status,
    pub result: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight_nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl QueryOutcome {
    pub fn success(result: impl Into<String>, highlight_nodes: Vec<String>) -> Self {
        Self {
            status: Status::Success,
            result: result.into(),
            highlight_nodes,
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            result: message.into(),
            highlight_nodes: Vec::new(),
            data: None,
        }
    }

    /// Attaches the structured answer alongside the text.
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let req: Request = serde_json::from_str(r#"{"method": "graph.info"}"#).unwrap();
        assert_eq!(req.method, "graph.info");
        assert!(req.id.is_none());
        assert!(req.params.is_null());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = Response::method_not_found(Some(json!(7)), "nope");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(value["id"], 7);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_outcome_shape() {
        let outcome = QueryOutcome::success("ok", vec!["alice".to_string()]);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "result": "ok", "highlight_nodes": ["alice"]})
        );
    }
}
