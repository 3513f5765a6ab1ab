//! JSON-RPC style response envelope

use serde::Serialize;
use serde_json::Value;

use crate::domain::failure::Arguments;

pub const JSONRPC_VERSION: &str = "2.0";

/// One response per invocation, carrying exactly one of `result` or `error`.
///
/// Fields are private; [`RpcResponse::success`] and [`RpcResponse::failure`]
/// are the only ways to build one.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            result: None,
            error: Some(error),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RpcErrorData>,
}

/// Parameters the rendered message already interpolated away.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
}
