//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// exit code offset by -32000 (application error range)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let mut error = Self::new(code, message);
        error.error.data = Some(ErrorData {
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
            details: None,
        });
        error
    }

    pub fn with_details(code: i32, message: impl Into<String>, details: impl Into<String>) -> Self {
        let mut error = Self::new(code, message);
        error.error.data = Some(ErrorData {
            suggestions: None,
            details: Some(details.into()),
        });
        error
    }
}

/// convert exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for dump
#[derive(Serialize)]
pub struct DumpData {
    pub file: String,
    pub scripts: Vec<ScriptData>,
}

/// result data for qualify
#[derive(Serialize)]
pub struct QualifyData {
    pub action: &'static str,
    pub file: String,
    pub qualifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub scripts: Vec<ScriptData>,
}

#[derive(Serialize)]
pub struct ScriptData {
    pub name: String,
    pub comment: String,
    pub active: bool,
    pub one_shot: bool,
    pub subroutine: bool,
    /// whole trigger in disjunctive normal form
    pub expression: String,
    pub clauses: Vec<ClauseData>,
}

/// one OR-clause, the AND of its conditions
#[derive(Serialize)]
pub struct ClauseData {
    pub conditions: Vec<ConditionData>,
}

#[derive(Serialize)]
pub struct ConditionData {
    #[serde(rename = "type")]
    pub type_id: i32,
    /// internal name, when the registry knows the type
    pub name: Option<String>,
    pub params: Vec<ParameterData>,
}

#[derive(Serialize)]
pub struct ParameterData {
    pub kind: &'static str,
    pub int: i32,
    pub real: f32,
    pub string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coord: Option<[f32; 3]>,
    /// value as shown in text output
    pub display: String,
}

/// result data for types
#[derive(Serialize)]
pub struct TypesData {
    pub types: Vec<TypeData>,
}

#[derive(Serialize, Clone)]
pub struct TypeData {
    pub id: i32,
    pub name: String,
    pub params: Vec<&'static str>,
}

// ============================================================================
// Output functions
// ============================================================================

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(code: i32, message: &str) {
    let error = JsonRpcError::new(code, message);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// print JSON-RPC error with suggestions
pub fn print_json_error_with_suggestions(code: i32, message: &str, suggestions: Vec<String>) {
    let error = JsonRpcError::with_suggestions(code, message, suggestions);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// print JSON-RPC error carrying the underlying cause
pub fn print_json_error_with_details(code: i32, message: &str, details: &str) {
    let error = JsonRpcError::with_details(code, message, details);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}
