//! Error types and handling for the JIRA ticket MCP server
//!
//! Provides structured error types that map to MCP JSON-RPC error codes
//! and converts gouqi/serde failures into MCP-compatible errors. JIRA API
//! failures keep the response payload so callers see what JIRA said.

use serde_json::Value;
use thiserror::Error;

/// Custom error types for the JIRA ticket MCP server
#[derive(Debug, Error)]
pub enum JiraToolError {
    /// Configuration errors (-32001)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Authentication failures (-32002)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Network errors (-32003)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Resource not found errors (-32005)
    #[error("Not found: {resource} '{key}' not found")]
    NotFound { resource: String, key: String },

    /// Invalid parameter errors (-32006)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Non-2xx responses from the JIRA API (-32010), payload preserved
    #[error("JIRA API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Internal server errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl JiraToolError {
    /// Get the MCP JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            JiraToolError::Configuration { .. } => -32001,
            JiraToolError::Authentication { .. } => -32002,
            JiraToolError::Network { .. } => -32003,
            JiraToolError::NotFound { .. } => -32005,
            JiraToolError::InvalidParameter { .. } => -32006,
            JiraToolError::Api { .. } => -32010,
            JiraToolError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JiraToolError::Configuration { .. } => "configuration",
            JiraToolError::Authentication { .. } => "authentication",
            JiraToolError::Network { .. } => "network",
            JiraToolError::NotFound { .. } => "not_found",
            JiraToolError::InvalidParameter { .. } => "invalid_parameter",
            JiraToolError::Api { .. } => "jira_api",
            JiraToolError::Internal { .. } => "internal",
        }
    }

    /// Get additional error data for MCP error responses
    pub fn error_data(&self) -> Option<Value> {
        let mut data = serde_json::Map::new();
        data.insert(
            "category".to_string(),
            Value::String(self.category().to_string()),
        );

        match self {
            JiraToolError::NotFound { resource, key } => {
                data.insert("resource".to_string(), Value::String(resource.clone()));
                data.insert("key".to_string(), Value::String(key.clone()));
                Some(Value::Object(data))
            }
            JiraToolError::InvalidParameter { parameter, .. } => {
                data.insert("parameter".to_string(), Value::String(parameter.clone()));
                Some(Value::Object(data))
            }
            JiraToolError::Api { status, body } => {
                data.insert("status".to_string(), Value::Number((*status).into()));
                // JIRA error bodies are JSON when the API itself produced them
                let payload = serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.clone()));
                data.insert("jira_error".to_string(), payload);
                Some(Value::Object(data))
            }
            _ => Some(Value::Object(data)),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraToolError::Configuration {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        JiraToolError::Authentication {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        JiraToolError::Network {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, key: impl Into<String>) -> Self {
        JiraToolError::NotFound {
            resource: resource.into(),
            key: key.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        JiraToolError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a JIRA API error with the response payload
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        JiraToolError::Api {
            status,
            body: body.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        JiraToolError::Internal {
            message: message.into(),
        }
    }
}

/// Convert from gouqi errors to JiraToolError
impl From<gouqi::Error> for JiraToolError {
    fn from(err: gouqi::Error) -> Self {
        match err {
            gouqi::Error::Unauthorized => JiraToolError::auth("JIRA rejected the credentials"),
            gouqi::Error::NotFound => JiraToolError::not_found("resource", "unknown"),
            gouqi::Error::Fault { code, errors } => {
                JiraToolError::api(code.as_u16(), format!("{errors:?}"))
            }
            gouqi::Error::Http(_) => JiraToolError::network(format!("HTTP error: {}", err)),
            gouqi::Error::IO(_) => JiraToolError::network(format!("IO error: {}", err)),
            gouqi::Error::Serde(_) => {
                JiraToolError::internal(format!("Serialization error: {}", err))
            }
            _ => JiraToolError::internal(format!("JIRA client error: {}", err)),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for JiraToolError {
    fn from(err: serde_json::Error) -> Self {
        JiraToolError::internal(format!("JSON error: {}", err))
    }
}

/// Convert from TOML parsing errors
impl From<toml::de::Error> for JiraToolError {
    fn from(err: toml::de::Error) -> Self {
        JiraToolError::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for JIRA ticket MCP operations
pub type JiraToolResult<T> = Result<T, JiraToolError>;
