use serde_json::{json, Value};

use crate::error::AppError;
use crate::intelligence::FunctionDeclaration;

/// Fixed system instruction for the vault-manager role.
///
/// Pinned verbatim: the model's behavior depends on this exact wording.
pub const SYSTEM_INSTRUCTION: &str = "You are an autonomous agent that manages the files in the \
user's note vault. Listen to the user's instructions and carry them out with the tools available \
to you. Use createFile to write notes into the vault, and use tellUser to report back to the \
user. Do not invent tools that were not declared.";

/// The two declared callable tools, with JSON-schema parameter objects.
///
/// This schema is a hard external contract; names and parameter keys must
/// not change.
pub fn tool_declarations() -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: "createFile".to_string(),
            description: "Create a file in the user's vault at the given path with the given content"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Vault-relative path of the file to create, e.g. 'notes/idea.md'"
                    },
                    "content": {
                        "type": "string",
                        "description": "Full text content of the file"
                    }
                },
                "required": ["path", "content"]
            }),
        },
        FunctionDeclaration {
            name: "tellUser".to_string(),
            description: "Show a message to the user".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The message to show"
                    }
                },
                "required": ["message"]
            }),
        },
    ]
}

/// A recognized tool invocation from the model.
///
/// The dispatch table is this enum: a name outside the two variants is an
/// `UnknownTool` error, not a lookup miss.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    CreateFile { path: String, content: String },
    TellUser { message: String },
}

impl ToolCall {
    /// Parse a `{name, args}` function-call record into a tool variant.
    ///
    /// # Errors
    ///
    /// * `AppError::UnknownTool` for a name outside the dispatch table
    /// * `AppError::InvalidResponse` for missing or mis-typed arguments
    pub fn parse(name: &str, args: &Value) -> Result<Self, AppError> {
        match name {
            "createFile" => Ok(ToolCall::CreateFile {
                path: required_str(name, args, "path")?,
                content: required_str(name, args, "content")?,
            }),
            "tellUser" => Ok(ToolCall::TellUser {
                message: required_str(name, args, "message")?,
            }),
            other => Err(AppError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::CreateFile { .. } => "createFile",
            ToolCall::TellUser { .. } => "tellUser",
        }
    }
}

fn required_str(tool: &str, args: &Value, key: &str) -> Result<String, AppError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::InvalidResponse(format!("{} call is missing string argument '{}'", tool, key))
        })
}

/// Replace literal `\n` escape sequences with real newlines.
///
/// Applied unconditionally to createFile content, including content that
/// already contains real newlines. Note this also rewrites a genuine
/// backslash-n sequence.
pub fn normalize_newlines(content: &str) -> String {
    content.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_create_file() {
        let call = ToolCall::parse(
            "createFile",
            &json!({ "path": "x/y.md", "content": "hello" }),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::CreateFile {
                path: "x/y.md".into(),
                content: "hello".into()
            }
        );
    }

    #[test]
    fn test_parse_tell_user() {
        let call = ToolCall::parse("tellUser", &json!({ "message": "hi" })).unwrap();
        assert_eq!(call, ToolCall::TellUser { message: "hi".into() });
    }

    #[test]
    fn test_parse_unknown_tool_is_an_error() {
        let err = ToolCall::parse("deleteFile", &json!({ "path": "x" })).unwrap_err();
        assert!(matches!(err, crate::error::AppError::UnknownTool(name) if name == "deleteFile"));
    }

    #[test]
    fn test_parse_missing_argument_is_an_error() {
        let err = ToolCall::parse("createFile", &json!({ "path": "x" })).unwrap_err();
        assert!(matches!(err, crate::error::AppError::InvalidResponse(_)));
    }

    #[test]
    fn test_normalize_newlines_is_unconditional() {
        assert_eq!(normalize_newlines("a\\nb"), "a\nb");
        // Real newlines pass through, escapes are still replaced
        assert_eq!(normalize_newlines("a\nb\\nc"), "a\nb\nc");
    }

    #[test]
    fn test_declarations_pin_the_schema() {
        let decls = tool_declarations();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "createFile");
        assert_eq!(
            decls[0].parameters["required"],
            serde_json::json!(["path", "content"])
        );
        assert_eq!(decls[1].name, "tellUser");
        assert_eq!(decls[1].parameters["required"], serde_json::json!(["message"]));
    }
}
