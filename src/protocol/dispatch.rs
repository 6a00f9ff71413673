use crate::error::AppError;
use crate::intelligence::{ModelResponse, ResponsePart};
use crate::notify::Notifier;
use crate::vault::Vault;

use super::tools::{normalize_newlines, ToolCall};

/// Executes a response's tool calls against the vault and notification
/// collaborators.
///
/// Calls run strictly in the order they appear: parts within a candidate,
/// candidates in the order they are listed. Each call is awaited before the
/// next starts; there is no parallelism and no rollback, so the effects of
/// calls executed before a failure remain in place.
pub struct ToolDispatcher<'a> {
    vault: &'a dyn Vault,
    notifier: &'a dyn Notifier,
}

impl<'a> ToolDispatcher<'a> {
    pub fn new(vault: &'a dyn Vault, notifier: &'a dyn Notifier) -> Self {
        Self { vault, notifier }
    }

    /// Walk the response, executing every function-call part and collecting
    /// text parts.
    ///
    /// # Returns
    ///
    /// Tool result strings (one per executed call, in execution order) and
    /// the response's text, if any.
    ///
    /// # Errors
    ///
    /// The first unknown tool or failed execution aborts remaining dispatch.
    pub async fn dispatch(
        &self,
        response: &ModelResponse,
    ) -> Result<(Vec<String>, Option<String>), AppError> {
        let mut results = Vec::new();
        let mut text_parts: Vec<&str> = Vec::new();

        for candidate in &response.candidates {
            for part in &candidate.parts {
                match part {
                    ResponsePart::Text(text) => text_parts.push(text),
                    ResponsePart::FunctionCall { name, args } => {
                        // Parse and execute immediately so calls listed before
                        // an unknown name have already taken effect.
                        let call = ToolCall::parse(name, args)?;
                        let result = self.execute(call).await?;
                        results.push(result);
                    }
                }
            }
        }

        let final_text = if text_parts.is_empty() {
            None
        } else {
            Some(text_parts.join("\n"))
        };

        Ok((results, final_text))
    }

    async fn execute(&self, call: ToolCall) -> Result<String, AppError> {
        eprintln!("Protocol: Executing {}", call.name());
        match call {
            ToolCall::CreateFile { path, content } => self.create_file(&path, &content).await,
            ToolCall::TellUser { message } => {
                // Fire-and-forget; returns immediately
                self.notifier.notify(&message);
                Ok(format!("Told user: {}", message))
            }
        }
    }

    /// Create the target's parent folder if absent, then write the file.
    ///
    /// Last write wins: writing the same path twice leaves exactly the final
    /// content.
    async fn create_file(&self, path: &str, content: &str) -> Result<String, AppError> {
        let content = normalize_newlines(content);

        if let Some((parent, _)) = path.rsplit_once('/') {
            let parent_exists = self
                .vault
                .exists(parent)
                .await
                .map_err(AppError::FileIO)?;
            if !parent_exists {
                self.vault
                    .create_folder(parent)
                    .await
                    .map_err(AppError::FileIO)?;
            }
        }

        self.vault
            .write(path, &content)
            .await
            .map_err(AppError::FileIO)?;

        Ok(format!("Created file {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::Candidate;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory vault that records every operation in order.
    #[derive(Default)]
    struct MemoryVault {
        files: Mutex<BTreeMap<String, String>>,
        folders: Mutex<Vec<String>>,
        ops: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Vault for MemoryVault {
        async fn exists(&self, path: &str) -> Result<bool, String> {
            Ok(self.folders.lock().unwrap().iter().any(|f| f == path)
                || self.files.lock().unwrap().contains_key(path))
        }

        async fn create_folder(&self, path: &str) -> Result<(), String> {
            self.ops.lock().unwrap().push(format!("mkdir {}", path));
            self.folders.lock().unwrap().push(path.to_string());
            Ok(())
        }

        async fn write(&self, path: &str, content: &str) -> Result<(), String> {
            self.ops.lock().unwrap().push(format!("write {}", path));
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for MemoryNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn function_call(name: &str, args: serde_json::Value) -> ResponsePart {
        ResponsePart::FunctionCall {
            name: name.to_string(),
            args,
        }
    }

    fn response_with(parts: Vec<ResponsePart>) -> ModelResponse {
        ModelResponse {
            candidates: vec![Candidate { parts }],
        }
    }

    #[tokio::test]
    async fn test_tell_user_then_create_file_in_order() {
        let vault = MemoryVault::default();
        let notifier = MemoryNotifier::default();
        let dispatcher = ToolDispatcher::new(&vault, &notifier);

        let response = response_with(vec![
            function_call("tellUser", json!({ "message": "A" })),
            function_call(
                "createFile",
                json!({ "path": "x/y.md", "content": "line1\\nline2" }),
            ),
        ]);

        let (results, final_text) = dispatcher.dispatch(&response).await.unwrap();

        // Notification happened, and before the file write
        assert_eq!(*notifier.messages.lock().unwrap(), vec!["A"]);
        assert_eq!(results.len(), 2);
        assert!(final_text.is_none());

        // Folder x was created because it was absent
        assert_eq!(
            *vault.ops.lock().unwrap(),
            vec!["mkdir x", "write x/y.md"]
        );

        // Escaped newline converted to a real one
        assert_eq!(
            vault.files.lock().unwrap().get("x/y.md").unwrap(),
            "line1\nline2"
        );
    }

    #[tokio::test]
    async fn test_existing_folder_is_not_recreated() {
        let vault = MemoryVault::default();
        vault.folders.lock().unwrap().push("x".to_string());
        let notifier = MemoryNotifier::default();
        let dispatcher = ToolDispatcher::new(&vault, &notifier);

        let response = response_with(vec![function_call(
            "createFile",
            json!({ "path": "x/y.md", "content": "hi" }),
        )]);

        dispatcher.dispatch(&response).await.unwrap();
        assert_eq!(*vault.ops.lock().unwrap(), vec!["write x/y.md"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_aborts_but_earlier_calls_took_effect() {
        let vault = MemoryVault::default();
        let notifier = MemoryNotifier::default();
        let dispatcher = ToolDispatcher::new(&vault, &notifier);

        let response = response_with(vec![
            function_call("tellUser", json!({ "message": "first" })),
            function_call("deleteFile", json!({ "path": "x/y.md" })),
            function_call("tellUser", json!({ "message": "never" })),
        ]);

        let err = dispatcher.dispatch(&response).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownTool(name) if name == "deleteFile"));

        // The call before the unknown one already executed; the one after did not
        assert_eq!(*notifier.messages.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_create_file_twice_is_last_write_wins() {
        let vault = MemoryVault::default();
        let notifier = MemoryNotifier::default();
        let dispatcher = ToolDispatcher::new(&vault, &notifier);

        let response = response_with(vec![
            function_call("createFile", json!({ "path": "note.md", "content": "v1" })),
            function_call("createFile", json!({ "path": "note.md", "content": "v2" })),
        ]);

        dispatcher.dispatch(&response).await.unwrap();
        assert_eq!(vault.files.lock().unwrap().get("note.md").unwrap(), "v2");
        assert_eq!(vault.files.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_calls_execute_across_candidates_in_listed_order() {
        let vault = MemoryVault::default();
        let notifier = MemoryNotifier::default();
        let dispatcher = ToolDispatcher::new(&vault, &notifier);

        let response = ModelResponse {
            candidates: vec![
                Candidate {
                    parts: vec![function_call("tellUser", json!({ "message": "one" }))],
                },
                Candidate {
                    parts: vec![
                        ResponsePart::Text("all done".to_string()),
                        function_call("tellUser", json!({ "message": "two" })),
                    ],
                },
            ],
        };

        let (results, final_text) = dispatcher.dispatch(&response).await.unwrap();
        assert_eq!(*notifier.messages.lock().unwrap(), vec!["one", "two"]);
        assert_eq!(results.len(), 2);
        assert_eq!(final_text.as_deref(), Some("all done"));
    }
}
