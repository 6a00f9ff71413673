use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::Notify;

use crate::error::AppError;
use crate::intelligence::{
    FunctionCallingMode, GenerativeModel, ModelRequest, RequestPart,
};
use crate::notify::Notifier;
use crate::vault::Vault;

use super::dispatch::ToolDispatcher;
use super::tools::{tool_declarations, SYSTEM_INSTRUCTION};

/// Configuration for one processor instance, passed in explicitly — there is
/// no ambient settings state inside the protocol.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

/// Aggregated result of one request/response cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// One result string per executed tool call, in execution order
    pub tool_results: Vec<String>,
    /// The response's final text, if the model produced any
    pub final_text: Option<String>,
}

/// Drives one request/response cycle with the model configured for function
/// calling, and executes returned calls via the ToolDispatcher.
///
/// At most one request may be in flight: a second `process_*` call while one
/// is pending fails fast with `ConcurrentRequest`. Every failure is surfaced
/// as exactly one user-visible notification plus a logged detail, and the
/// typed result is returned to the caller as well.
pub struct Processor {
    model: Arc<dyn GenerativeModel>,
    config: ProcessorConfig,
    busy: AtomicBool,
    cancel: Notify,
}

impl Processor {
    pub fn new(model: Arc<dyn GenerativeModel>, config: ProcessorConfig) -> Self {
        Self {
            model,
            config,
            busy: AtomicBool::new(false),
            cancel: Notify::new(),
        }
    }

    /// Abort the in-flight request, if any. The pending `process_*` call
    /// returns `RequestCancelled` and the user sees a neutral cancel notice.
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    /// Process a recorded voice memo.
    ///
    /// The WAV bytes are base64-encoded as-is (every byte, original order,
    /// standard alphabet) and sent inline with MIME type `audio/wav`.
    pub async fn process_audio(
        &self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        wav_data: &[u8],
    ) -> Result<ProcessOutcome, AppError> {
        let part = RequestPart::InlineAudio {
            mime_type: "audio/wav".to_string(),
            data: STANDARD.encode(wav_data),
        };
        self.process(vault, notifier, vec![part]).await
    }

    /// Process the freeform composer's submitted text lines.
    pub async fn process_list(
        &self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        lines: Vec<String>,
    ) -> Result<ProcessOutcome, AppError> {
        let part = RequestPart::Text(list_prompt(&lines));
        self.process(vault, notifier, vec![part]).await
    }

    /// Single top-level boundary: runs the cycle and converts any error into
    /// one user-visible notification plus a logged detail. A user-initiated
    /// cancel gets a neutral notice, not the retry prompt.
    async fn process(
        &self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        parts: Vec<RequestPart>,
    ) -> Result<ProcessOutcome, AppError> {
        let result = self.run(vault, notifier, parts).await;

        match &result {
            Ok(outcome) => {
                eprintln!(
                    "Protocol: Completed with {} tool result(s)",
                    outcome.tool_results.len()
                );
                if let Some(text) = &outcome.final_text {
                    notifier.notify(text);
                }
            }
            Err(AppError::RequestCancelled) => {
                eprintln!("Protocol: Request cancelled by the user");
                notifier.notify("Request cancelled.");
            }
            Err(e) => {
                eprintln!("Protocol: Processing failed: {}", e);
                notifier.notify("Processing failed. Please try again.");
            }
        }

        result
    }

    async fn run(
        &self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        parts: Vec<RequestPart>,
    ) -> Result<ProcessOutcome, AppError> {
        if self.config.api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::ConcurrentRequest);
        }
        let _busy = BusyGuard(&self.busy);

        self.request_and_dispatch(vault, notifier, parts).await
    }

    async fn request_and_dispatch(
        &self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        parts: Vec<RequestPart>,
    ) -> Result<ProcessOutcome, AppError> {
        let request = ModelRequest {
            model: self.config.model.clone(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            tools: tool_declarations(),
            mode: FunctionCallingMode::Auto,
            parts,
        };

        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let response = tokio::select! {
            outcome = tokio::time::timeout(timeout, self.model.generate(&request)) => {
                match outcome {
                    Ok(Ok(response)) => response,
                    Ok(Err(e)) => return Err(AppError::RequestFailed(e)),
                    Err(_) => return Err(AppError::RequestTimeout),
                }
            }
            _ = self.cancel.notified() => {
                return Err(AppError::RequestCancelled);
            }
        };

        let dispatcher = ToolDispatcher::new(vault, notifier);
        let (tool_results, final_text) = dispatcher.dispatch(&response).await?;

        Ok(ProcessOutcome {
            tool_results,
            final_text,
        })
    }
}

/// Clears the busy flag when the request finishes, including when the
/// in-flight future is dropped before completion (e.g. by an outer select
/// or timeout).
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Serialize the composer's lines into the list prompt.
fn list_prompt(lines: &[String]) -> String {
    format!(
        "Here is a list of items:\n{}\n\nGenerate a response based on this list:",
        lines.join("\n")
    )
}
