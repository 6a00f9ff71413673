// GenerativeModel trait - backend-agnostic generative model interface

use async_trait::async_trait;
use serde_json::Value;

/// How the model is allowed to pick tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCallingMode {
    /// Model decides whether to call tools (the protocol's fixed choice)
    Auto,
    /// Plain generation, tools ignored
    None,
    /// Model must call a tool
    Any,
}

/// One declared callable tool, JSON-schema parameters included.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One piece of the user-turn payload.
#[derive(Debug, Clone)]
pub enum RequestPart {
    Text(String),
    /// Inline binary payload, already base64-encoded
    InlineAudio { mime_type: String, data: String },
}

/// A single request/response cycle's input.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: String,
    pub tools: Vec<FunctionDeclaration>,
    pub mode: FunctionCallingMode,
    pub parts: Vec<RequestPart>,
}

/// Decoded model output: candidates in listed order, each with content parts
/// in the order the model produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub parts: Vec<ResponsePart>,
}

/// A response part is either plain text or a function-call record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text(String),
    FunctionCall { name: String, args: Value },
}

/// Backend-agnostic generative model interface
///
/// This trait abstracts the hosted model backend, enabling swappable
/// implementations without modifying the protocol. The default
/// implementation is GeminiProvider, which calls the Gemini REST API.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one request and return the decoded response.
    ///
    /// # Arguments
    ///
    /// * `request` - Model id, system instruction, tool declarations and
    ///   the user-turn parts
    ///
    /// # Returns
    ///
    /// * `Ok(ModelResponse)` - Candidates with parts in response order
    /// * `Err(String)` - Error message if the request or decoding fails
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, String>;
}
