// Intelligence module - generative model backends for the tool protocol

pub mod provider;
pub mod gemini_provider;

pub use provider::{
    Candidate, FunctionCallingMode, FunctionDeclaration, GenerativeModel, ModelRequest,
    ModelResponse, RequestPart, ResponsePart,
};
pub use gemini_provider::GeminiProvider;
