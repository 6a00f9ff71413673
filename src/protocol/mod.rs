// Protocol — the tool-calling response protocol
//
// One request/response cycle with the generative model configured for
// function calling, followed by ordered execution of any returned calls
// against the vault and notification collaborators.

pub mod tools;
pub mod dispatch;
pub mod processor;

pub use tools::{tool_declarations, ToolCall, SYSTEM_INSTRUCTION};
pub use dispatch::ToolDispatcher;
pub use processor::{ProcessOutcome, Processor, ProcessorConfig};
