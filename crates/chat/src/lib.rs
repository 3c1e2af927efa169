//! Chat orchestration: prompt assembly and completion dispatch.
//!
//! Two pieces live here. [`PromptBuilder`] turns a question plus a record
//! snapshot into a grounded system/user prompt pair. [`CompletionGateway`]
//! sends the assembled conversation to the configured provider and folds
//! every outcome into a single [`ProviderResult`] shape for the HTTP layer.

pub mod gateway;
pub mod prompt;

pub use gateway::CompletionGateway;
pub use prompt::{Prompt, PromptBuilder};
