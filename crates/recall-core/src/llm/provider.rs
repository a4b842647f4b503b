//! The seam between the completion client and a concrete backend.

use recall_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// A chat-completions backend. The only implementation in the workspace is
/// `recall_infra::llm::OpenAiCompatibleProvider`; tests script their own.
pub trait LlmProvider: Send + Sync {
    /// Label for logs and spans, e.g. "cerebras".
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn default_model(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    /// One non-streaming call. Transport and API failures map into [`LlmError`].
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
