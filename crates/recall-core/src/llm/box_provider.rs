//! Owned, type-erased handle around any [`LlmProvider`].
//!
//! `LlmProvider::complete` returns `impl Future`, which rules out
//! `dyn LlmProvider`. [`ErasedProvider`] re-exposes the same surface with a
//! pinned, boxed future and is implemented for every provider, so the
//! completion client can hold whichever backend the config selected.

use std::future::Future;
use std::pin::Pin;

use recall_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

use super::provider::LlmProvider;

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Dyn-compatible mirror of [`LlmProvider`].
pub trait ErasedProvider: Send + Sync {
    fn erased_name(&self) -> &str;
    fn erased_default_model(&self) -> &str;
    fn erased_capabilities(&self) -> &ProviderCapabilities;
    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<P: LlmProvider> ErasedProvider for P {
    fn erased_name(&self) -> &str {
        self.name()
    }

    fn erased_default_model(&self) -> &str {
        self.default_model()
    }

    fn erased_capabilities(&self) -> &ProviderCapabilities {
        self.capabilities()
    }

    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }
}

pub struct BoxLlmProvider(Box<dyn ErasedProvider>);

impl BoxLlmProvider {
    pub fn new<P: LlmProvider + 'static>(provider: P) -> Self {
        Self(Box::new(provider))
    }

    pub fn name(&self) -> &str {
        self.0.erased_name()
    }

    pub fn default_model(&self) -> &str {
        self.0.erased_default_model()
    }

    /// Consulted per request: output ceiling and reasoning-trace handling.
    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.0.erased_capabilities()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.0.erased_complete(request).await
    }
}

impl std::fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxLlmProvider")
            .field("name", &self.name())
            .field("default_model", &self.default_model())
            .finish()
    }
}
