//! The document-retrieval boundary.
//!
//! The concrete vector/keyword engines live outside this repository; the
//! orchestrator consumes them through [`ContextRetriever`]. Each method
//! returns a finite sequence whose order reflects relevance ranking and is
//! preserved into the prompt. [`StaticRetriever`] is the deterministic
//! in-memory implementation used in development and tests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct EventSnippet {
    pub content: String,
    pub additional_info: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LobSnippet {
    pub content: String,
    pub metadata: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DomainSnippet {
    pub content: String,
    pub platform: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiDocSnippet {
    pub content: String,
}

/// The snippets retrieved for one request, tagged by which strategy
/// produced them.
#[derive(Clone, Debug, PartialEq)]
pub enum RetrievedDocs {
    Event(Vec<EventSnippet>),
    Lob(Vec<LobSnippet>),
    Domain(Vec<DomainSnippet>),
    ApiDocs(Vec<ApiDocSnippet>),
}

impl RetrievedDocs {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Event(snippets) => snippets.is_empty(),
            Self::Lob(snippets) => snippets.is_empty(),
            Self::Domain(snippets) => snippets.is_empty(),
            Self::ApiDocs(snippets) => snippets.is_empty(),
        }
    }

    /// Ranked snippets rendered for prompt embedding, one line each, in
    /// retrieval order.
    pub fn render(&self) -> String {
        let lines: Vec<String> = match self {
            Self::Event(snippets) => snippets
                .iter()
                .map(|snippet| match &snippet.additional_info {
                    Some(info) => format!("- {} ({info})", snippet.content),
                    None => format!("- {}", snippet.content),
                })
                .collect(),
            Self::Lob(snippets) => {
                snippets.iter().map(|snippet| format!("- {}", snippet.content)).collect()
            }
            Self::Domain(snippets) => snippets
                .iter()
                .map(|snippet| match &snippet.platform {
                    Some(platform) => format!("- [{platform}] {}", snippet.content),
                    None => format!("- {}", snippet.content),
                })
                .collect(),
            Self::ApiDocs(snippets) => {
                snippets.iter().map(|snippet| format!("- {}", snippet.content)).collect()
            }
        };
        lines.join("\n")
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve_event_info(&self, query: &str) -> Result<Vec<EventSnippet>, RetrievalError>;
    async fn retrieve_lob_info(&self, query: &str) -> Result<Vec<LobSnippet>, RetrievalError>;
    async fn retrieve_domain_info(&self, query: &str)
        -> Result<Vec<DomainSnippet>, RetrievalError>;
    async fn retrieve_api_docs(
        &self,
        query: &str,
        platform_names: &[String],
    ) -> Result<Vec<ApiDocSnippet>, RetrievalError>;
}

/// Fixed in-memory corpus; answers every query with the configured snippets.
#[derive(Clone, Debug, Default)]
pub struct StaticRetriever {
    event: Vec<EventSnippet>,
    lob: Vec<LobSnippet>,
    domain: Vec<DomainSnippet>,
    api_docs: Vec<ApiDocSnippet>,
}

impl StaticRetriever {
    pub fn with_event_docs(mut self, snippets: Vec<EventSnippet>) -> Self {
        self.event = snippets;
        self
    }

    pub fn with_lob_docs(mut self, snippets: Vec<LobSnippet>) -> Self {
        self.lob = snippets;
        self
    }

    pub fn with_domain_docs(mut self, snippets: Vec<DomainSnippet>) -> Self {
        self.domain = snippets;
        self
    }

    pub fn with_api_docs(mut self, snippets: Vec<ApiDocSnippet>) -> Self {
        self.api_docs = snippets;
        self
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve_event_info(&self, _query: &str) -> Result<Vec<EventSnippet>, RetrievalError> {
        Ok(self.event.clone())
    }

    async fn retrieve_lob_info(&self, _query: &str) -> Result<Vec<LobSnippet>, RetrievalError> {
        Ok(self.lob.clone())
    }

    async fn retrieve_domain_info(
        &self,
        _query: &str,
    ) -> Result<Vec<DomainSnippet>, RetrievalError> {
        Ok(self.domain.clone())
    }

    async fn retrieve_api_docs(
        &self,
        _query: &str,
        _platform_names: &[String],
    ) -> Result<Vec<ApiDocSnippet>, RetrievalError> {
        Ok(self.api_docs.clone())
    }
}
