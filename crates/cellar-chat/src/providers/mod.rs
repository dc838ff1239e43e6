//! Client boundaries for the external retrieval and completion engines

pub mod completion;
pub mod ollama;
pub mod retrieval;
pub mod search_api;

pub use completion::CompletionClient;
pub use ollama::OllamaCompletion;
pub use retrieval::RetrievalClient;
pub use search_api::SearchApiClient;
