//! Provider abstractions for the external services the pipeline consumes
//!
//! Traits keep the retrieval and synthesis code independent of the concrete
//! vendors; the clients here speak the OpenAI, Pinecone, and Exa wire
//! formats respectively.

pub mod embedding;
pub mod exa;
pub mod llm;
pub mod openai;
pub mod pinecone;
pub mod vector_index;
pub mod web_search;

pub use embedding::EmbeddingProvider;
pub use exa::ExaClient;
pub use llm::LlmProvider;
pub use openai::{OpenAiEmbedder, OpenAiLlm};
pub use pinecone::PineconeClient;
pub use vector_index::{VectorIndexProvider, VectorMatch};
pub use web_search::{WebSearchHit, WebSearchProvider};
