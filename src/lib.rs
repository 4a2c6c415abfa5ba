//! # quillmate
//!
//! A creative-writing assistant service. Five fixed prompt templates
//! (generate, expand, analyze, enhance, mimic) are filled from request
//! fields and forwarded to a hosted chat-completion API; an uploaded
//! document provides the "style sample" that the rewrite templates quote.
//!
//! ## Architecture
//!
//! - **Prompt formatter** (`prompt`): template substitution, sample excerpting
//! - **Provider adapter** (`llm`): blocking Groq chat-completions client
//! - **Ingestion** (`ingest`): .txt/.pdf upload, text extraction, sample capture
//! - **Style index** (`index`): optional HNSW retrieval over the sample
//! - **HTTP surface** (`server`): axum router behind one boundary error mapper
//! - **PDF export** (`export`): renders output text to a downloadable PDF
//!
//! ## Library usage
//!
//! ```no_run
//! use quillmate::llm::{CompletionBackend, GroqClient, GroqConfig};
//! use quillmate::prompt;
//!
//! let client = GroqClient::new(GroqConfig::from_env());
//! let p = prompt::generate_prompt("Story", "noir", "tense", "It was raining.");
//! let output = client.complete(&p).unwrap();
//! println!("{output}");
//! ```

pub mod error;
pub mod export;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod paths;
pub mod prompt;
pub mod sample;
pub mod server;
