// Library interface for jorfscope modules
// This allows tests and other binaries to import modules

pub mod llm;
pub mod ingestion;
pub mod relevance;
pub mod digest;
pub mod notify;
pub mod pipeline;
