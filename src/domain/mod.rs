pub mod alignment;
pub mod article;
pub mod language;
pub mod orchestrator;
pub mod playback;
pub mod provider;
pub mod vocabulary;
