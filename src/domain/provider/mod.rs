pub mod error;
pub mod handler;
pub mod prompts;
pub mod settings;
pub mod text;

pub use error::{is_quota_message, ProviderError};
pub use handler::{HandlerFactory, ProviderHandler, SpeechResult, WordDefinition};
pub use settings::{ApiSettings, Credentials, ProviderId, RemoteCredential};
