pub mod deepseek;
pub mod factory;
pub mod gemini;
pub mod openai;
pub mod openai_compat;
pub mod payload;

pub use deepseek::DeepSeekHandler;
pub use factory::DefaultHandlerFactory;
pub use gemini::GeminiHandler;
pub use openai::OpenAiHandler;
