pub mod reader;
pub mod vocabulary;

pub use reader::{ArticleReaderController, ReaderView};
pub use vocabulary::VocabularyController;
