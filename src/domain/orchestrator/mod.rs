pub mod fallback;
pub mod preload;

pub use fallback::FallbackOrchestrator;
pub use preload::{
    LanguageState, LanguageStateTable, PreloadCoordinator, PreloadEvent, PreloadEventKind,
    PreloadOptions, PreloadReport,
};
