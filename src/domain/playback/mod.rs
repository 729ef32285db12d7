pub mod backend;
pub mod buffered;
pub mod clock;
pub mod decode;
pub mod error;
pub mod native;
pub mod state;
pub mod streamed;

pub use backend::PlaybackBackend;
pub use clock::{ClockSnapshot, PlaybackSession, SyncClock, FRAME_INTERVAL};
pub use decode::{decode_narration, decode_narration_async, DecodedAudio};
pub use error::PlaybackError;
pub use native::{AudioDevice, AudioOutput, MediaElement, SourceNode};
pub use state::{EngineKind, LoopRange, PlaybackState};
