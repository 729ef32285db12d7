use super::decode::DecodedAudio;
use super::error::PlaybackError;
use super::state::LoopRange;
use std::sync::Arc;

/// A streaming media element pointed at a remote URL, supplied by the
/// rendering layer
pub trait MediaElement: Send {
    fn load(&mut self, url: &str);
    /// May be rejected by the platform (autoplay policy, network)
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Native playback clock in seconds
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// `None` until the metadata-loaded event has fired
    fn duration(&self) -> Option<f64>;
    fn ended(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    /// Drop the source and free network/decoder resources
    fn release(&mut self);
}

/// A one-shot playable node. It cannot be paused or restarted; playing
/// again means asking the output for a fresh node.
pub trait SourceNode: Send {
    fn stop(&mut self);
    /// Change native loop points on the live node (`None` turns looping off)
    fn set_loop(&mut self, range: Option<LoopRange>);
}

/// An audio execution context with a shared gain stage
pub trait AudioOutput: Send {
    /// Context clock in seconds; advances in real time while running
    fn current_time(&self) -> f64;
    fn start(
        &mut self,
        buffer: Arc<DecodedAudio>,
        offset: f64,
        looping: Option<LoopRange>,
    ) -> Box<dyn SourceNode>;
    fn set_gain(&mut self, gain: f32);
    /// Release the execution context
    fn close(&mut self);
}

/// Creates the native resources for one displayed article
pub trait AudioDevice: Send + Sync {
    fn create_media_element(&self) -> Box<dyn MediaElement>;
    fn create_output(&self) -> Box<dyn AudioOutput>;
}
