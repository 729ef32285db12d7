use polyglot_reader::domain::playback::{
    AudioDevice, AudioOutput, DecodedAudio, LoopRange, MediaElement, PlaybackError, SourceNode,
};
use std::sync::{Arc, Mutex};

/// Everything the fake device records, plus the clocks tests move by hand
#[derive(Debug, Default)]
pub struct DeviceState {
    pub output_clock: f64,
    pub outputs_created: usize,
    pub outputs_closed: usize,
    pub node_starts: Vec<(f64, Option<LoopRange>)>,
    pub node_stops: usize,
    pub gain: f32,

    pub elements_created: usize,
    pub elements_released: usize,
    pub loaded_url: Option<String>,
    pub element_time: f64,
    /// Stays `None` until a test fires the metadata event
    pub element_duration: Option<f64>,
    pub element_playing: bool,
    pub reject_play: bool,
}

#[derive(Clone, Default)]
pub struct FakeDevice {
    pub state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        state.output_clock += seconds;
        if state.element_playing {
            state.element_time += seconds;
        }
    }

    pub fn metadata_loaded(&self, duration: f64) {
        self.state.lock().unwrap().element_duration = Some(duration);
    }

    pub fn with<T>(&self, read: impl FnOnce(&DeviceState) -> T) -> T {
        read(&self.state.lock().unwrap())
    }
}

impl AudioDevice for FakeDevice {
    fn create_media_element(&self) -> Box<dyn MediaElement> {
        self.state.lock().unwrap().elements_created += 1;
        Box::new(FakeElement(self.state.clone()))
    }

    fn create_output(&self) -> Box<dyn AudioOutput> {
        self.state.lock().unwrap().outputs_created += 1;
        Box::new(FakeOutput(self.state.clone()))
    }
}

struct FakeElement(Arc<Mutex<DeviceState>>);

impl MediaElement for FakeElement {
    fn load(&mut self, url: &str) {
        self.0.lock().unwrap().loaded_url = Some(url.to_string());
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.0.lock().unwrap();
        if state.reject_play {
            return Err(PlaybackError::Backend("play() was rejected".to_string()));
        }
        state.element_playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.lock().unwrap().element_playing = false;
    }

    fn current_time(&self) -> f64 {
        self.0.lock().unwrap().element_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.0.lock().unwrap().element_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.0.lock().unwrap().element_duration
    }

    fn ended(&self) -> bool {
        let state = self.0.lock().unwrap();
        state
            .element_duration
            .is_some_and(|duration| state.element_time >= duration)
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn release(&mut self) {
        self.0.lock().unwrap().elements_released += 1;
    }
}

struct FakeOutput(Arc<Mutex<DeviceState>>);

impl AudioOutput for FakeOutput {
    fn current_time(&self) -> f64 {
        self.0.lock().unwrap().output_clock
    }

    fn start(
        &mut self,
        _buffer: Arc<DecodedAudio>,
        offset: f64,
        looping: Option<LoopRange>,
    ) -> Box<dyn SourceNode> {
        self.0.lock().unwrap().node_starts.push((offset, looping));
        Box::new(FakeNode(self.0.clone()))
    }

    fn set_gain(&mut self, gain: f32) {
        self.0.lock().unwrap().gain = gain;
    }

    fn close(&mut self) {
        self.0.lock().unwrap().outputs_closed += 1;
    }
}

struct FakeNode(Arc<Mutex<DeviceState>>);

impl SourceNode for FakeNode {
    fn stop(&mut self) {
        self.0.lock().unwrap().node_stops += 1;
    }

    fn set_loop(&mut self, _range: Option<LoopRange>) {}
}
