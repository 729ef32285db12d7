use super::error::PlaybackError;
use crate::domain::article::{AudioEncoding, InlineAudio, PCM_SAMPLE_RATE};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Fully decoded narration, interleaved `f32` samples in `[-1, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }
}

/// Decode an inline narration payload
pub fn decode_narration(audio: &InlineAudio) -> Result<DecodedAudio, PlaybackError> {
    let bytes = STANDARD
        .decode(audio.data.trim())
        .map_err(|e| PlaybackError::InvalidPayload(format!("base64: {}", e)))?;

    let decoded = match audio.encoding {
        AudioEncoding::Pcm => decode_pcm16(&bytes),
        AudioEncoding::Mp3 => decode_container(bytes, "mp3")?,
        AudioEncoding::Wav => decode_container(bytes, "wav")?,
    };

    tracing::debug!(
        encoding = %audio.encoding,
        sample_rate = decoded.sample_rate,
        channels = decoded.channels,
        duration_secs = decoded.duration(),
        "Narration decoded"
    );

    Ok(decoded)
}

/// Decode off the async runtime; decoding a long article takes a while
pub async fn decode_narration_async(audio: InlineAudio) -> Result<DecodedAudio, PlaybackError> {
    tokio::task::spawn_blocking(move || decode_narration(&audio))
        .await
        .map_err(|e| PlaybackError::Backend(format!("decode task failed: {}", e)))?
}

/// Raw 16-bit little-endian mono PCM at 24 kHz. A trailing odd byte is ignored.
pub fn decode_pcm16(bytes: &[u8]) -> DecodedAudio {
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    DecodedAudio {
        samples,
        sample_rate: PCM_SAMPLE_RATE,
        channels: 1,
    }
}

fn decode_container(bytes: Vec<u8>, extension: &str) -> Result<DecodedAudio, PlaybackError> {
    let cursor = std::io::Cursor::new(bytes);
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("unrecognized {} container: {}", extension, e)))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PlaybackError::Decode("no audio track".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("no decoder: {}", e)))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // Corrupt frame: skip it and keep going
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = e, "Skipping undecodable packet");
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(PlaybackError::Decode("no audio frames decoded".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}
