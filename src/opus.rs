use anyhow::{Result, anyhow};
use audiopus::coder::Decoder;
use audiopus::packet::Packet;
use audiopus::{Channels, MutSignals, SampleRate};

pub const OPUS_SAMPLE_RATE: u32 = 48000;

/// 120 ms at 48kHz, the longest frame a single Opus packet can carry.
const MAX_FRAME_SAMPLES: usize = 5760;

/// libopus decoder that downmixes every stream to 48kHz mono.
pub struct OpusDecoder {
    decoder: Decoder,
    buffer: Vec<f32>,
}

impl OpusDecoder {
    pub fn new() -> Result<Self> {
        let decoder = Decoder::new(SampleRate::Hz48000, Channels::Mono)
            .map_err(|e| anyhow!("Failed to create Opus decoder: {}", e))?;
        Ok(Self {
            decoder,
            buffer: vec![0.0; MAX_FRAME_SAMPLES],
        })
    }

    pub fn decode_to_mono(&mut self, payload: &[u8]) -> Result<&[f32]> {
        let packet = Packet::try_from(payload).map_err(|e| anyhow!("Invalid Opus packet: {}", e))?;
        let signals = MutSignals::try_from(&mut self.buffer[..])
            .map_err(|e| anyhow!("Invalid Opus output buffer: {}", e))?;
        let frames = self
            .decoder
            .decode_float(Some(packet), signals, false)
            .map_err(|e| anyhow!("Opus decode failed: {}", e))?;
        Ok(&self.buffer[..frames])
    }
}
