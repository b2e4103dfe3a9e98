//! Decoding of uploaded containers into whisper's input format.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CODEC_TYPE_OPUS, CodecParameters, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::opus::{OPUS_SAMPLE_RATE, OpusDecoder};
use crate::whisper::resampler::{WHISPER_SAMPLE_RATE, mix_to_mono, resample_to_16khz};

/// Decodes the first audio track of `path` into 16kHz mono `f32` samples.
///
/// The file extension is used as a probe hint; the container is still sniffed,
/// so a mislabelled file decodes as long as symphonia recognizes it. Opus
/// tracks in ogg and webm are demuxed by symphonia and decoded with libopus.
pub fn decode_to_mono_16k(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| anyhow!("Unrecognized audio container: {e}"))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("No audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let (samples, sample_rate) = if codec_params.codec == CODEC_TYPE_OPUS {
        decode_opus_track(format.as_mut(), track_id, &codec_params)?
    } else {
        decode_track(format.as_mut(), track_id, &codec_params)?
    };

    if samples.is_empty() {
        return Err(anyhow!("No audio samples decoded"));
    }

    debug!(
        "Decoded {} samples at {}Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );

    resample_to_16khz(&samples, sample_rate)
}

fn decode_track(
    format: &mut dyn FormatReader,
    track_id: u32,
    codec_params: &CodecParameters,
) -> Result<(Vec<f32>, u32)> {
    let mut sample_rate = codec_params.sample_rate.unwrap_or(WHISPER_SAMPLE_RATE);

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|e| anyhow!("Unsupported audio codec: {e}"))?;

    let mut samples: Vec<f32> = Vec::new();

    while let Some(packet) = next_track_packet(format, track_id)? {
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(anyhow!("Failed to decode audio: {e}")),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(mix_to_mono(buffer.samples(), spec.channels.count()));
    }

    Ok((samples, sample_rate))
}

/// Opus always decodes at 48kHz; the container's pre-skip is dropped.
fn decode_opus_track(
    format: &mut dyn FormatReader,
    track_id: u32,
    codec_params: &CodecParameters,
) -> Result<(Vec<f32>, u32)> {
    let mut decoder = OpusDecoder::new()?;
    let mut samples: Vec<f32> = Vec::new();

    while let Some(packet) = next_track_packet(format, track_id)? {
        match decoder.decode_to_mono(&packet.data) {
            Ok(pcm) => samples.extend_from_slice(pcm),
            Err(e) => warn!("Skipping undecodable packet: {e:#}"),
        }
    }

    let pre_skip = (codec_params.delay.unwrap_or(0) as usize).min(samples.len());
    samples.drain(..pre_skip);

    Ok((samples, OPUS_SAMPLE_RATE))
}

/// Next packet of `track_id`, or `None` at the end of the stream.
fn next_track_packet(format: &mut dyn FormatReader, track_id: u32) -> Result<Option<Packet>> {
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None);
            }
            Err(SymphoniaError::ResetRequired) => return Ok(None),
            Err(e) => return Err(anyhow!("Failed to read audio packet: {e}")),
        };

        if packet.track_id() == track_id {
            return Ok(Some(packet));
        }
    }
}
