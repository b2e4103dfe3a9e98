use anyhow::Result;
use rubato::{Resampler, SincFixedIn, SincInterpolationType, WindowFunction};

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Resamples mono audio to whisper's 16kHz input rate.
pub fn resample_to_16khz(audio_data: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
    if sample_rate == WHISPER_SAMPLE_RATE {
        return Ok(audio_data.to_vec());
    }

    let frames = audio_data.len();
    if frames == 0 {
        return Err(anyhow::anyhow!("No audio frames to resample"));
    }

    let params = rubato::SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = WHISPER_SAMPLE_RATE as f64 / sample_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, frames, 1)?;

    let resampled = resampler.process(&[audio_data], None)?;
    let delay = resampler.output_delay();
    let expected_output_frames = (frames as f64 * resample_ratio) as usize;

    let channel = &resampled[0];
    let end_frame = (delay + expected_output_frames).min(channel.len());
    Ok(channel[delay.min(end_frame)..end_frame].to_vec())
}

/// Averages interleaved frames into a single channel.
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
