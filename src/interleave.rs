//! Conversion between per-channel buffers and the interleaved layout wav files store.
use crate::error::{WaveError, WaveResult};

/// Interleaves equally sized channel buffers: `[[l0, l1], [r0, r1]]` becomes
/// `[l0, r0, l1, r1]`.
pub fn interleave<T: Copy, S: AsRef<[T]>>(channels: &[S]) -> WaveResult<Vec<T>> {
    let n_channels = channels.len();
    let samples_per_channel = match channels.first() {
        Some(first) => first.as_ref().len(),
        None => return Ok(Vec::new()),
    };

    if let Some(bad) = channels
        .iter()
        .position(|c| c.as_ref().len() != samples_per_channel)
    {
        return Err(WaveError::InvalidInterleave(format!(
            "channel {} has {} samples, expected {}",
            bad,
            channels[bad].as_ref().len(),
            samples_per_channel
        )));
    }

    let mut out = Vec::with_capacity(n_channels * samples_per_channel);
    for i in 0..samples_per_channel {
        for channel in channels {
            out.push(channel.as_ref()[i]);
        }
    }
    Ok(out)
}

/// Splits interleaved samples into `n_channels` buffers.
pub fn deinterleave<T: Copy>(data: &[T], n_channels: usize) -> WaveResult<Vec<Vec<T>>> {
    check_divisible(data.len(), n_channels)?;
    let samples_per_channel = data.len() / n_channels;

    let mut out: Vec<Vec<T>> = (0..n_channels)
        .map(|_| Vec::with_capacity(samples_per_channel))
        .collect();
    for frame in data.chunks_exact(n_channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    Ok(out)
}

/// In-place variant of [`interleave`] for channels stored back to back in one buffer.
pub fn interleave_in_place<T: Copy, A: AsMut<[T]>>(
    mut channel_split_data: A,
    n_channels: usize,
) -> WaveResult<()> {
    let data = channel_split_data.as_mut();
    check_divisible(data.len(), n_channels)?;
    let samples_per_channel = data.len() / n_channels;

    let temp = data.to_vec();
    for (c, channel) in temp.chunks(samples_per_channel.max(1)).enumerate() {
        for (i, &sample) in channel.iter().enumerate() {
            data[i * n_channels + c] = sample;
        }
    }
    Ok(())
}

/// In-place variant of [`deinterleave`]; leaves the channels back to back in `interleaved_data`.
pub fn deinterleave_in_place<T: Copy, A: AsMut<[T]>>(
    mut interleaved_data: A,
    n_channels: usize,
) -> WaveResult<()> {
    let data = interleaved_data.as_mut();
    check_divisible(data.len(), n_channels)?;
    let samples_per_channel = data.len() / n_channels;

    let temp = data.to_vec();
    for i in 0..samples_per_channel {
        for c in 0..n_channels {
            data[c * samples_per_channel + i] = temp[i * n_channels + c];
        }
    }
    Ok(())
}

fn check_divisible(len: usize, n_channels: usize) -> WaveResult<()> {
    if n_channels == 0 || len % n_channels != 0 {
        return Err(WaveError::InvalidInterleave(format!(
            "{} samples cannot be split across {} channels",
            len, n_channels
        )));
    }
    Ok(())
}
