use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::AudioConfig;
use crate::ring_buffer::Frame;

/// Serializes a frozen frame sequence into a self-describing WAV container.
///
/// The header carries the channel count, sample width and sample rate; the
/// payload is the frame bytes concatenated in temporal order. The resulting
/// byte block is the exact unit handed to the upload client.
#[derive(Debug, Clone)]
pub struct SnapshotEncoder {
    spec: WavSpec,
}

impl SnapshotEncoder {
    pub fn new(audio: &AudioConfig) -> Self {
        Self {
            spec: WavSpec {
                channels: audio.channels,
                sample_rate: audio.sample_rate,
                bits_per_sample: AudioConfig::SAMPLE_WIDTH * 8,
                sample_format: SampleFormat::Int,
            },
        }
    }

    /// Encodes the frames into an in-memory WAV container
    pub fn encode(&self, frames: &[Frame]) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buffer, self.spec)
                .context("Failed to create WAV writer")?;
            for frame in frames {
                for &sample in frame {
                    writer
                        .write_sample(sample)
                        .context("Failed to write sample")?;
                }
            }
            writer.finalize().context("Failed to finalize WAV")?;
        }
        Ok(buffer.into_inner())
    }

    /// Writes the encoded container to a transient clip file.
    ///
    /// The file only exists for the duration of one upload and is removed by
    /// the dispatch task once the request resolves.
    pub fn write_clip(&self, wav_bytes: &[u8], dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("clip_{}.wav", chrono::Utc::now().timestamp_millis()));
        std::fs::write(&path, wav_bytes)
            .with_context(|| format!("Failed to write clip file {:?}", path))?;
        Ok(path)
    }
}

/// Removes a clip file, logging instead of failing: a leftover clip must not
/// take the dispatch result down with it.
pub fn remove_clip(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        eprintln!("Failed to remove clip file {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    fn encoder() -> SnapshotEncoder {
        SnapshotEncoder::new(&AudioConfig {
            channels: 2,
            sample_rate: 48_000,
            frame_size: 4,
        })
    }

    #[test]
    fn round_trip_preserves_samples_and_format() {
        let frames: Vec<Frame> = vec![vec![1, -2, 3, -4, 5, -6, 7, -8], vec![9, 10, 11, 12, 13, 14, 15, 16]];
        let wav = encoder().encode(&frames).unwrap();

        let mut reader = WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, SampleFormat::Int);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        let expected: Vec<i16> = frames.into_iter().flatten().collect();
        assert_eq!(samples, expected);
    }

    #[test]
    fn empty_window_still_encodes_a_valid_header() {
        let wav = encoder().encode(&[]).unwrap();
        let reader = WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn clip_file_is_written_then_removed() {
        let dir = tempfile::tempdir().unwrap();
        let wav = encoder().encode(&[vec![0i16; 8]]).unwrap();

        let path = encoder().write_clip(&wav, dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), wav);

        remove_clip(&path);
        assert!(!path.exists());
    }
}
