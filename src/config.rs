use serde::{Deserialize, Serialize};

/// Fixed PCM layout used for capture and for the snapshot container.
///
/// The backend expects 16-bit integer samples, so the sample width is not
/// configurable; the remaining fields default to the layout the capture
/// pipeline was built for (stereo, 48 kHz, 1024 samples per read).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Number of interleaved channels per frame
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Samples read from the device per call, per channel
    pub frame_size: usize,
}

impl AudioConfig {
    /// Width of one sample in bytes (fixed 16-bit PCM)
    pub const SAMPLE_WIDTH: u16 = 2;

    /// Total number of interleaved samples in one frame
    pub fn samples_per_frame(&self) -> usize {
        self.frame_size * self.channels as usize
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48_000,
            frame_size: 1024,
        }
    }
}

/// Configuration for the trigger keys read from stdin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Key that freezes the rolling window and sends it for translation
    pub snapshot: char,
    /// Key that exits the application
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            snapshot: '-',
            quit: 'q',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// PCM layout for capture and snapshots
    pub audio: AudioConfig,
    /// Length of the rolling capture window in seconds
    pub window_seconds: u32,
    /// URL of the transcription/translation backend
    pub endpoint_url: String,
    /// Language the captured speech is in
    pub source_language: String,
    /// Language the backend should translate into
    pub target_language: String,
    /// Minimum time between two snapshot triggers, in milliseconds
    pub debounce_ms: u64,
    /// Delay between revealed words when animating a result, in milliseconds
    pub reveal_interval_ms: u64,
    /// Trigger key bindings
    pub keys: KeyBindings,
}

impl AppConfig {
    /// Number of frames the rolling window holds.
    ///
    /// Rounded up so the window covers at least `window_seconds` of audio.
    pub fn ring_capacity(&self) -> usize {
        let frames_per_second = self.audio.sample_rate as f64 / self.audio.frame_size as f64;
        (frames_per_second * self.window_seconds as f64).ceil() as usize
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            window_seconds: 20,
            endpoint_url: "http://localhost:8000/upload".to_string(),
            source_language: "sv".to_string(),
            target_language: "en".to_string(),
            debounce_ms: 1000,
            reveal_interval_ms: 200,
            keys: KeyBindings::default(),
        }
    }
}

/// Helper function to read the application configuration
pub fn read_app_config() -> AppConfig {
    match std::fs::read_to_string("config.json") {
        Ok(config_str) => match serde_json::from_str(&config_str) {
            Ok(config) => config,
            Err(e) => {
                println!(
                    "Failed to parse config.json: {}. Using default configuration.",
                    e
                );
                AppConfig::default()
            }
        },
        Err(e) => {
            println!(
                "Failed to read config.json: {}. Using default configuration.",
                e
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_capacity_rounds_up() {
        // 48000 / 1024 * 20 = 937.5, so the window needs 938 frames
        let config = AppConfig::default();
        assert_eq!(config.ring_capacity(), 938);
    }

    #[test]
    fn ring_capacity_exact_division() {
        let config = AppConfig {
            audio: AudioConfig {
                channels: 1,
                sample_rate: 16_000,
                frame_size: 1000,
            },
            window_seconds: 10,
            ..AppConfig::default()
        };
        assert_eq!(config.ring_capacity(), 160);
    }
}
