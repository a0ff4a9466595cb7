pub mod audio_capture;
pub mod capture_loop;
pub mod config;
pub mod prelude;
pub mod ring_buffer;
pub mod rolling_translator;
pub mod snapshot;
pub mod trigger;
pub mod ui;
pub mod upload;

// Re-export key components for easier access
pub use audio_capture::AudioCapture;
pub use config::read_app_config;
pub use ring_buffer::RingBuffer;
pub use rolling_translator::RollingTranslator;
pub use snapshot::SnapshotEncoder;
pub use upload::UploadClient;
