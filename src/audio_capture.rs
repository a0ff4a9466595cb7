use portaudio as pa;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AudioConfig;
use crate::ring_buffer::Frame;

/// Errors a frame source can report to the capture loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The device dropped data; the caller should substitute a best-effort
    /// frame and keep going
    Overflow,
    /// The stream is gone; no more frames will arrive
    Disconnected,
}

/// Blocking, one-frame-at-a-time view of an audio input.
///
/// The capture loop consumes frames through this trait so it can be driven
/// by a scripted source in tests.
pub trait FrameSource: Send {
    /// Blocks until the next frame is available
    fn read_frame(&mut self) -> Result<Frame, ReadError>;

    /// Number of interleaved samples in one frame, used to build silent
    /// replacement frames on overflow
    fn frame_len(&self) -> usize;
}

/// Frame source backed by the channel the PortAudio callback feeds.
///
/// The callback runs on PortAudio's own thread; receiving from the channel
/// is the capture loop's opaque blocking read.
pub struct ChannelFrameSource {
    rx: mpsc::Receiver<Frame>,
    frame_len: usize,
}

impl ChannelFrameSource {
    pub fn new(rx: mpsc::Receiver<Frame>, frame_len: usize) -> Self {
        Self { rx, frame_len }
    }
}

impl FrameSource for ChannelFrameSource {
    fn read_frame(&mut self) -> Result<Frame, ReadError> {
        self.rx.blocking_recv().ok_or(ReadError::Disconnected)
    }

    fn frame_len(&self) -> usize {
        self.frame_len
    }
}

/// Manages audio capture using PortAudio
pub struct AudioCapture {
    pa_stream: Option<pa::Stream<pa::NonBlocking, pa::Input<i16>>>,
}

impl AudioCapture {
    /// Creates a new AudioCapture instance
    pub fn new() -> Self {
        Self { pa_stream: None }
    }

    /// Starts audio capture
    ///
    /// # Arguments
    /// * `tx` - Channel sender for captured frames
    /// * `running` - Atomic flag indicating whether the app is running
    /// * `audio` - PCM layout to open the input stream with
    ///
    /// # Returns
    /// Result indicating success or error
    pub fn start(
        &mut self,
        tx: mpsc::Sender<Frame>,
        running: Arc<AtomicBool>,
        audio: &AudioConfig,
    ) -> Result<(), anyhow::Error> {
        let pa = pa::PortAudio::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PortAudio: {}", e))?;

        let input_params = pa
            .default_input_stream_params::<i16>(audio.channels as i32)
            .map_err(|e| anyhow::anyhow!("Failed to get default input stream parameters: {}", e))?;
        let input_settings = pa::InputStreamSettings::new(
            input_params,
            audio.sample_rate as f64,
            audio.frame_size as u32,
        );

        let callback = move |pa::InputStreamCallbackArgs { buffer, .. }| {
            let frame = buffer.to_vec();
            if let Err(e) = tx.try_send(frame) {
                eprintln!("Dropped a captured frame: {}", e);
            }
            if running.load(Ordering::Relaxed) {
                pa::Continue
            } else {
                pa::Complete
            }
        };

        let mut stream = pa
            .open_non_blocking_stream(input_settings, callback)
            .map_err(|e| anyhow::anyhow!("Failed to open stream: {}", e))?;

        stream
            .start()
            .map_err(|e| anyhow::anyhow!("Failed to start stream: {}", e))?;

        self.pa_stream = Some(stream);
        Ok(())
    }

    /// Completely stops and cleans up the audio capture
    /// This closes the stream and releases resources
    pub fn stop(&mut self) {
        if let Some(stream) = &mut self.pa_stream {
            if let Err(e) = stream.stop() {
                eprintln!("Failed to stop stream: {}", e);
            }
            if let Err(e) = stream.close() {
                eprintln!("Failed to close stream: {}", e);
            }
        }
        self.pa_stream = None;
    }
}

impl Default for AudioCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_source_yields_frames_then_disconnects() {
        let (tx, rx) = mpsc::channel(4);
        let mut source = ChannelFrameSource::new(rx, 8);
        tx.blocking_send(vec![1i16; 8]).unwrap();
        tx.blocking_send(vec![2i16; 8]).unwrap();
        drop(tx);

        assert_eq!(source.read_frame().unwrap()[0], 1);
        assert_eq!(source.read_frame().unwrap()[0], 2);
        assert_eq!(source.read_frame(), Err(ReadError::Disconnected));
        assert_eq!(source.frame_len(), 8);
    }
}
