use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::audio_capture::{AudioCapture, ChannelFrameSource};
use crate::capture_loop::run_capture_loop;
use crate::config::AppConfig;
use crate::ring_buffer::RingBuffer;
use crate::snapshot::{remove_clip, SnapshotEncoder};
use crate::trigger::{AtomicTriggerSource, TriggerDetector};
use crate::ui::RenderCommand;
use crate::upload::{LanguagePair, TranscriptionResult, UploadClient};

/// Main pipeline coordinator: owns the rolling window and the capture
/// lifecycle, and turns snapshot triggers into dispatch tasks.
///
/// The capture thread does nothing but read/push/poll; encoding, the network
/// round trip and the render handoff all happen on per-snapshot tokio tasks
/// so capture is never delayed. Results are posted to the UI task through
/// the render channel, never written to the surface directly.
pub struct RollingTranslator {
    config: AppConfig,
    ring: Arc<RingBuffer>,
    audio_capture: AudioCapture,
    running: Arc<AtomicBool>,
    snapshot_flag: Arc<AtomicBool>,
    quit_flag: Arc<AtomicBool>,
    render_tx: mpsc::Sender<RenderCommand>,
    capture_handle: Option<std::thread::JoinHandle<()>>,
}

impl RollingTranslator {
    /// Creates a new RollingTranslator instance
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `render_tx` - Channel the UI task receives render commands on
    pub fn new(config: AppConfig, render_tx: mpsc::Sender<RenderCommand>) -> Self {
        let ring = Arc::new(RingBuffer::new(config.ring_capacity()));
        Self {
            config,
            ring,
            audio_capture: AudioCapture::new(),
            running: Arc::new(AtomicBool::new(false)),
            snapshot_flag: Arc::new(AtomicBool::new(false)),
            quit_flag: Arc::new(AtomicBool::new(false)),
            render_tx,
            capture_handle: None,
        }
    }

    /// Opens the audio input and starts the capture thread.
    ///
    /// Must be called from within a tokio runtime; the capture thread keeps
    /// a handle to it for spawning dispatch tasks.
    ///
    /// # Returns
    /// Result indicating success or an error with detailed message
    pub fn start(&mut self) -> Result<(), anyhow::Error> {
        if self.capture_handle.is_some() {
            return Err(anyhow::anyhow!("Capture already started"));
        }

        self.running.store(true, Ordering::Relaxed);

        let (frame_tx, frame_rx) = mpsc::channel(16);
        self.audio_capture
            .start(frame_tx, self.running.clone(), &self.config.audio)?;

        let mut source =
            ChannelFrameSource::new(frame_rx, self.config.audio.samples_per_frame());
        let mut detector = TriggerDetector::new(
            AtomicTriggerSource::new(self.snapshot_flag.clone(), self.quit_flag.clone()),
            Duration::from_millis(self.config.debounce_ms),
        );

        let uploader = Arc::new(UploadClient::new(self.config.endpoint_url.clone())?);
        let encoder = SnapshotEncoder::new(&self.config.audio);
        let languages = LanguagePair::new(
            self.config.source_language.clone(),
            self.config.target_language.clone(),
        );
        let clip_dir = std::env::temp_dir();

        let ring = self.ring.clone();
        let running = self.running.clone();
        let render_tx = self.render_tx.clone();
        let runtime = tokio::runtime::Handle::current();

        let join = std::thread::Builder::new()
            .name("capture".to_string())
            .spawn(move || {
                run_capture_loop(&mut source, &ring, &mut detector, || {
                    runtime.spawn(dispatch_snapshot(
                        ring.clone(),
                        encoder.clone(),
                        uploader.clone(),
                        languages.clone(),
                        clip_dir.clone(),
                        render_tx.clone(),
                    ));
                });
                let _ = render_tx.blocking_send(RenderCommand::Status("Exiting...".to_string()));
                running.store(false, Ordering::Relaxed);
            })
            .context("Failed to spawn capture thread")?;
        self.capture_handle = Some(join);

        println!(
            "Capture started: {} channels at {} Hz, {} frame window",
            self.config.audio.channels,
            self.config.audio.sample_rate,
            self.ring.capacity()
        );
        Ok(())
    }

    /// Stops capture and releases the audio input.
    ///
    /// Closing the stream drops the device-side sender, which unblocks the
    /// capture thread if the quit trigger has not already done so. In-flight
    /// dispatch tasks are left to finish or be abandoned at process exit.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        self.audio_capture.stop();
        if let Some(join) = self.capture_handle.take() {
            if join.join().is_err() {
                eprintln!("Capture thread panicked");
            }
        }
    }

    /// Get the running state reference
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Flag the trigger watcher sets to request a snapshot
    pub fn snapshot_flag(&self) -> Arc<AtomicBool> {
        self.snapshot_flag.clone()
    }

    /// Flag the trigger watcher sets to request shutdown
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        self.quit_flag.clone()
    }

    /// Shared handle to the rolling window
    pub fn ring(&self) -> Arc<RingBuffer> {
        self.ring.clone()
    }
}

impl Drop for RollingTranslator {
    fn drop(&mut self) {
        if self.capture_handle.is_some() {
            self.shutdown();
        }
    }
}

/// Runs one snapshot through encode → upload → render.
///
/// Every failure here is terminal for this snapshot only and ends as a
/// status message on the same channel successful results use.
pub async fn dispatch_snapshot(
    ring: Arc<RingBuffer>,
    encoder: SnapshotEncoder,
    uploader: Arc<UploadClient>,
    languages: LanguagePair,
    clip_dir: PathBuf,
    render_tx: mpsc::Sender<RenderCommand>,
) {
    if render_tx
        .send(RenderCommand::Status("Loading...".to_string()))
        .await
        .is_err()
    {
        return;
    }

    let command = match process_snapshot(&ring, encoder, &uploader, &languages, &clip_dir).await {
        Ok(result) => {
            println!("Transcription: '{}'", result.transcription);
            RenderCommand::Animate(result.display_text().to_string())
        }
        Err(message) => {
            eprintln!("Snapshot dispatch failed: {}", message);
            RenderCommand::Status(message)
        }
    };
    let _ = render_tx.send(command).await;
}

async fn process_snapshot(
    ring: &RingBuffer,
    encoder: SnapshotEncoder,
    uploader: &UploadClient,
    languages: &LanguagePair,
    clip_dir: &Path,
) -> Result<TranscriptionResult, String> {
    let frames = ring.snapshot();
    println!("Snapshot of {} frames taken", frames.len());

    // Serialization is pure CPU and file I/O, keep it off the async workers
    let clip_dir = clip_dir.to_path_buf();
    let encoded = tokio::task::spawn_blocking(move || -> Result<(Vec<u8>, PathBuf), String> {
        let wav = encoder
            .encode(&frames)
            .map_err(|e| format!("Error encoding snapshot: {}", e))?;
        let clip_path = encoder
            .write_clip(&wav, &clip_dir)
            .map_err(|e| format!("Error writing snapshot: {}", e))?;
        Ok((wav, clip_path))
    })
    .await
    .map_err(|e| format!("Error encoding snapshot: {}", e))?;
    let (wav, clip_path) = encoded?;

    let outcome = uploader.send(wav, languages).await;
    // the clip is single-use; drop it whatever the backend said
    remove_clip(&clip_path);
    outcome.map_err(|e| e.to_string())
}
