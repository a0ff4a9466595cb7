// Re-export common types and functions for easier imports
pub use crate::config::{AppConfig, AudioConfig};
pub use crate::ring_buffer::{Frame, RingBuffer};
pub use crate::snapshot::SnapshotEncoder;
pub use crate::trigger::{TriggerDetector, TriggerSignals, TriggerSource};
pub use crate::ui::{RenderCommand, RenderState, TextSurface};
pub use crate::upload::{LanguagePair, TranscriptionResult, UploadClient, UploadError};

// Re-export common external dependencies
pub use anyhow::{anyhow, Context, Result};
pub use serde::{Deserialize, Serialize};
pub use std::collections::VecDeque;
pub use std::path::PathBuf;
pub use std::sync::Arc;
pub use std::time::Duration;
