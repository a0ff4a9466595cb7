use std::time::Instant;

use crate::audio_capture::{FrameSource, ReadError};
use crate::ring_buffer::RingBuffer;
use crate::trigger::{TriggerDetector, TriggerSource};

/// Runs the capture loop until the quit trigger fires or the frame source
/// disconnects.
///
/// Each iteration blocks on one frame read, pushes it into the ring, then
/// polls the trigger detector. An overflowed read substitutes a silent frame
/// so the window keeps moving; read problems never terminate the loop, only
/// a disconnected source or the quit trigger do. `on_snapshot` is called once
/// per fired snapshot event and must return quickly — the heavy work happens
/// on a dispatch task, not here.
pub fn run_capture_loop<S, T, F>(
    source: &mut S,
    ring: &RingBuffer,
    detector: &mut TriggerDetector<T>,
    mut on_snapshot: F,
) where
    S: FrameSource,
    T: TriggerSource,
    F: FnMut(),
{
    loop {
        match source.read_frame() {
            Ok(frame) => ring.push(frame),
            Err(ReadError::Overflow) => {
                eprintln!("Audio device overflow, inserting a silent frame");
                ring.push(vec![0i16; source.frame_len()]);
            }
            Err(ReadError::Disconnected) => {
                println!("Audio stream ended, stopping capture");
                break;
            }
        }

        let signals = detector.check(Instant::now());
        if signals.snapshot {
            on_snapshot();
        }
        if signals.quit {
            println!("Quit requested, stopping capture");
            break;
        }
    }
}
