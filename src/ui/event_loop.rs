use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::animation::RenderState;
use super::text_surface::TextSurface;

/// What the dispatch path asks the UI to do.
///
/// Background tasks never touch the surface directly; they post one of these
/// and the UI task performs the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Immediate, non-animated write ("Loading...", error messages)
    Status(String),
    /// Word-by-word reveal of a result text
    Animate(String),
}

/// The single UI task: owns the surface and the animation timer.
///
/// One `select!` loop interleaves incoming render commands with interval
/// ticks, so every visible-text mutation is serialized here. A command that
/// arrives mid-animation replaces the in-progress state; the abandoned text
/// is never merged with the new one. Returns when the running flag drops, or
/// when the command channel closes and the last animation has played out.
pub async fn run_ui(
    mut rx: mpsc::Receiver<RenderCommand>,
    surface: &mut dyn TextSurface,
    reveal_interval: Duration,
    running: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(reveal_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut state: Option<RenderState> = None;
    let mut closed = false;

    loop {
        if closed && state.is_none() {
            break;
        }
        tokio::select! {
            command = rx.recv(), if !closed => match command {
                Some(RenderCommand::Status(text)) => {
                    state = None;
                    surface.set_text(&text);
                }
                Some(RenderCommand::Animate(text)) => {
                    let mut fresh = RenderState::new(&text);
                    // first word appears immediately, the rest on the timer
                    if let Some(prefix) = fresh.advance() {
                        surface.set_text(prefix);
                    }
                    state = if fresh.is_finished() { None } else { Some(fresh) };
                    ticker.reset();
                }
                None => closed = true,
            },
            _ = ticker.tick() => {
                if let Some(current) = state.as_mut() {
                    if let Some(prefix) = current.advance() {
                        surface.set_text(prefix);
                    }
                    if current.is_finished() {
                        state = None;
                    }
                }
                if !running.load(Ordering::Relaxed) {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::text_surface::RecordingSurface;

    fn spawn_ui(
        reveal_interval: Duration,
    ) -> (
        mpsc::Sender<RenderCommand>,
        RecordingSurface,
        Arc<AtomicBool>,
        tokio::task::JoinHandle<()>,
    ) {
        let (tx, rx) = mpsc::channel(8);
        let surface = RecordingSurface::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let mut surface = surface.clone();
            let running = running.clone();
            tokio::spawn(async move {
                run_ui(rx, &mut surface, reveal_interval, running).await;
            })
        };
        (tx, surface, running, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn animation_reveals_one_word_per_interval() {
        let (tx, surface, _running, handle) = spawn_ui(Duration::from_millis(200));

        tx.send(RenderCommand::Animate("a b c".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(700)).await;

        assert_eq!(surface.writes(), vec!["a ", "a b ", "a b c "]);
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn new_command_replaces_in_progress_animation() {
        let (tx, surface, _running, handle) = spawn_ui(Duration::from_millis(200));

        tx.send(RenderCommand::Animate("x y z".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        tx.send(RenderCommand::Animate("q r".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        let writes = surface.writes();
        // "x y z" got as far as two words, then was abandoned
        assert!(writes.starts_with(&["x ".to_string(), "x y ".to_string()]));
        assert_eq!(writes[2..], ["q ".to_string(), "q r ".to_string()]);
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn status_is_immediate_and_cancels_animation() {
        let (tx, surface, _running, handle) = spawn_ui(Duration::from_millis(200));

        tx.send(RenderCommand::Animate("one two three".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(RenderCommand::Status("Loading...".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(surface.writes(), vec!["one ", "Loading..."]);
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn loop_exits_when_running_clears() {
        let (tx, _surface, running, handle) = spawn_ui(Duration::from_millis(200));

        running.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(handle.is_finished());
        drop(tx);
        handle.await.unwrap();
    }
}
