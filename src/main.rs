use std::time::Duration;
use tokio::sync::mpsc;

use lyssna::config::read_app_config;
use lyssna::rolling_translator::RollingTranslator;
use lyssna::trigger::spawn_stdin_watcher;
use lyssna::ui::{run_ui, ConsoleSurface, RenderCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Loading configuration...");
    let app_config = read_app_config();

    let (render_tx, render_rx) = mpsc::channel(16);
    let mut translator = RollingTranslator::new(app_config.clone(), render_tx.clone());
    translator.start()?;

    let _watcher = spawn_stdin_watcher(
        translator.snapshot_flag(),
        translator.quit_flag(),
        app_config.keys.snapshot,
        app_config.keys.quit,
    );

    let banner = format!(
        "Press '{}' then Enter to translate, '{}' then Enter to quit.",
        app_config.keys.snapshot, app_config.keys.quit
    );
    let _ = render_tx.send(RenderCommand::Status(banner)).await;
    // the UI loop ends once the remaining senders (dispatch tasks) are gone
    drop(render_tx);

    let mut surface = ConsoleSurface::new();
    run_ui(
        render_rx,
        &mut surface,
        Duration::from_millis(app_config.reveal_interval_ms),
        translator.running(),
    )
    .await;

    translator.shutdown();
    println!();
    Ok(())
}
