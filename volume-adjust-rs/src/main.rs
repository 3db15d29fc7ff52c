//! Console driver for Volume Adjustment.
//!
//! Reads one command per line from stdin (`up`, `down`, `max`, `min`,
//! `next`, `prev`, `update`, `quit`) and prints announcements to stdout.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("volume_adjust_rs=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(windows)]
fn main() -> Result<()> {
    use anyhow::Context;
    use std::io::BufRead;
    use std::sync::Arc;
    use volume_adjust_rs::audio::{ComGuard, WindowsAudioSystem};
    use volume_adjust_rs::{Announcer, AppState, Command, JsonPreferences, Messages};

    struct ConsoleAnnouncer;

    impl Announcer for ConsoleAnnouncer {
        fn announce(&self, text: &str) {
            println!("{text}");
        }
    }

    init_logging();

    let _com = ComGuard::new().context("COM init failed")?;
    let store = JsonPreferences::from_env().context("Locating preferences failed")?;
    let preferences = store.load();
    tracing::info!(path = %store.path().display(), step = preferences.step, "Loaded preferences");

    let mut app = AppState::new(
        Arc::new(WindowsAudioSystem::new()),
        preferences,
        Messages::default(),
        Arc::new(ConsoleAnnouncer),
    );
    app.refresh_in_background();

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Reading stdin failed")?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "update" => {
                app.refresh_in_background();
            }
            text => match text.parse::<Command>() {
                Ok(command) => {
                    app.dispatch(command);
                }
                Err(e) => eprintln!("{e}"),
            },
        }
    }

    Ok(())
}

#[cfg(not(windows))]
fn main() -> Result<()> {
    init_logging();
    anyhow::bail!("volume-adjust-rs requires the Windows Core Audio API")
}
