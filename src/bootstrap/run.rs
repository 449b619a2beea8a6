//! Console driver: playback events arrive as lines on stdin.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use vg_app::ProgressTracker;
use vg_core::PlayerGate;

use super::config::{load_config_or_default, resolve_config_path};
use super::paths::AppPaths;
use super::tracing::init_tracing_subscriber;
use super::wiring::build_tracker;

/// Events the host can feed the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// The current video played to its end.
    VideoEnded,
    /// The participant pressed "restart".
    Restart,
    Status,
    Quit,
}

impl HostCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "ended" | "advance" | "next" => Some(Self::VideoEnded),
            "restart" | "reset" => Some(Self::Restart),
            "status" => Some(Self::Status),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

const USAGE: &str = "commands: ended | restart | status | quit";

/// Human-readable view of what the player should show.
pub fn describe(tracker: &ProgressTracker) -> String {
    let total = tracker.sequence().len();
    let mut text = match tracker.gate() {
        PlayerGate::Watching { position, item } => {
            format!("Now playing video {} of {total}: {item}", position + 1)
        }
        PlayerGate::Unlocked => {
            "All videos watched. You may proceed to Gender Identification.".to_string()
        }
        PlayerGate::AttemptUsed => {
            "You have already completed the video session. Only one attempt is allowed."
                .to_string()
        }
        PlayerGate::Exhausted => {
            "No videos left to play. Restart to watch the sequence again.".to_string()
        }
    };
    if tracker.snapshot().sync_error {
        text.push_str(" (progress is not synced with the server)");
    }
    text
}

/// Apply one command and return what to print.
pub async fn execute_command(tracker: &ProgressTracker, command: HostCommand) -> String {
    match command {
        HostCommand::VideoEnded => {
            if !tracker.gate().shows_player() {
                return describe(tracker);
            }
            match tracker.advance().await {
                Ok(_) => describe(tracker),
                Err(err) => format!("Ignored: {err}"),
            }
        }
        HostCommand::Restart => {
            if !tracker.gate().can_restart() {
                return "Restart is not available once the session is complete.".to_string();
            }
            tracker.reset().await;
            describe(tracker)
        }
        HostCommand::Status | HostCommand::Quit => describe(tracker),
    }
}

/// Feed commands from `input` to the tracker until EOF or `quit`.
pub async fn drive<R, W>(tracker: &ProgressTracker, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = HostCommand::parse(&line) else {
            output
                .write_all(format!("Unknown command {:?}; {USAGE}\n", line.trim()).as_bytes())
                .await?;
            continue;
        };
        debug!(?command, "Host command");
        if command == HostCommand::Quit {
            break;
        }

        let reply = execute_command(tracker, command).await;
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}

pub async fn run_app() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    let config_path = resolve_config_path(&paths);
    let config = load_config_or_default(&config_path)?;

    init_tracing_subscriber(Some(&paths.logs_dir))?;
    info!(config = %config_path.display(), "Starting videogate");

    let tracker = build_tracker(&config, &paths)?;
    tracker.hydrate().await;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}\n{USAGE}\n", describe(&tracker)).as_bytes())
        .await?;
    stdout.flush().await?;

    drive(&tracker, BufReader::new(tokio::io::stdin()), &mut stdout).await?;

    let grace = Duration::from_millis(config.api.timeout_ms.saturating_mul(2));
    if tokio::time::timeout(grace, tracker.settle()).await.is_err() {
        warn!(
            in_flight = tracker.in_flight_count(),
            "Exiting with progress writes still in flight"
        );
    }
    info!("videogate stopped");
    Ok(())
}
