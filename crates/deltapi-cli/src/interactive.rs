//! Keyboard and signal control of a running engine

use deltapi_engine::RunControl;
use std::io::BufRead;
use std::str::FromStr;
use tracing::{info, warn};

/// Command typed on stdin while a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Stop,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(Command::Pause),
            "r" | "resume" => Ok(Command::Resume),
            "s" | "stop" | "q" | "quit" => Ok(Command::Stop),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Apply one command to the run
pub fn apply(control: &RunControl, command: Command) {
    let outcome = match command {
        Command::Pause => control.pause(),
        Command::Resume => control.resume(),
        Command::Stop => {
            control.stop();
            Ok(())
        }
    };
    if let Err(e) = outcome {
        warn!("{}", e);
    }
}

/// Read commands from stdin until it closes
///
/// Runs on a detached OS thread, not a tokio task.
pub fn spawn_stdin_control(control: RunControl) {
    info!("Type p(ause), r(esume) or s(top) and press Enter to control the run");

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse() {
                Ok(command) => apply(&control, command),
                Err(e) => warn!("{}", e),
            }
        }
    });
}

/// Stop the run on Ctrl-C
pub fn spawn_ctrl_c_stop(control: RunControl) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after the current action");
            control.stop();
        }
    })
}
