//! Terminal rendering of core events.
//!
//! Human mode redraws the LED row in place on every tick and prints every
//! other event on its own line. JSON mode prints each event as one line.

use colored::Colorize;
use ep_protocol::ipc::Event;
use ep_protocol::run_models::{RunView, TickSnapshot};
use std::io::Write;

const LIT: &str = "●";
const DARK: &str = "○";

/// One piece of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Overwrite the current line.
    Redraw(String),
    /// Print a full line.
    Line(String),
}

/// The pipeline as a row of LEDs, entry stage first.
pub fn led_row(stages: &[bool]) -> String {
    stages
        .iter()
        .map(|&lit| {
            if lit {
                LIT.green().bold().to_string()
            } else {
                DARK.dimmed().to_string()
            }
        })
        .collect()
}

fn tick_line(snapshot: &TickSnapshot) -> String {
    let stats = format!(
        "t={:.3}s v={:+.3} cycles={}",
        snapshot.elapsed_time, snapshot.signal, snapshot.cycle_count
    );
    format!("{} {}", led_row(&snapshot.stages), stats.dimmed())
}

fn status_line(view: &RunView) -> String {
    let mut line = format!("status: {:?}", view.status);
    if let Some(command) = &view.command {
        line.push_str(&format!(" command=`{command}`"));
    }
    if let Some(snapshot) = &view.snapshot {
        line.push_str(&format!(
            " tick={} cycles={} lit={}/{}",
            snapshot.tick,
            snapshot.cycle_count,
            snapshot.stages.iter().filter(|&&lit| lit).count(),
            snapshot.stages.len()
        ));
    }
    if let Some(result) = &view.result {
        line.push_str(&format!("\n{result}"));
    }
    line
}

/// Render `event` for a human reader. `None` means nothing to show.
pub fn format_event(event: &Event) -> Option<Output> {
    let output = match event {
        Event::RunStarted {
            command,
            stage_count,
            ..
        } => Output::Line(
            format!("▶ `{command}` across {stage_count} stages")
                .bold()
                .to_string(),
        ),
        Event::Tick { snapshot, .. } => Output::Redraw(tick_line(snapshot)),
        Event::CommandResolved { .. } => return None,
        Event::AwaitingResult { .. } => {
            Output::Line("waiting for the command to finish...".dimmed().to_string())
        }
        Event::RunCompleted {
            result, success, ..
        } => {
            if *success {
                Output::Line(result.clone())
            } else {
                Output::Line(result.red().to_string())
            }
        }
        Event::RunCancelled { .. } => Output::Line("■ run stopped".yellow().to_string()),
        Event::RunExhausted { ticks, .. } => Output::Line(
            format!("■ token did not reach the exit within {ticks} ticks")
                .yellow()
                .to_string(),
        ),
        Event::RunRejected { reason } => Output::Line(format!("✗ {reason}").red().to_string()),
        Event::ConfigUpdated { config } => {
            let max_ticks = config
                .max_ticks
                .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string());
            Output::Line(format!(
                "config: stages={} frequency={} steps={} tick={}ms max_ticks={}",
                config.stage_count,
                config.frequency,
                config.steps_per_cycle,
                config.tick_interval_ms,
                max_ticks
            ))
        }
        Event::ConfigRejected { reason } => {
            Output::Line(format!("✗ {reason}").red().to_string())
        }
        Event::LoginResult { success } => {
            if *success {
                Output::Line("logged in".green().to_string())
            } else {
                Output::Line("login failed".red().to_string())
            }
        }
        Event::LoggedOut => Output::Line("logged out".to_string()),
        Event::StatusReport { view } => Output::Line(status_line(view)),
    };
    Some(output)
}

/// Writes events to stdout, keeping track of an in-place tick line.
pub struct Printer {
    json: bool,
    mid_line: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            mid_line: false,
        }
    }

    pub fn print(&mut self, event: &Event) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();

        if self.json {
            let line = serde_json::to_string(event)?;
            writeln!(stdout, "{line}")?;
            return stdout.flush();
        }

        match format_event(event) {
            Some(Output::Redraw(text)) => {
                write!(stdout, "\r{text}\x1b[K")?;
                self.mid_line = true;
            }
            Some(Output::Line(text)) => {
                if self.mid_line {
                    writeln!(stdout)?;
                    self.mid_line = false;
                }
                writeln!(stdout, "{text}")?;
            }
            None => {}
        }
        stdout.flush()
    }

    /// Print a line that did not come from the core.
    pub fn note(&mut self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        if self.mid_line {
            writeln!(stdout)?;
            self.mid_line = false;
        }
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }
}
