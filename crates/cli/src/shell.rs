//! The interactive shell.
//!
//! Lines typed at the prompt become [`Op`]s for the core task; events coming
//! back are rendered as they arrive. Both streams are multiplexed with
//! `tokio::select!`.

use crate::render::Printer;
use color_eyre::Result;
use ep_core::scheduler::Simulator;
use ep_protocol::config_models::SimulatorConfigPatch;
use ep_protocol::ipc::{Event, Op};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::select;
use tokio::sync::mpsc;

const HELP: &str = "\
Type a command to run it, or:
  :stop                  stop the current run
  :status                show the current run
  :set <key> <value>     change a setting for the next run
                         (stages, frequency, steps, tick_ms, max_ticks)
  :login <user> <pass>   log in
  :logout                log out
  :commands              list the commands that may run
  :help                  show this help
  exit | quit            leave the shell";

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    Empty,
    Help,
    Commands,
    Exit,
    Op(Op),
    Invalid(String),
}

/// Parse one line of shell input.
pub fn parse_line(line: &str) -> ShellInput {
    let line = line.trim();
    if line.is_empty() {
        return ShellInput::Empty;
    }
    if line == "exit" || line == "quit" {
        return ShellInput::Exit;
    }

    let Some(directive) = line.strip_prefix(':') else {
        return ShellInput::Op(Op::StartRun {
            command: line.to_string(),
        });
    };

    let parts: Vec<&str> = directive.split_whitespace().collect();
    match parts.as_slice() {
        ["stop"] => ShellInput::Op(Op::StopRun),
        ["status"] => ShellInput::Op(Op::GetStatus),
        ["help"] => ShellInput::Help,
        ["commands"] => ShellInput::Commands,
        ["logout"] => ShellInput::Op(Op::Logout),
        ["set", key, value] => match parse_setting(key, value) {
            Ok(patch) => ShellInput::Op(Op::UpdateConfig { patch }),
            Err(reason) => ShellInput::Invalid(reason),
        },
        ["login", username, password] => ShellInput::Op(Op::Login {
            username: (*username).to_string(),
            password: (*password).to_string(),
        }),
        ["set", ..] => ShellInput::Invalid("usage: :set <key> <value>".to_string()),
        ["login", ..] => ShellInput::Invalid("usage: :login <user> <pass>".to_string()),
        _ => ShellInput::Invalid(format!("unknown directive `:{directive}`, try :help")),
    }
}

/// Turn `:set <key> <value>` into a config patch.
pub fn parse_setting(key: &str, value: &str) -> Result<SimulatorConfigPatch, String> {
    let invalid = || format!("invalid value `{value}` for `{key}`");
    let mut patch = SimulatorConfigPatch::default();

    match key {
        "stages" | "stage_count" => {
            patch.stage_count = Some(value.parse().map_err(|_| invalid())?);
        }
        "frequency" => {
            patch.frequency = Some(value.parse().map_err(|_| invalid())?);
        }
        "steps" | "steps_per_cycle" => {
            patch.steps_per_cycle = Some(value.parse().map_err(|_| invalid())?);
        }
        "tick_ms" | "tick_interval_ms" => {
            patch.tick_interval_ms = Some(value.parse().map_err(|_| invalid())?);
        }
        "max_ticks" => {
            patch.max_ticks = Some(value.parse().map_err(|_| invalid())?);
        }
        _ => return Err(format!("unknown setting `{key}`")),
    }
    Ok(patch)
}

/// One line naming the allowed programs, sorted.
pub fn allowed_commands_line(allowed: &[String]) -> String {
    if allowed.is_empty() {
        return "no commands are allowed".to_string();
    }
    let mut names: Vec<&str> = allowed.iter().map(String::as_str).collect();
    names.sort_unstable();
    names.dedup();
    format!("allowed commands: {}", names.join(", "))
}

/// Run the simulator behind an `Op` channel until it is told to shut down.
async fn serve(mut simulator: Simulator, mut op_rx: mpsc::Receiver<Op>) {
    while let Some(op) = op_rx.recv().await {
        if !simulator.handle_op(op).await {
            break;
        }
    }
}

/// Run the interactive shell until `exit` or end of input.
///
/// `allowed_commands` is what `:commands` reports; the executor enforces it.
pub async fn run_shell(
    simulator: Simulator,
    mut events_rx: mpsc::Receiver<Event>,
    mut printer: Printer,
    allowed_commands: &[String],
) -> Result<()> {
    let (op_tx, op_rx) = mpsc::channel(32);
    let core = tokio::spawn(serve(simulator, op_rx));

    printer.note("extendipede shell, :help for help")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_line(&line) {
                    ShellInput::Empty => {}
                    ShellInput::Help => printer.note(HELP)?,
                    ShellInput::Commands => {
                        printer.note(&allowed_commands_line(allowed_commands))?;
                    }
                    ShellInput::Exit => break,
                    ShellInput::Invalid(reason) => printer.note(&reason)?,
                    ShellInput::Op(op) => {
                        if op_tx.send(op).await.is_err() {
                            break;
                        }
                    }
                }
            }
            Some(event) = events_rx.recv() => {
                printer.print(&event)?;
            }
        }
    }

    let _ = op_tx.send(Op::Shutdown).await;
    drop(op_tx);

    // The channel closes once the core task drops the simulator
    while let Some(event) = events_rx.recv().await {
        printer.print(&event)?;
    }
    core.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_starts_a_run() {
        assert_eq!(
            parse_line("  ls -la  "),
            ShellInput::Op(Op::StartRun {
                command: "ls -la".to_string()
            })
        );
    }

    #[test]
    fn test_directives() {
        assert_eq!(parse_line(""), ShellInput::Empty);
        assert_eq!(parse_line("quit"), ShellInput::Exit);
        assert_eq!(parse_line(":stop"), ShellInput::Op(Op::StopRun));
        assert_eq!(parse_line(":status"), ShellInput::Op(Op::GetStatus));
        assert_eq!(parse_line(":help"), ShellInput::Help);
        assert_eq!(parse_line(":commands"), ShellInput::Commands);
        assert_eq!(parse_line(":logout"), ShellInput::Op(Op::Logout));
        assert_eq!(
            parse_line(":login operator hunter2"),
            ShellInput::Op(Op::Login {
                username: "operator".to_string(),
                password: "hunter2".to_string(),
            })
        );
    }

    #[test]
    fn test_set_builds_patch() {
        let ShellInput::Op(Op::UpdateConfig { patch }) = parse_line(":set stages 12") else {
            panic!("Expected UpdateConfig");
        };
        assert_eq!(patch.stage_count, Some(12));
        assert_eq!(patch.frequency, None);

        let patch = parse_setting("tick_ms", "5").unwrap();
        assert_eq!(patch.tick_interval_ms, Some(5));

        let patch = parse_setting("max_ticks", "0").unwrap();
        assert_eq!(patch.max_ticks, Some(0));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(parse_line(":set stages many"), ShellInput::Invalid(_)));
        assert!(matches!(parse_line(":set colour red"), ShellInput::Invalid(_)));
        assert!(matches!(parse_line(":set stages"), ShellInput::Invalid(_)));
        assert!(matches!(parse_line(":login operator"), ShellInput::Invalid(_)));
        assert!(matches!(parse_line(":launch"), ShellInput::Invalid(_)));
        assert!(matches!(parse_line(":logout now"), ShellInput::Invalid(_)));
    }

    #[test]
    fn test_allowed_commands_line() {
        let allowed = vec!["pwd".to_string(), "echo".to_string(), "ls".to_string()];
        assert_eq!(
            allowed_commands_line(&allowed),
            "allowed commands: echo, ls, pwd"
        );
        assert_eq!(allowed_commands_line(&[]), "no commands are allowed");
    }
}
