//! Command executor that runs allow-listed programs on the local host.
//!
//! Every way a command can go wrong (not allowed, not found, timed out,
//! non-zero exit) becomes an `ExecuteResponse` with `success: false` and a
//! readable message in `output`, never a `ServiceError`.

use crate::config::models::ExecutorSettings;
use crate::services::base::{CommandExecutor, ServiceError};
use crate::services::command_line::split_command;
use async_trait::async_trait;
use ep_protocol::service_models::{ExecuteRequest, ExecuteResponse};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub struct LocalExecutor {
    settings: ExecutorSettings,
    working_dir: PathBuf,
}

impl LocalExecutor {
    /// Create an executor running commands in `working_dir`.
    pub fn new(settings: ExecutorSettings, working_dir: PathBuf) -> Self {
        Self {
            settings,
            working_dir,
        }
    }

    fn is_allowed(&self, program: &str) -> bool {
        self.settings
            .allowed_commands
            .iter()
            .any(|allowed| allowed == program)
    }

    async fn run(&self, command: &str) -> ExecuteResponse {
        let command = command.trim();
        if command.is_empty() {
            return ExecuteResponse::failure("No command provided").with_error("Empty command");
        }

        if command.chars().count() > self.settings.max_command_length {
            return ExecuteResponse::failure(format!(
                "Command exceeds the maximum length of {} characters",
                self.settings.max_command_length
            ))
            .with_error("Command too long");
        }

        let words = match split_command(command) {
            Ok(words) => words,
            Err(e) => {
                return ExecuteResponse::failure(format!("Invalid command syntax: {e}"))
                    .with_error(e.to_string())
            }
        };
        let Some((program, args)) = words.split_first() else {
            return ExecuteResponse::failure("No command provided").with_error("Empty command");
        };

        if !self.is_allowed(program) {
            return ExecuteResponse::failure(format!(
                "Command '{program}' is not allowed for security reasons."
            ))
            .with_error("Command not in allowed list");
        }

        let executable = match which::which(program) {
            Ok(path) => path,
            Err(e) => {
                return ExecuteResponse::failure(format!("Command '{program}' not found: {e}"))
                    .with_error("Command not found")
            }
        };
        debug!(executable = %executable.display(), "resolved command");

        let mut cmd = Command::new(&executable);
        cmd.args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.settings.timeout(), cmd.output()).await {
            Err(_) => {
                return ExecuteResponse::failure(format!(
                    "Command timed out after {} seconds",
                    self.settings.timeout_secs
                ))
                .with_error("Timeout")
            }
            Ok(Err(e)) => {
                return ExecuteResponse::failure(format!("Error executing command: {e}"))
                    .with_error(e.to_string())
            }
            Ok(Ok(output)) => output,
        };

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stdout = stdout.trim();
            if stdout.is_empty() {
                ExecuteResponse::success("Command executed successfully (no output)")
            } else {
                ExecuteResponse::success(stdout)
            }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                "Command failed with no error message"
            } else {
                stderr
            };
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |code| code.to_string());
            ExecuteResponse::failure(message)
                .with_error(format!("Command failed with return code {code}"))
        }
    }
}

#[async_trait]
impl CommandExecutor for LocalExecutor {
    async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, ServiceError> {
        Ok(self.run(&request.command).await)
    }
}
