//! Built-in notification actions

use std::{process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{
    sink::MessageSink, substitution::VariableSubstitutor, ActionContext, NotificationAction,
};
use crate::{
    error::{NotifyError, Result},
    types::{CommandDefinition, LogDefinition, LogLevel, Settings, SoundDefinition},
};

/// Emits a rendered message through the message sink
pub struct LogAction {
    name: String,
    message: String,
    level: LogLevel,
    sink: Arc<dyn MessageSink>,
}

impl LogAction {
    /// Create a log action from its definition
    pub fn new(name: impl Into<String>, def: &LogDefinition, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            name: name.into(),
            message: def.message.clone(),
            level: def.level,
            sink,
        }
    }
}

#[async_trait]
impl NotificationAction for LogAction {
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<String> {
        let rendered = VariableSubstitutor::substitute(&self.message, ctx);
        self.sink
            .emit(self.level, &rendered)
            .map_err(|e| NotifyError::action(&self.name, e.to_string()))?;
        Ok(rendered)
    }
}

/// Spawns an external command
///
/// Each run spawns its own child process, so concurrent notifications never
/// queue behind one another. Children are killed when the run is dropped
/// (dispatcher timeout or cancellation) or when the action is shut down.
pub struct CommandAction {
    name: String,
    command: String,
    args: Vec<String>,
    timeout_ms: Option<u64>,
    closed: CancellationToken,
}

impl CommandAction {
    /// Create a command action from its definition
    pub fn new(name: impl Into<String>, def: &CommandDefinition) -> Self {
        Self::from_parts(name, def.command.clone(), def.args.clone(), def.timeout_ms)
    }

    fn from_parts(
        name: impl Into<String>,
        command: String,
        args: Vec<String>,
        timeout_ms: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            command,
            args,
            timeout_ms,
            closed: CancellationToken::new(),
        }
    }

    /// Program this action spawns
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Argument templates, before substitution
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl NotificationAction for CommandAction {
    fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    async fn run(&self, ctx: &ActionContext<'_>) -> Result<String> {
        if self.closed.is_cancelled() {
            return Err(NotifyError::action(&self.name, "action has been shut down"));
        }

        let args = VariableSubstitutor::substitute_all(&self.args, ctx);
        debug!(
            action = %self.name,
            command = %self.command,
            args = ?args,
            "Spawning command"
        );

        let child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                error!(
                    action = %self.name,
                    command = %self.command,
                    error = %e,
                    "Failed to spawn command"
                );
                NotifyError::action(
                    &self.name,
                    format!("Failed to spawn '{}': {}", self.command, e),
                )
            })?;

        let finished = async move {
            let waited = match self.timeout_ms {
                Some(ms) => tokio::time::timeout(
                    Duration::from_millis(ms),
                    child.wait_with_output(),
                )
                .await
                .map_err(|_| NotifyError::ActionTimeout {
                    action: self.name.clone(),
                    timeout_ms: ms,
                })?,
                None => child.wait_with_output().await,
            };
            waited.map_err(|e| {
                NotifyError::action(
                    &self.name,
                    format!("Failed to wait for '{}': {}", self.command, e),
                )
            })
        };

        let output = tokio::select! {
            output = finished => output?,
            _ = self.closed.cancelled() => {
                return Err(NotifyError::action(&self.name, "cancelled by shutdown"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                action = %self.name,
                command = %self.command,
                exit_code = ?output.status.code(),
                stderr = %stderr.trim(),
                "Command exited with non-zero status"
            );
            return Err(NotifyError::action(
                &self.name,
                format!(
                    "Command '{}' failed with exit code {:?}: {}",
                    self.command,
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!(
            action = %self.name,
            command = %self.command,
            output_length = stdout.len(),
            "Command executed successfully"
        );

        if stdout.is_empty() {
            Ok(format!("Command '{}' executed successfully", self.command))
        } else {
            Ok(stdout)
        }
    }

    async fn shutdown(&self) {
        debug!(action = %self.name, "Closing command action");
        self.closed.cancel();
    }
}

/// Plays a sound file through an external player
///
/// Decoding and output are left to the player; this only builds its command line.
pub struct SoundAction {
    file: String,
    player: CommandAction,
}

impl SoundAction {
    /// Create a sound action from its definition
    ///
    /// The player is taken from the definition, then `settings.sound_player`,
    /// then the platform default.
    pub fn new(name: impl Into<String>, def: &SoundDefinition, settings: &Settings) -> Self {
        let (command, args) = match def.player.as_ref().or(settings.sound_player.as_ref()) {
            Some(player) => {
                let mut args = def.args.clone();
                args.push(def.file.clone());
                (player.clone(), args)
            }
            None => platform_player(&def.file),
        };

        Self {
            file: def.file.clone(),
            player: CommandAction::from_parts(name, command, args, None),
        }
    }

    /// Player command this action spawns
    pub fn player(&self) -> &str {
        self.player.command()
    }

    /// Full player argument list, file last
    pub fn player_args(&self) -> &[String] {
        self.player.args()
    }
}

#[async_trait]
impl NotificationAction for SoundAction {
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<String> {
        self.player.run(ctx).await?;
        Ok(format!(
            "Played {}",
            VariableSubstitutor::substitute(&self.file, ctx)
        ))
    }

    async fn shutdown(&self) {
        self.player.shutdown().await;
    }
}

fn platform_player(file: &str) -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("afplay".to_string(), vec![file.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "powershell".to_string(),
            vec![
                "-NoProfile".to_string(),
                "-Command".to_string(),
                format!("(New-Object Media.SoundPlayer '{}').PlaySync()", file),
            ],
        )
    } else {
        ("paplay".to_string(), vec![file.to_string()])
    }
}
