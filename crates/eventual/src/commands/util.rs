//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use eventual_core::{AppContext, AuthProvider, ImageFile, LoadingCounter, Session};

use crate::error::CliError;
use crate::identity::ProfileIdentity;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, destructive actions need `--yes`.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read an image from disk for upload, named after the file.
pub fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map_or_else(|| "image".into(), |n| n.to_string_lossy().into_owned());
    Ok(ImageFile::new(name, bytes))
}

/// Sign in with the profile's recorded identity.
///
/// One-shot commands start logged out, so anything that needs the
/// session signs in first.
pub async fn sign_in(
    ctx: &AppContext,
    identity: &ProfileIdentity,
    provider: Option<&str>,
) -> Result<Session, CliError> {
    let configured = identity.configured()?;
    let provider = provider.unwrap_or(&configured.provider);
    if provider.parse::<AuthProvider>().is_err() {
        return Err(CliError::Validation {
            field: "provider".into(),
            reason: format!("expected 'google' or 'facebook', got '{provider}'"),
        });
    }
    ctx.session
        .login(provider)
        .await
        .ok_or_else(|| CliError::AuthFailed {
            profile: identity.profile_name().to_owned(),
        })
}

// ── Loading indicator ───────────────────────────────────────────────

/// Spinner on stderr shown while the loading counter is above zero.
///
/// Stops following the counter when dropped.
pub struct LoadingIndicator {
    task: JoinHandle<()>,
}

impl LoadingIndicator {
    /// Follow `loading`, unless output is quiet or stderr is not a terminal.
    pub fn attach(loading: &LoadingCounter, quiet: bool) -> Option<Self> {
        if quiet || !io::stderr().is_terminal() {
            return None;
        }
        let mut rx = loading.subscribe();
        let task = tokio::spawn(async move {
            let mut bar: Option<ProgressBar> = None;
            loop {
                let busy = *rx.borrow_and_update() > 0;
                bar = match (busy, bar.take()) {
                    (true, None) => Some(spinner()),
                    (true, Some(b)) => Some(b),
                    (false, Some(b)) => {
                        b.finish_and_clear();
                        None
                    }
                    (false, None) => None,
                };
                if rx.changed().await.is_err() {
                    break;
                }
            }
            if let Some(b) = bar {
                b.finish_and_clear();
            }
        });
        Some(Self { task })
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Loading...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Delete everything?", true).unwrap_or(false));
    }

    #[test]
    fn image_is_named_after_the_file() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("poster.png");
        std::fs::write(&path, b"png")?;
        let image = read_image(&path)?;
        assert_eq!(image.name, "poster.png");
        assert_eq!(image.bytes, b"png");
        Ok(())
    }
}
