//! Clipboard delivery.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Writes text to the system clipboard, with shell-utility fallbacks for
/// headless environments. Fallback execution can be disabled via config.
pub struct Clipboard {
    allow_fallback_commands: bool,
}

impl Clipboard {
    pub fn new(allow_fallback_commands: bool) -> Self {
        Self {
            allow_fallback_commands,
        }
    }

    /// Copy text to the clipboard. Tries the native backend first, then the
    /// platform's clipboard executables when allowed.
    pub fn copy(&self, text: &str) -> Result<()> {
        if let Ok(mut native) = arboard::Clipboard::new()
            && native.set_text(text.to_owned()).is_ok()
        {
            return Ok(());
        }

        if !self.allow_fallback_commands {
            return Err(anyhow!(
                "system clipboard unavailable and fallback commands are disabled"
            ));
        }

        for command in fallback_commands() {
            if pipe_through(command, text).is_ok() {
                return Ok(());
            }
        }

        Err(anyhow!(
            "failed to copy text to clipboard using available backends"
        ))
    }
}

fn pipe_through(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn clipboard command: {program}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to write clipboard contents")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("clipboard command did not exit cleanly: {program}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("clipboard command exited with status {status}"))
    }
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["pbcopy"]]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["xclip", "-selection", "clipboard"], &["wl-copy"]]
}

#[cfg(target_os = "windows")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]]
}

#[cfg(not(any(unix, target_os = "windows")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    Vec::new()
}
