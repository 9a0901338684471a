//! Interactive editing of the denylist in the user's text editor

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Editor used when neither `VISUAL` nor `EDITOR` is set
const FALLBACK_EDITOR: &str = "vi";

/// Status `sh` exits with when the command is not found
const COMMAND_NOT_FOUND: i32 = 127;

/// Pick the editor command from `VISUAL`, then `EDITOR`
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Let the user edit `initial` and return the saved text
///
/// Returns `None` if the editor exits unsuccessfully (treated as "close
/// without saving").
pub fn edit_text(editor: &str, initial: &str) -> Result<Option<String>> {
    let mut scratch = tempfile::Builder::new()
        .prefix("usb-watchguard-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create scratch file")?;
    scratch
        .write_all(initial.as_bytes())
        .and_then(|_| scratch.flush())
        .context("Failed to write scratch file")?;

    // Close our handle; the file is removed when `path` drops
    let path = scratch.into_temp_path();

    if !run_editor(editor, &path)? {
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .with_context(|| format!("Failed to read scratch file: {}", path.display()))
}

fn run_editor(editor: &str, path: &Path) -> Result<bool> {
    if editor.trim().is_empty() {
        bail!("Editor command is empty");
    }

    debug!("Launching editor: {} {}", editor, path.display());
    let status = spawn_editor(editor, path)
        .with_context(|| format!("Failed to launch editor `{}`", editor))?;

    if cfg!(unix) && status.code() == Some(COMMAND_NOT_FOUND) {
        bail!("Editor `{}` not found", editor);
    }

    Ok(status.success())
}

/// The command goes through the shell, so quoted paths and arguments work
/// the same way they do for git and other tools reading `$EDITOR`
#[cfg(unix)]
fn spawn_editor(editor: &str, path: &Path) -> std::io::Result<ExitStatus> {
    Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$1\"", editor))
        .arg("sh")
        .arg(path)
        .status()
}

// No shell quoting here: the command is split on whitespace
#[cfg(not(unix))]
fn spawn_editor(editor: &str, path: &Path) -> std::io::Result<ExitStatus> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(FALLBACK_EDITOR);
    Command::new(program).args(parts).arg(path).status()
}
