use std::process::{Command, Output, Stdio};

use crate::error::{Result, VideoError};

/// Returns true when `tool` runs and exits successfully with `version_flag`
pub fn tool_available(tool: &str, version_flag: &str) -> bool {
    Command::new(tool)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Fail with [`VideoError::ToolNotFound`] unless `tool` is runnable
pub fn require_tool(tool: &str, version_flag: &str) -> Result<()> {
    if tool_available(tool, version_flag) {
        Ok(())
    } else {
        Err(VideoError::ToolNotFound { tool: tool.to_string() }.into())
    }
}

/// Render a command the way a user would type it, for logging
pub fn display_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `limit` characters of a process's stderr
pub fn stderr_excerpt(output: &Output, limit: usize) -> String {
    String::from_utf8_lossy(&output.stderr)
        .trim()
        .chars()
        .take(limit)
        .collect()
}
