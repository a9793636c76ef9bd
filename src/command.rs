//! Free-text command parsing for task creation.
//!
//! Grammar, whitespace-delimited and order-sensitive:
//!
//! ```text
//! [@bot] <assignee> <title...> <M/D> [High|Med|Low|高|中|低]
//! ```
//!
//! The title is lazy, so the due date captured is the last `M/D` pattern in
//! the text that still leaves room for the optional trailing priority
//! token. The assignee token is returned raw; resolving it against the
//! known user set is the caller's responsibility.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::task::TaskPriority;
use crate::error::{Error, Result};

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:@bot\s+)?(\S+)\s+(.+?)\s+(\d{1,2}/\d{1,2})(?:\s+(high|med|low|高|中|低))?$")
        .expect("command pattern is valid")
});

/// Usage hint carried by parse errors.
pub const USAGE_HINT: &str =
    "expected: [@bot] <assignee> <title> <M/D> [High|Med|Low|高|中|低], e.g. @bot 田中 レポート提出 11/10 High";

/// A successfully parsed task-creation command.
///
/// `due_date` is the raw `M/D` token; resolving it to an absolute date is a
/// separate step (see [`crate::dates::resolve_month_day`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub assignee_name: String,
    pub title: String,
    pub due_date: String,
    pub priority: TaskPriority,
}

/// Parse a free-text command into a [`ParsedCommand`].
///
/// On any structural mismatch (missing date token, empty title, leading
/// garbage) the whole parse fails with a single [`Error::CommandFormat`]
/// carrying a usage hint; fields are never partially populated.
pub fn parse_command(text: &str) -> Result<ParsedCommand> {
    let captures = COMMAND_RE
        .captures(text.trim())
        .ok_or_else(|| Error::CommandFormat(USAGE_HINT.to_string()))?;

    Ok(ParsedCommand {
        assignee_name: captures[1].to_string(),
        title: captures[2].to_string(),
        due_date: captures[3].to_string(),
        priority: normalize_priority(captures.get(4).map(|m| m.as_str())),
    })
}

/// Normalize a priority token, failing open to Medium.
///
/// English forms are case-insensitive; an absent or unrecognized token is
/// Medium, never an error.
pub fn normalize_priority(token: Option<&str>) -> TaskPriority {
    let Some(token) = token else {
        return TaskPriority::Medium;
    };
    match token.to_lowercase().as_str() {
        "high" | "高" => TaskPriority::High,
        "med" | "中" => TaskPriority::Medium,
        "low" | "低" => TaskPriority::Low,
        _ => TaskPriority::Medium,
    }
}
