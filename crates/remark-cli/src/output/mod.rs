//! Output formatting module for remark
//!
//! Provides text and JSON output formats for CLI output.

use anyhow::Result;
use remark_core::CommentNode;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format - machine-readable output
    Json,
    /// Plain text format - concise, token-efficient output
    #[default]
    Text,
}

/// Formatter that can output data in text or JSON format
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter with the specified output format
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format data according to the configured output format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
            OutputFormat::Text => {
                let value = serde_json::to_value(data)?;
                Ok(render_text(&value))
            }
        }
    }

    /// Format and print data to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        let output = self.format(data)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    }

    /// Format a thread's reply tree.
    ///
    /// JSON wraps the nested nodes in an object with the thread identifier
    /// and total comment count. Text prints one comment per line, indented
    /// two spaces per level.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format_tree(&self, thread_id: &str, tree: &[CommentNode]) -> Result<String> {
        let count: usize = tree.iter().map(CommentNode::comment_count).sum();
        match self.format {
            OutputFormat::Json => {
                let envelope = serde_json::json!({
                    "thread_id": thread_id,
                    "count": count,
                    "comments": tree,
                });
                Ok(serde_json::to_string_pretty(&envelope)?)
            }
            OutputFormat::Text => {
                if tree.is_empty() {
                    return Ok(format!("No comments on {thread_id}"));
                }
                let lines: Vec<String> = tree
                    .iter()
                    .flat_map(CommentNode::walk)
                    .map(|(depth, comment)| {
                        format!(
                            "{indent}{id}  {author}  {ts}  {body}",
                            indent = "  ".repeat(depth),
                            id = comment.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                            author = comment.author,
                            ts = comment.created_at.format("%Y-%m-%d %H:%M"),
                            body = quote_text(&comment.body),
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format and print a thread's reply tree to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print_tree(&self, thread_id: &str, tree: &[CommentNode]) -> Result<()> {
        let output = self.format_tree(thread_id, tree)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

/// Keys that identify a record. Whichever are present lead the line, bare.
const ID_KEYS: [&str; 4] = ["identifier", "thread_id", "comment_id", "id"];

/// Render a JSON value as concise text: one line per record.
fn render_text(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let ids = ID_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .filter(|val| !val.is_null())
                .map(render_field_value);
            let fields = map
                .iter()
                .filter(|(key, val)| !ID_KEYS.contains(&key.as_str()) && !is_blank(val))
                .map(|(key, val)| format!("{key}:{}", render_field_value(val)));
            ids.chain(fields).collect::<Vec<_>>().join("  ")
        }
        Value::Array(records) => records
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n"),
        scalar => render_field_value(scalar),
    }
}

/// Null and empty-list fields carry nothing worth a column.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Quote text that would otherwise split the line into extra columns.
fn quote_text(text: &str) -> String {
    if text.contains([' ', '\n']) {
        format!("\"{}\"", text.replace('\n', "\\n"))
    } else {
        text.to_string()
    }
}

/// Render a single field value inline.
fn render_field_value(value: &Value) -> String {
    match value {
        Value::String(text) => quote_text(text),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_field_value).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .filter(|(_, val)| !val.is_null())
                .map(|(key, val)| format!("{key}:{}", render_field_value(val)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        other => other.to_string(),
    }
}
