//! Small utility helpers used across modules.

use serde::{Deserialize, Deserializer};

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

/// "1 question", "3 questions".
pub fn plural(n: usize, word: &str) -> String {
  if n == 1 { format!("{} {}", n, word) } else { format!("{} {}s", n, word) }
}

/// Backend ids are opaque. Some deployments send them as JSON numbers,
/// so accept either and keep the textual form.
pub fn opaque_id<'de, D>(de: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match serde_json::Value::deserialize(de)? {
    serde_json::Value::String(s) => Ok(s),
    serde_json::Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!("expected string or number id, got {}", other))),
  }
}
