//! Response post-processing for chat-completion providers.
//!
//! Chat-compatible servers disagree on where the answer lives.  Besides the
//! plain `choices[0].message.content` string we see nested objects
//! (`{"content": …}` / `{"text": …}`), arrays of typed segments mixing
//! reasoning and output, legacy `choices[0].text`, and the top-level
//! `output_text` / `output` fields of the responses API.

use serde_json::Value;

/// Segment types that carry the model's thinking rather than its answer.
const REASONING_TYPES: &[&str] = &["reasoning", "thinking", "thought", "reasoning_content"];

/// Segment types explicitly marking the answer.
const OUTPUT_TYPES: &[&str] = &["output_text"];

/// Pull the answer text out of a chat-completions (or responses API) body.
///
/// Returns `None` when no answer text can be found.
pub fn extract_content(body: &Value) -> Option<String> {
    let choice = body.get("choices").and_then(|c| c.get(0));

    let candidates = [
        choice.and_then(|c| c.get("message")).and_then(|m| m.get("content")),
        choice.and_then(|c| c.get("text")),
        body.get("output_text"),
        body.get("output"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(content_text)
        .filter(|s| !s.trim().is_empty())
}

/// Flatten one content value into text.
fn content_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("content")
            .and_then(content_text)
            .or_else(|| map.get("text").and_then(content_text))
            .or_else(|| map.get("value").and_then(content_text)),
        Value::Array(items) => segments_text(items),
        _ => None,
    }
}

/// Join an array of segments, preferring ones tagged as output text.
fn segments_text(items: &[Value]) -> Option<String> {
    let tagged: Vec<&Value> = items
        .iter()
        .filter(|item| segment_type(item).is_some_and(|t| OUTPUT_TYPES.contains(&t.as_str())))
        .collect();

    let chosen: Vec<&Value> = if tagged.is_empty() {
        items.iter().filter(|item| !is_reasoning(item)).collect()
    } else {
        tagged
    };

    let parts: Vec<String> = chosen.into_iter().filter_map(content_text).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

fn segment_type(item: &Value) -> Option<String> {
    item.get("type")
        .and_then(Value::as_str)
        .map(|t| t.to_ascii_lowercase())
}

fn is_reasoning(item: &Value) -> bool {
    if item.get("thought").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    segment_type(item).is_some_and(|t| REASONING_TYPES.contains(&t.as_str()))
}

/// Remove every `start … end` block.  A dangling `end` (some models omit the
/// opening tag) drops everything before it; a dangling `start` drops
/// everything after it.
pub fn strip_reasoning(text: &str, start: &str, end: &str) -> String {
    if start.is_empty() || end.is_empty() {
        return text.to_string();
    }

    let mut rest = text;
    if let Some(close) = rest.find(end) {
        if !rest[..close].contains(start) {
            rest = &rest[close + end.len()..];
        }
    }

    let mut out = String::with_capacity(rest.len());
    while let Some(open) = rest.find(start) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + start.len()..];
        match after_open.find(end) {
            Some(close) => rest = &after_open[close + end.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
