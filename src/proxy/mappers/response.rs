// Upstream response rewriting
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Non-greedy so each opening tag pairs with the first closing tag after it;
// (?s) lets the region span newlines.
static THINKING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<thinking>.*?</thinking>").expect("valid thinking-tag regex"));

/// Remove every `<thinking>...</thinking>` region from generated text.
pub fn strip_thinking_tags(content: &str) -> String {
    THINKING_TAG_RE.replace_all(content, "").into_owned()
}

/// Rewrite `choices[].message.content` through [`strip_thinking_tags`].
///
/// Bodies without the `choices`/`message`/`content` nesting pass through
/// unchanged; choice order and all other fields are preserved exactly.
pub fn transform_completion_response(mut body: Value) -> Value {
    if let Some(choices) = body.get_mut("choices").and_then(|c| c.as_array_mut()) {
        for choice in choices {
            let content = choice.get_mut("message").and_then(|m| m.get_mut("content"));
            if let Some(content) = content {
                if let Some(text) = content.as_str() {
                    *content = Value::String(strip_thinking_tags(text));
                }
            }
        }
    }

    body
}
