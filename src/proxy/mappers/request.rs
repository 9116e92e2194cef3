// Inbound → upstream request conversion
use serde_json::{json, Value};

/// Model injected when the caller does not name one.
pub const DEFAULT_MODEL: &str = "deepseek-ai/deepseek-r1-distill-qwen-14b";

/// Build the outbound payload from an inbound chat-completion request.
///
/// The inbound document is copied, never mutated. Every field other than
/// `model` passes through untouched, unknown fields included; `model` keeps
/// the caller's value when it is a non-empty string and is otherwise set to
/// [`DEFAULT_MODEL`].
pub fn build_upstream_request(inbound: &Value) -> Value {
    let mut outbound = inbound.clone();

    let needs_default = match inbound.get("model") {
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Null) | None => true,
        Some(_) => false,
    };

    if needs_default {
        if let Some(obj) = outbound.as_object_mut() {
            obj.insert("model".to_string(), json!(DEFAULT_MODEL));
        }
    }

    outbound
}
