//! Dispatch layer for model-initiated function calls.

use std::collections::HashMap;

use crate::types::{FunctionResponse, ToolCall, ToolResponse};

pub mod boxes;

/// An application-supplied function the model may invoke mid-dialogue.
///
/// Handlers are synchronous from the dispatcher's point of view: the inbound
/// read loop does not resume until the handler returns, which keeps tool
/// calls ordered relative to the content frames that follow them.
pub trait ToolHandler: Send + Sync {
    fn call(&self, args: &serde_json::Value) -> anyhow::Result<String>;
}

impl<F> ToolHandler for F
where
    F: Fn(&serde_json::Value) -> anyhow::Result<String> + Send + Sync,
{
    fn call(&self, args: &serde_json::Value) -> anyhow::Result<String> {
        self(args)
    }
}

/// Fixed table mapping function names to handlers for one session.
#[derive(Default)]
pub struct ToolDispatcher {
    handlers: HashMap<String, Box<dyn ToolHandler>>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn with_handler(mut self, name: &str, handler: impl ToolHandler + 'static) -> Self {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Processes every invocation in the batch, independently and in order,
    /// and builds the single response frame for it. Unknown names and
    /// handler failures become error-shaped results; they never fail the
    /// batch or drop an entry.
    pub fn dispatch(&self, call: &ToolCall) -> ToolResponse {
        let mut responses = Vec::with_capacity(call.function_calls().len());
        for invocation in call.function_calls() {
            let result = match self.handlers.get(invocation.name()) {
                Some(handler) => match handler.call(invocation.args()) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!("tool {} failed: {:#}", invocation.name(), e);
                        format!("Tool call failed: {}", e)
                    }
                },
                None => {
                    tracing::warn!("model invoked unknown tool: {}", invocation.name());
                    "Tool not found".to_string()
                }
            };
            responses.push(FunctionResponse::new(
                invocation.id(),
                invocation.name(),
                result,
            ));
        }
        ToolResponse::new(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(frame: serde_json::Value) -> ToolCall {
        serde_json::from_value(frame).unwrap()
    }

    #[test]
    fn test_batch_yields_one_result_per_invocation_in_order() {
        let dispatcher = ToolDispatcher::new().with_handler(
            "echo",
            |args: &serde_json::Value| -> anyhow::Result<String> {
                Ok(args["word"].as_str().unwrap_or("").to_string())
            },
        );

        let response = dispatcher.dispatch(&call(json!({
            "functionCalls": [
                {"id": "a", "name": "echo", "args": {"word": "first"}},
                {"id": "b", "name": "echo", "args": {"word": "second"}},
            ]
        })));

        let entries = response.function_responses();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id(), "a");
        assert_eq!(entries[0].result(), "first");
        assert_eq!(entries[1].id(), "b");
        assert_eq!(entries[1].result(), "second");
    }

    #[test]
    fn test_unknown_tool_gets_not_found_result() {
        let dispatcher = ToolDispatcher::new();

        let response = dispatcher.dispatch(&call(json!({
            "functionCalls": [{"id": "1", "name": "open_sesame", "args": {}}]
        })));

        assert_eq!(response.function_responses()[0].result(), "Tool not found");
        assert_eq!(response.function_responses()[0].name(), "open_sesame");
    }

    #[test]
    fn test_handler_failure_becomes_error_shaped_result() {
        let dispatcher = ToolDispatcher::new().with_handler(
            "broken",
            |_args: &serde_json::Value| -> anyhow::Result<String> {
                Err(anyhow::anyhow!("backing store unavailable"))
            },
        );

        let response = dispatcher.dispatch(&call(json!({
            "functionCalls": [
                {"id": "1", "name": "broken", "args": {}},
                {"id": "2", "name": "broken", "args": {}},
            ]
        })));

        let entries = response.function_responses();
        assert_eq!(entries.len(), 2, "failures must not drop batch entries");
        assert_eq!(entries[0].result(), "Tool call failed: backing store unavailable");
    }
}
