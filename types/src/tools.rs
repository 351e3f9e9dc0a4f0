/// One group of function declarations advertised in the `setup` frame.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Tool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionDeclaration>,
}

impl Tool {
    pub fn new(function_declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            function_declarations,
        }
    }

    pub fn function_declarations(&self) -> &[FunctionDeclaration] {
        &self.function_declarations
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FunctionDeclaration {
    /// The name of the function
    name: String,

    /// The description of the function
    description: String,

    /// The parameters of the function in JSON Schema format
    parameters: serde_json::Value,
}

impl FunctionDeclaration {
    pub fn new(name: String, description: String, parameters: serde_json::Value) -> Self {
        Self {
            name,
            description,
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }
}

/// `toolCall` frame payload: the model requests function invocations.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    function_calls: Vec<FunctionCall>,
}

impl ToolCall {
    pub fn function_calls(&self) -> &[FunctionCall] {
        &self.function_calls
    }
}

/// One function invocation requested by the model.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FunctionCall {
    id: String,
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

impl FunctionCall {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &serde_json::Value {
        &self.args
    }
}

/// `tool_response` frame payload: one entry per invocation in the batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResponse {
    function_responses: Vec<FunctionResponse>,
}

impl ToolResponse {
    pub fn new(function_responses: Vec<FunctionResponse>) -> Self {
        Self { function_responses }
    }

    pub fn function_responses(&self) -> &[FunctionResponse] {
        &self.function_responses
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FunctionResponse {
    /// Invocation id this result correlates to
    id: String,
    name: String,
    response: FunctionResult,
}

impl FunctionResponse {
    pub fn new(id: &str, name: &str, result: String) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            response: FunctionResult { result },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result(&self) -> &str {
        &self.response.result
    }
}

#[derive(Debug, Clone, serde::Serialize)]
struct FunctionResult {
    result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_function_declaration_serializes_camel_case_group() {
        let declaration = FunctionDeclaration::new(
            "pick_box".to_string(),
            "Picks the box by name".to_string(),
            json!({
                "type": "OBJECT",
                "properties": {"box_name": {"type": "STRING"}},
                "required": ["box_name"],
            }),
        );
        let json = serde_json::to_value(&Tool::new(vec![declaration])).unwrap();
        assert_eq!(json["functionDeclarations"][0]["name"], "pick_box");
        assert_eq!(
            json["functionDeclarations"][0]["parameters"]["required"][0],
            "box_name"
        );
    }

    #[test]
    fn test_tool_call_deserializes_args() {
        let call: ToolCall = serde_json::from_str(
            r#"{"functionCalls":[{"id":"1","name":"pick_box","args":{"box_name":"green"}}]}"#,
        )
        .unwrap();
        assert_eq!(call.function_calls().len(), 1);
        let fc = &call.function_calls()[0];
        assert_eq!(fc.id(), "1");
        assert_eq!(fc.name(), "pick_box");
        assert_eq!(fc.args()["box_name"], "green");
    }

    #[test]
    fn test_tool_call_tolerates_missing_args() {
        let call: ToolCall =
            serde_json::from_str(r#"{"functionCalls":[{"id":"2","name":"noop"}]}"#).unwrap();
        assert!(call.function_calls()[0].args().is_null());
    }

    #[test]
    fn test_tool_response_wire_shape() {
        let response = ToolResponse::new(vec![FunctionResponse::new("1", "pick_box", "Q?".to_string())]);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"function_responses":[{"id":"1","name":"pick_box","response":{"result":"Q?"}}]}"#
        );
    }
}
