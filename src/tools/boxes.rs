//! Box-picking demo tool: a named set of boxes whose contents the model
//! reveals at most once each.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde_json::json;

use super::ToolHandler;
use crate::types::FunctionDeclaration;

pub const PICK_BOX_TOOL: &str = "pick_box";

/// Session-scoped box state. Clones share the same state, so one clone can
/// be registered as the tool handler while another drives a display.
#[derive(Clone)]
pub struct BoxPicker {
    inner: Arc<Mutex<BoxState>>,
}

struct BoxState {
    boxes: HashMap<String, String>,
    opened: HashSet<String>,
}

impl BoxPicker {
    pub fn new(boxes: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoxState {
                boxes: boxes.into_iter().collect(),
                opened: HashSet::new(),
            })),
        }
    }

    /// The declaration to advertise in the setup frame.
    pub fn declaration() -> FunctionDeclaration {
        FunctionDeclaration::new(
            PICK_BOX_TOOL.to_string(),
            "Picks the box by name".to_string(),
            json!({
                "type": "OBJECT",
                "properties": {
                    "box_name": {"type": "STRING", "description": "Name of the box"}
                },
                "required": ["box_name"],
            }),
        )
    }

    /// Names of the boxes revealed so far.
    pub fn opened(&self) -> HashSet<String> {
        self.inner
            .lock()
            .map(|state| state.opened.clone())
            .unwrap_or_default()
    }
}

impl ToolHandler for BoxPicker {
    fn call(&self, args: &serde_json::Value) -> anyhow::Result<String> {
        let name = args
            .get("box_name")
            .and_then(|v| v.as_str())
            .context("missing box_name argument")?;
        let mut state = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("box state lock poisoned"))?;
        match state.boxes.get(name).cloned() {
            None => Ok("No box found".to_string()),
            Some(_) if state.opened.contains(name) => {
                Ok("You already opened that box".to_string())
            }
            Some(contents) => {
                state.opened.insert(name.to_string());
                Ok(contents)
            }
        }
    }
}
