pub mod lights;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::lights::{LightRegistry, UnknownLight};

/// Description of one callable operation, in the shape the chat-completions
/// API expects inside a request's `tools` array.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    kind: String,

    function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    name: String,
    description: String,

    /// JSON Schema for the argument object.
    parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function".into(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("no function named {0:?} is registered")]
    UnknownTool(String),

    #[error("invalid arguments for {name}: {source}")]
    InvalidArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    UnknownLight(#[from] UnknownLight),
}

pub trait Tool {
    fn name(&self) -> &'static str;

    fn definition(&self) -> ToolDefinition;

    /// Runs the tool against the registry. `arguments` is the JSON-encoded
    /// argument object as produced by the model.
    fn invoke(
        &self,
        lights: &mut LightRegistry,
        arguments: &str,
    ) -> Result<serde_json::Value, ToolError>;
}

/// The registration table handed to the chat loop: every operation the model
/// may invoke, with its schema and bound callable. Built once at startup.
pub struct ToolTable {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolTable {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// The full light-control surface.
    pub fn lights_control() -> Self {
        Self::new(vec![
            Box::new(lights::GetLights),
            Box::new(lights::ChangeState),
        ])
    }

    /// The definitions to advertise in a chat request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn invoke(
        &self,
        lights: &mut LightRegistry,
        name: &str,
        arguments: &str,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_owned()))?;

        debug!("Dispatching {name} with arguments: {arguments}");

        tool.invoke(lights, arguments)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ToolError, ToolTable};
    use crate::lights::{Light, LightRegistry};

    fn two_lights() -> LightRegistry {
        LightRegistry::new(vec![
            Light::new(1, "Table Lamp", false),
            Light::new(2, "Porch Light", false),
        ])
    }

    #[test]
    fn test_get_lights_matches_registry_listing() {
        let mut registry = two_lights();
        let table = ToolTable::lights_control();

        let output = table.invoke(&mut registry, "get_lights", "{}").unwrap();

        assert_eq!(output, serde_json::to_value(registry.lights()).unwrap());
    }

    #[test]
    fn test_change_state_mutates_exactly_one_light() {
        let mut registry = two_lights();
        let table = ToolTable::lights_control();

        let output = table
            .invoke(&mut registry, "change_state", r#"{"id": 1, "is_on": true}"#)
            .unwrap();

        assert_eq!(
            output,
            json!({ "id": 1, "name": "Table Lamp", "is_on": true })
        );
        assert!(registry.lights()[0].is_on);
        assert!(!registry.lights()[1].is_on);
    }

    #[test]
    fn test_unknown_function_name_is_rejected() {
        let mut registry = two_lights();
        let table = ToolTable::lights_control();

        let result = table.invoke(&mut registry, "open_garage", "{}");

        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "open_garage"));
    }

    #[test]
    fn test_unknown_light_id_is_reported_and_harmless() {
        let mut registry = two_lights();
        let table = ToolTable::lights_control();
        let before: Vec<Light> = registry.lights().to_vec();

        let result = table.invoke(&mut registry, "change_state", r#"{"id": 99, "is_on": true}"#);

        assert!(matches!(result, Err(ToolError::UnknownLight(_))));
        assert_eq!(registry.lights(), before.as_slice());
    }
}
