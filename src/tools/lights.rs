use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::lights::LightRegistry;

use super::{Tool, ToolDefinition, ToolError};

pub struct GetLights;

impl Tool for GetLights {
    fn name(&self) -> &'static str {
        "get_lights"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Gets a list of lights and their current state",
            json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        )
    }

    fn invoke(
        &self,
        lights: &mut LightRegistry,
        _arguments: &str,
    ) -> Result<serde_json::Value, ToolError> {
        Ok(serde_json::to_value(lights.lights()).expect("lights serialize to json"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeStateArgs {
    id: u32,
    is_on: bool,
}

pub struct ChangeState;

impl Tool for ChangeState {
    fn name(&self) -> &'static str {
        "change_state"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Changes the state of the light",
            json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "integer",
                        "description": "The id of the light to change",
                    },
                    "is_on": {
                        "type": "boolean",
                        "description": "The new power state, true for on",
                    },
                },
                "required": ["id", "is_on"],
            }),
        )
    }

    fn invoke(
        &self,
        lights: &mut LightRegistry,
        arguments: &str,
    ) -> Result<serde_json::Value, ToolError> {
        // No coercion of malformed values; the typed parse is the validation.
        let args: ChangeStateArgs =
            serde_json::from_str(arguments).map_err(|source| ToolError::InvalidArguments {
                name: self.name().into(),
                source,
            })?;

        let light = lights.set_state(args.id, args.is_on)?;

        debug!(
            "Light {} is now {}",
            light.id,
            if light.is_on { "on" } else { "off" }
        );

        Ok(serde_json::to_value(light).expect("light serializes to json"))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeState, Tool, ToolError};
    use crate::lights::{Light, LightRegistry};

    fn two_lights() -> LightRegistry {
        LightRegistry::new(vec![
            Light::new(1, "Table Lamp", false),
            Light::new(2, "Porch Light", false),
        ])
    }

    fn assert_invalid_arguments(arguments: &str) {
        let mut registry = two_lights();
        let before: Vec<Light> = registry.lights().to_vec();

        let result = ChangeState.invoke(&mut registry, arguments);

        assert!(matches!(
            result,
            Err(ToolError::InvalidArguments { name, .. }) if name == "change_state"
        ));
        assert_eq!(registry.lights(), before.as_slice());
    }

    #[test]
    fn test_non_boolean_state_is_rejected() {
        assert_invalid_arguments(r#"{"id": 1, "is_on": "yes"}"#);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert_invalid_arguments(r#"{"is_on": true}"#);
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert_invalid_arguments("[1, true]");
    }

    #[test]
    fn test_unexpected_fields_are_rejected() {
        assert_invalid_arguments(r#"{"id": 1, "is_on": true, "brightness": 40}"#);
    }
}
