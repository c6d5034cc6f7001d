use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single controllable light: a stable id, a human-readable name, and its
/// current power state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub id: u32,
    pub name: String,
    pub is_on: bool,
}

impl Light {
    pub fn new(id: u32, name: impl Into<String>, is_on: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_on,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no light with id {0}")]
pub struct UnknownLight(pub u32);

/// Owns every `Light` for the lifetime of the process. The set of lights is
/// fixed at construction; only the power state of a light ever changes, and
/// only through [`LightRegistry::set_state`].
pub struct LightRegistry {
    lights: Vec<Light>,
}

impl LightRegistry {
    /// Ids must be unique within the registry.
    pub fn new(lights: Vec<Light>) -> Self {
        debug_assert!(
            lights.iter().map(|l| l.id).collect::<HashSet<_>>().len() == lights.len(),
            "light ids must be unique"
        );

        Self { lights }
    }

    /// The default installation: two lamps off, the chandelier already on.
    pub fn default_installation() -> Self {
        Self::new(vec![
            Light::new(1, "Table Lamp", false),
            Light::new(2, "Porch Light", false),
            Light::new(3, "Chandelier", true),
        ])
    }

    /// Every light, in construction order. Read-only; never fails.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Sets the power state of the light with the given id and returns the
    /// updated record for confirmation. An unknown id leaves every light
    /// untouched. Setting a light to its current state succeeds.
    pub fn set_state(&mut self, id: u32, is_on: bool) -> Result<&Light, UnknownLight> {
        let light = self
            .lights
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(UnknownLight(id))?;

        light.is_on = is_on;

        Ok(&*light)
    }
}
