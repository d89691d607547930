//! Records and operations for every resource kind the bridge manages.
//!
//! Records are transient views: each call fetches them fresh and nothing is
//! cached between calls.

use crate::validate;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Implements [`crate::collection::Keyed`] for a record with an `id` field.
macro_rules! keyed {
    ($record:ty, $id:ty) => {
        impl crate::collection::Keyed for $record {
            type Id = $id;

            fn id(&self) -> &$id {
                &self.id
            }

            fn set_id(&mut self, id: $id) {
                self.id = id;
            }
        }
    };
}

mod configuration;
mod group;
mod light;
mod resourcelink;
mod rule;
mod scene;
mod schedule;
mod sensor;

pub use configuration::*;
pub use group::*;
pub use light::*;
pub use resourcelink::*;
pub use rule::*;
pub use scene::*;
pub use schedule::*;
pub use sensor::*;

/// Color and power state shared by `/lights/{id}/state` and `/groups/{id}/action`.
///
/// ### Example
/// ```
/// let command = huebridge::LightCommand::default()
///     .on()
///     .with_xy(0.2, 0.9)
///     .with_brightness(100)
///     .with_transition_time(4);
/// assert_eq!(command.bri, Some(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xy: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Multiples of 100ms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitiontime: Option<u16>,
}

impl LightCommand {
    /// Turns on and sets every color parameter at once, after range checks.
    pub fn color(x: f64, y: f64, bri: u8, hue: u32, sat: u8) -> Result<Self> {
        validate::color_params(x, y, bri, hue, sat)?;
        Ok(Self::default()
            .on()
            .with_xy(x, y)
            .with_brightness(bri)
            .with_hue(hue)
            .with_saturation(sat))
    }

    pub fn on(self) -> Self {
        Self {
            on: Some(true),
            ..self
        }
    }

    pub fn off(self) -> Self {
        Self {
            on: Some(false),
            ..self
        }
    }

    pub fn with_xy(self, x: f64, y: f64) -> Self {
        Self {
            xy: Some([x, y]),
            ..self
        }
    }

    pub fn with_brightness(self, bri: u8) -> Self {
        Self {
            bri: Some(bri),
            ..self
        }
    }

    pub fn with_hue(self, hue: u32) -> Self {
        Self {
            hue: Some(hue),
            ..self
        }
    }

    pub fn with_saturation(self, sat: u8) -> Self {
        Self {
            sat: Some(sat),
            ..self
        }
    }

    pub fn with_mired(self, ct: u16) -> Self {
        Self {
            ct: Some(ct),
            ..self
        }
    }

    pub fn with_transition_time(self, deciseconds: u16) -> Self {
        Self {
            transitiontime: Some(deciseconds),
            ..self
        }
    }

    /// Range-checks whichever color parameters are set.
    pub(crate) fn validate(&self) -> Result<()> {
        let [x, y] = self.xy.unwrap_or([0.0, 0.0]);
        validate::color_params(
            x,
            y,
            self.bri.unwrap_or(1),
            self.hue.unwrap_or(0),
            self.sat.unwrap_or(0),
        )
    }
}

/// The bridge lists member lights by their IDs as strings.
pub(crate) fn id_strings(ids: &[u32]) -> Vec<String> {
    ids.iter().map(u32::to_string).collect()
}
