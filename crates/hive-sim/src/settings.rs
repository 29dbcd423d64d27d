//! `SimSettings`: every configuration block of a run in one JSON document.
//!
//! ```json
//! {
//!   "sim":    { "seed": 7, "dt": 0.0166667 },
//!   "world":  { "capacity_max": 2.0 },
//!   "bus":    { "capacity": 32, "kind_capacity": { "waggle": 16 } },
//!   "colony": { "sensing_radius": 120.0, "tunables": { "receiver_rate": 2.0 } }
//! }
//! ```
//!
//! Every block and every field is optional; omitted values take their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use hive_agent::ColonyParams;
use hive_core::SimConfig;
use hive_signal::BusConfig;
use hive_world::WorldConfig;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub sim:    SimConfig,
    pub world:  WorldConfig,
    pub bus:    BusConfig,
    pub colony: ColonyParams,
}

impl SimSettings {
    /// Parse and validate a JSON settings document.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let settings: SimSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a JSON settings file.
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        self.world.validate().map_err(SimError::Config)?;
        self.bus.validate()?;
        self.colony.validate()?;
        Ok(())
    }
}
