//! TOML configuration
//!
//! Datasets rarely agree on what to call their axes. The configuration file teaches the
//! [`DIMENSION_REGISTRY`] extra spellings, mapping each alias onto a dimension name the
//! registry already knows:
//!
//! ```toml
//! [dimensions.aliases]
//! rlon = "Lon"
//! rlat = "Lat"
//! isobaric = "Pre"
//! ```
//!
//! ```rust
//! use climops_core::config::ClimopsConfig;
//! use climops_core::dimensions::Dim;
//!
//! let config = ClimopsConfig::from_toml_str("[dimensions.aliases]\nrlat = \"Lat\"\n").unwrap();
//! config.apply().unwrap();
//! assert_eq!(Dim::from_name("rlat").unwrap(), Dim::Lat);
//! ```

use crate::dimensions::{Dim, DimensionRegistry, DIMENSION_REGISTRY};
use crate::errors::{ClimError, ClimResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClimopsConfig {
    pub dimensions: DimensionConfig,
}

/// Extra dimension names, keyed by alias
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionConfig {
    pub aliases: BTreeMap<String, String>,
}

impl ClimopsConfig {
    pub fn from_toml_str(s: &str) -> ClimResult<Self> {
        toml::from_str(s).map_err(|e| ClimError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> ClimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClimError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> ClimResult<String> {
        toml::to_string(self).map_err(|e| ClimError::Config(e.to_string()))
    }

    /// Registers the configured aliases with the global [`DIMENSION_REGISTRY`].
    pub fn apply(&self) -> ClimResult<()> {
        self.apply_to(&DIMENSION_REGISTRY)
    }

    /// Registers the configured aliases with `registry`.
    ///
    /// Every target is resolved before anything is registered, so an unknown target leaves
    /// the registry untouched.
    ///
    /// # Errors
    ///
    /// * [`ClimError::UnknownDimension`] if a target is not a known dimension name
    /// * [`ClimError::Config`] if an alias already refers to a different dimension
    pub fn apply_to(&self, registry: &DimensionRegistry) -> ClimResult<()> {
        let resolved = self
            .dimensions
            .aliases
            .iter()
            .map(|(alias, target)| {
                registry
                    .lookup(target)
                    .map(|dim| (alias.as_str(), dim))
                    .ok_or_else(|| ClimError::UnknownDimension(target.clone()))
            })
            .collect::<ClimResult<Vec<(&str, Dim)>>>()?;

        debug!("applying {} dimension aliases", resolved.len());
        for (alias, dim) in resolved {
            registry.register_alias(alias, dim)?;
        }
        Ok(())
    }
}
