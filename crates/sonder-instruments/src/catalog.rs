use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::all_instruments;
use crate::error::InstrumentError;
use crate::scale::ScaleDefinition;

/// Listing entry for an active scale.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ScaleSummary {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub version: String,
    pub item_count: u32,
}

/// Read-only registry of validated scale definitions.
#[derive(Debug, Clone, Default)]
pub struct ScaleCatalog {
    scales: BTreeMap<String, Arc<ScaleDefinition>>,
}

impl ScaleCatalog {
    /// Catalog of the bundled instruments.
    pub fn builtin() -> Result<Self, InstrumentError> {
        Self::from_definitions(
            all_instruments()
                .iter()
                .map(|i| i.definition().clone()),
        )
    }

    /// Build a catalog from arbitrary definitions (e.g. an administrative
    /// import). Every definition is validated; one bad definition rejects
    /// the whole set.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ScaleDefinition>,
    ) -> Result<Self, InstrumentError> {
        let mut scales = BTreeMap::new();
        for definition in definitions {
            definition.validate()?;
            let id = definition.id.clone();
            if scales.insert(id.clone(), Arc::new(definition)).is_some() {
                return Err(InstrumentError::DuplicateScale(id));
            }
        }
        tracing::debug!(count = scales.len(), "scale catalog loaded");
        Ok(Self { scales })
    }

    /// Parse a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, InstrumentError> {
        let definitions: Vec<ScaleDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Look up an active scale.
    ///
    /// Unknown and deactivated ids produce the same error so callers cannot
    /// enumerate retired scales.
    pub fn get_scale(&self, id: &str) -> Result<Arc<ScaleDefinition>, InstrumentError> {
        self.scales
            .get(id)
            .filter(|s| s.active)
            .cloned()
            .ok_or_else(|| InstrumentError::ScaleNotFound(id.to_string()))
    }

    /// Definition bound to an existing assessment, deactivated or not.
    ///
    /// Retiring a scale must not strand assessments already in flight.
    pub fn bound_scale(&self, id: &str) -> Result<Arc<ScaleDefinition>, InstrumentError> {
        self.scales
            .get(id)
            .cloned()
            .ok_or_else(|| InstrumentError::ScaleNotFound(id.to_string()))
    }

    /// Active scales, sorted by id.
    pub fn list_active(&self) -> Vec<ScaleSummary> {
        self.scales
            .values()
            .filter(|s| s.active)
            .map(|s| ScaleSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                abbreviation: s.abbreviation.clone(),
                version: s.version.clone(),
                item_count: s.items.len() as u32,
            })
            .collect()
    }
}
