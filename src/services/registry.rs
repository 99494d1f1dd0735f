//! Indicator registry: name lookup over a fixed set of definitions

use std::collections::HashMap;

use super::indicator::{builtin_definitions, IndicatorDefinition};
use crate::types::{LeadError, Result};

/// Registry of indicator definitions, keyed by unique name
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    definitions: Vec<IndicatorDefinition>,
    by_name: HashMap<String, usize>,
}

impl IndicatorRegistry {
    /// Register `definitions`; names must be pairwise unique
    pub fn new(definitions: Vec<IndicatorDefinition>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(definitions.len());
        for (idx, def) in definitions.iter().enumerate() {
            if by_name.insert(def.name.clone(), idx).is_some() {
                return Err(LeadError::DuplicateName(def.name.clone()));
            }
        }
        Ok(Self {
            definitions,
            by_name,
        })
    }

    /// Registry with the built-in indicators
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_definitions())
    }

    /// Names in registration order
    pub fn list_names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn definitions(&self) -> &[IndicatorDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Result<&IndicatorDefinition> {
        self.by_name
            .get(name)
            .map(|&idx| &self.definitions[idx])
            .ok_or_else(|| LeadError::NotFound(name.to_string()))
    }
}
