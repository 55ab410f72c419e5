//! Scoping selectors limit which parts of a page are scanned

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopingInputType {
    Include,
    Exclude,
}

/// A selector is a path of CSS selectors, outermost frame first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selectors {
    #[serde(default)]
    pub include: Vec<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<Vec<String>>,
}

impl Selectors {
    pub fn list_mut(&mut self, input_type: ScopingInputType) -> &mut Vec<Vec<String>> {
        match input_type {
            ScopingInputType::Include => &mut self.include,
            ScopingInputType::Exclude => &mut self.exclude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopingStoreData {
    #[serde(default)]
    pub selectors: Selectors,
}
