//! Loading a grid page pair from disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use gridtree_lib::HierarchyConfig;
use gridtree_lib::model::Record;
use serde::Deserialize;

use crate::error::CliError;

/// One page of each dataset plus the widget's hierarchy properties.
#[derive(Debug, Deserialize)]
pub struct GridPage {
    #[serde(default)]
    pub parents: Vec<Record>,
    #[serde(default)]
    pub children: Vec<Record>,
    #[serde(default)]
    pub config: HierarchyConfig,
}

impl GridPage {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Splits the page into shared record collections.
    pub fn into_parts(self) -> (HierarchyConfig, Vec<Arc<Record>>, Vec<Arc<Record>>) {
        (
            self.config,
            self.parents.into_iter().map(Arc::new).collect(),
            self.children.into_iter().map(Arc::new).collect(),
        )
    }
}
