//! Old to new Maven coordinates of Besu artifacts
//!
//! Besu republished several of its libraries under new coordinates. A plugin's
//! graph can still pull the old ones in transitively, and reconciliation must
//! treat those as superseded instead of as plugin-only libraries.

use std::collections::BTreeMap;
use std::path::Path;

use besu_dist_protocol::ModuleId;

use crate::types::{BesuDistError, BesuDistResult};

const BUNDLED_MAPPING: &str = include_str!("../resources/maven-coordinates-mapping.txt");
const BUNDLED_MAPPING_NAME: &str = "maven-coordinates-mapping.txt";

/// Read-only table from old `group:name` to new `group:name`
#[derive(Debug, Clone, Default)]
pub struct CoordinateRemapper {
    old_to_new: BTreeMap<ModuleId, ModuleId>,
}

impl CoordinateRemapper {
    /// The table shipped with this tool
    pub fn bundled() -> BesuDistResult<Self> {
        Self::parse(BUNDLED_MAPPING, BUNDLED_MAPPING_NAME)
    }

    /// Load a replacement table from disk
    pub fn from_file(path: &Path) -> BesuDistResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BesuDistError::Initialization(format!(
                "Failed to read coordinates mapping {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse `<new-coordinate> <old-coordinate>` lines.
    ///
    /// Rows whose two columns are textually equal are not installed.
    pub fn parse(content: &str, source: &str) -> BesuDistResult<Self> {
        let mut old_to_new = BTreeMap::new();

        for (index, line) in content.lines().enumerate() {
            let mut columns = line.split_whitespace();
            let (new_coordinate, old_coordinate) = match (columns.next(), columns.next()) {
                (None, _) => continue,
                (Some(new), Some(old)) => (new, old),
                (Some(_), None) => {
                    return Err(BesuDistError::Initialization(format!(
                        "{} line {}: expected '<new-coordinate> <old-coordinate>', got '{}'",
                        source,
                        index + 1,
                        line.trim()
                    )))
                }
            };

            if new_coordinate == old_coordinate {
                continue;
            }

            let parse = |value: &str| {
                ModuleId::parse(value).map_err(|e| {
                    BesuDistError::Initialization(format!("{} line {}: {}", source, index + 1, e))
                })
            };
            old_to_new.insert(parse(old_coordinate)?, parse(new_coordinate)?);
        }

        Ok(Self { old_to_new })
    }

    /// Current identity of `module`; unknown modules map to themselves.
    pub fn remap(&self, module: &ModuleId) -> ModuleId {
        self.old_to_new
            .get(module)
            .cloned()
            .unwrap_or_else(|| module.clone())
    }

    pub fn is_old_coordinate(&self, group: &str, name: &str) -> bool {
        self.is_old_module(&ModuleId::new(group, name))
    }

    pub fn is_old_module(&self, module: &ModuleId) -> bool {
        self.old_to_new.contains_key(module)
    }

    /// Rewrite a `group:name[:version...]` string whose leading part is an old coordinate.
    ///
    /// When several old coordinates are prefixes, the longest one wins.
    pub fn normalize(&self, coordinate: &str) -> String {
        self.old_to_new
            .iter()
            .filter(|(old, _)| coordinate.starts_with(old.as_str()))
            .max_by_key(|(old, _)| old.as_str().len())
            .map(|(old, new)| format!("{}{}", new, &coordinate[old.as_str().len()..]))
            .unwrap_or_else(|| coordinate.to_string())
    }

    /// Every old coordinate, in lexical order
    pub fn old_coordinates(&self) -> impl Iterator<Item = &ModuleId> {
        self.old_to_new.keys()
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }
}
