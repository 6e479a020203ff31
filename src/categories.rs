//! Category names loaded from a `.names` file.
//!
//! One name per line; the 0-based line index is the category index used in
//! label files.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::YolomarkError;

/// Category index to name lookup.
///
/// Blank lines keep their slot so later indices stay aligned, but the blank
/// index itself has no name and is treated as unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryNames {
    names: Vec<Option<String>>,
}

impl CategoryNames {
    /// Reads a names file from disk.
    pub fn read(path: &Path) -> Result<Self, YolomarkError> {
        let content = fs::read_to_string(path).map_err(|source| YolomarkError::NamesFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let names = Self::parse(&content);
        debug!(
            "loaded {} category name(s) from {}",
            names.known_count(),
            path.display()
        );
        Ok(names)
    }

    /// Parses names file content.
    pub fn parse(content: &str) -> Self {
        content.lines().map(str::to_string).collect()
    }

    /// Returns the name for `index`, if that index has one.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(|name| name.as_deref())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.name(index).is_some()
    }

    /// Number of slots, including blank ones.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn known_count(&self) -> usize {
        self.names.iter().flatten().count()
    }

    /// Iterates `(index, name)` for every index with a name.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| name.as_deref().map(|name| (index, name)))
    }

    /// Known indices, for error messages such as `[0, 1, 2]`.
    pub fn indices(&self) -> Vec<usize> {
        self.iter().map(|(index, _)| index).collect()
    }
}

impl FromIterator<String> for CategoryNames {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let names = iter
            .into_iter()
            .map(|line| {
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect();
        CategoryNames { names }
    }
}
