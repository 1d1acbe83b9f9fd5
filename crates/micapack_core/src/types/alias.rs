use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// A symbolic prefix and the project-root-relative path it stands for
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasRule {
  pub symbol: String,
  pub target: PathBuf,
}

/// Symbol to absolute path mappings produced by alias resolution.
///
/// Entries are inserted exactly once per symbol; the table is consumed
/// read-only once it is part of a resolved configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
  entries: BTreeMap<String, PathBuf>,
}

impl AliasTable {
  pub fn get(&self, symbol: &str) -> Option<&PathBuf> {
    self.entries.get(symbol)
  }

  pub fn contains_symbol(&self, symbol: &str) -> bool {
    self.entries.contains_key(symbol)
  }

  pub fn insert(&mut self, symbol: String, target: PathBuf) {
    self.entries.insert(symbol, target);
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &PathBuf)> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Rewrites a module specifier whose leading segment is a registered
  /// symbol.
  ///
  /// A symbol matches the whole specifier or a prefix followed by `/`. A
  /// specifier that merely starts with the same characters is left alone, so
  /// registering `@` never rewrites `@scope/package`.
  pub fn resolve_specifier(&self, specifier: &str) -> Option<PathBuf> {
    for (symbol, target) in &self.entries {
      if specifier == symbol {
        return Some(target.clone());
      }

      if let Some(subpath) = specifier
        .strip_prefix(symbol.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
      {
        return Some(target.join(subpath));
      }
    }

    None
  }
}

impl FromIterator<(String, PathBuf)> for AliasTable {
  fn from_iter<I: IntoIterator<Item = (String, PathBuf)>>(iter: I) -> Self {
    AliasTable {
      entries: iter.into_iter().collect(),
    }
  }
}
