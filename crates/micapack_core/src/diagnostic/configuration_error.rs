use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ErrorKind;

/// A user facing configuration failure.
///
/// Composition is all-or-nothing, so any of these aborts the build before a
/// partial configuration can reach downstream stages. Each variant carries
/// the offending rule or path so the configuration can be corrected without
/// inspecting internals.
#[derive(Clone, Debug, Deserialize, Error, PartialEq, Serialize)]
pub enum ConfigurationError {
  #[error("project root {} is not an absolute path", .root.display())]
  InvalidRoot { root: PathBuf },

  #[error("alias symbol {symbol:?} is registered more than once (second target: {})", .target.display())]
  DuplicateSymbol { symbol: String, target: PathBuf },

  #[error("unable to read environment file {}: {message}", .path.display())]
  UnreadableSource { path: PathBuf, message: String },
}

impl ConfigurationError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ConfigurationError::InvalidRoot { .. } => ErrorKind::InvalidRoot,
      ConfigurationError::DuplicateSymbol { .. } => ErrorKind::DuplicateSymbol,
      ConfigurationError::UnreadableSource { .. } => ErrorKind::UnreadableSource,
    }
  }
}
