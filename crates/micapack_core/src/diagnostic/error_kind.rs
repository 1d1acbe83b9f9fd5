use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Discriminant of a [`ConfigurationError`](super::ConfigurationError),
/// printed on the error stream by top-level consumers
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
  InvalidRoot,
  DuplicateSymbol,
  UnreadableSource,
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ErrorKind::InvalidRoot => f.write_str("InvalidRoot"),
      ErrorKind::DuplicateSymbol => f.write_str("DuplicateSymbol"),
      ErrorKind::UnreadableSource => f.write_str("UnreadableSource"),
    }
  }
}
