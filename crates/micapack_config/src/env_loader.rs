use std::path::Path;
use std::path::PathBuf;

use micapack_core::diagnostic::ConfigurationError;
use micapack_core::types::BuildMode;
use micapack_filesystem::FileSystemRef;
use tracing::debug;

use crate::environment::Environment;

/// Ordered key/value pairs parsed from one environment definition file.
///
/// Within a source the last occurrence of a key wins; against the ambient
/// namespace the source never wins at all (see [`EnvironmentSource::apply`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentSource {
  entries: Vec<(String, String)>,
}

impl EnvironmentSource {
  /// Parses line-oriented `KEY=VALUE` text.
  ///
  /// Lines starting with `#` and blank lines are ignored. A malformed line
  /// is skipped on its own; it never aborts the remaining entries. Values are
  /// captured literally, with no interpolation or quoting semantics.
  pub fn parse(contents: &str) -> Self {
    let mut entries: Vec<(String, String)> = Vec::new();

    for (index, line) in contents.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      let Some((key, value)) = line.split_once('=') else {
        debug!("Skipping environment line {}: no separator", index + 1);
        continue;
      };

      let key = key.trim();
      if !is_valid_key(key) {
        debug!("Skipping environment line {}: invalid key {:?}", index + 1, key);
        continue;
      }

      entries.retain(|(existing, _)| existing != key);
      entries.push((key.to_string(), value.trim().to_string()));
    }

    EnvironmentSource { entries }
  }

  pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
    EnvironmentSource { entries: pairs }
  }

  /// Reads and parses the file at `path`.
  ///
  /// An absent file is not an error and yields `None`; any other read
  /// failure surfaces as `UnreadableSource`. The file handle is released
  /// before this returns on every path, including parse errors.
  pub fn load(fs: &FileSystemRef, path: &Path) -> Result<Option<Self>, ConfigurationError> {
    match fs.read_to_string(path) {
      Ok(contents) => Ok(Some(Self::parse(&contents))),
      Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(source) => Err(ConfigurationError::UnreadableSource {
        path: path.to_path_buf(),
        message: source.to_string(),
      }),
    }
  }

  /// Applies every entry to `env`, setting a key only when it is currently
  /// unset, so values the hosting process has already exported always take
  /// precedence over file-based defaults. Returns how many keys were set.
  pub fn apply(&self, env: &dyn Environment) -> usize {
    let mut applied = 0;

    for (key, value) in &self.entries {
      if !env.is_set(key) {
        env.set(key, value);
        applied += 1;
      }
    }

    applied
  }

  pub fn entries(&self) -> &[(String, String)] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

fn is_valid_key(key: &str) -> bool {
  let mut chars = key.chars();

  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }

  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Environment files consulted for a build mode, in descending precedence
pub fn env_files_for_mode(project_root: &Path, mode: &BuildMode) -> Vec<PathBuf> {
  vec![
    project_root.join(format!(".env.{mode}.local")),
    project_root.join(format!(".env.{mode}")),
    project_root.join(".env.local"),
    project_root.join(".env"),
  ]
}

/// Loads the mode-specific file family under set-if-absent semantics.
///
/// Files are applied most-specific first, so among files the specific one
/// wins while ambient values win over all of them.
pub fn load_for_mode(
  fs: &FileSystemRef,
  project_root: &Path,
  mode: &BuildMode,
  env: &dyn Environment,
) -> Result<(), ConfigurationError> {
  for path in env_files_for_mode(project_root, mode) {
    if let Some(source) = EnvironmentSource::load(fs, &path)? {
      let applied = source.apply(env);
      debug!("Applied {applied} entries from {}", path.display());
    }
  }

  Ok(())
}
