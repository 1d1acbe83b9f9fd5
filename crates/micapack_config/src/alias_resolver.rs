use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use micapack_core::diagnostic::ConfigurationError;
use micapack_core::types::AliasRule;
use micapack_core::types::AliasTable;

/// Resolves alias rules to absolute paths against the project root.
///
/// Resolution is a pure lexical operation: the output depends only on
/// `rules` and `project_root`, never on the filesystem or the current
/// working directory. Ambiguous rule sets are rejected outright, no partial
/// table is produced.
pub fn resolve(rules: &[AliasRule], project_root: &Path) -> Result<AliasTable, ConfigurationError> {
  if !project_root.is_absolute() {
    return Err(ConfigurationError::InvalidRoot {
      root: project_root.to_path_buf(),
    });
  }

  let mut table = AliasTable::default();

  for rule in rules {
    if table.contains_symbol(&rule.symbol) {
      return Err(ConfigurationError::DuplicateSymbol {
        symbol: rule.symbol.clone(),
        target: rule.target.clone(),
      });
    }

    table.insert(rule.symbol.clone(), normalize(&project_root.join(&rule.target)));
  }

  Ok(table)
}

/// Collapses `.` and `..` segments lexically. An upward segment at the root
/// stays at the root.
fn normalize(path: &Path) -> PathBuf {
  let mut result: Vec<Component<'_>> = Vec::new();

  for component in path.components() {
    match component {
      Component::Prefix(prefix) => {
        result = vec![Component::Prefix(prefix)];
      }
      Component::RootDir => {
        result.push(Component::RootDir);
      }
      Component::CurDir => {}
      Component::ParentDir => {
        if !matches!(result.last(), Some(Component::RootDir) | None) {
          result.pop();
        }
      }
      Component::Normal(segment) => {
        result.push(Component::Normal(segment));
      }
    }
  }

  PathBuf::from_iter(result)
}

#[cfg(test)]
mod tests {
  use super::*;

  mod resolve {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rule(symbol: &str, target: &str) -> AliasRule {
      AliasRule {
        symbol: symbol.to_string(),
        target: PathBuf::from(target),
      }
    }

    #[test]
    fn resolves_targets_against_the_project_root() {
      let table = resolve(&[rule("@", "src")], Path::new("/proj")).unwrap();

      assert_eq!(table.get("@"), Some(&PathBuf::from("/proj/src")));
    }

    #[test]
    fn collapses_dot_segments_in_targets() {
      let table = resolve(
        &[rule("@", "./src"), rule("~lib", "src/../lib/./core")],
        Path::new("/proj"),
      )
      .unwrap();

      assert_eq!(table.get("@"), Some(&PathBuf::from("/proj/src")));
      assert_eq!(table.get("~lib"), Some(&PathBuf::from("/proj/lib/core")));
    }

    #[test]
    fn keeps_absolute_targets_as_is() {
      let table = resolve(&[rule("vendor", "/opt/vendor/js")], Path::new("/proj")).unwrap();

      assert_eq!(table.get("vendor"), Some(&PathBuf::from("/opt/vendor/js")));
    }

    #[test]
    fn upward_segments_stop_at_the_root() {
      let table = resolve(&[rule("@", "../../../src")], Path::new("/proj")).unwrap();

      assert_eq!(table.get("@"), Some(&PathBuf::from("/src")));
    }

    #[test]
    fn rejects_a_relative_project_root() {
      let err = resolve(&[rule("@", "src")], Path::new("proj"));

      assert_eq!(
        err,
        Err(ConfigurationError::InvalidRoot {
          root: PathBuf::from("proj")
        })
      );
    }

    #[test]
    fn rejects_duplicate_symbols_without_partial_resolution() {
      let err = resolve(
        &[rule("@", "src"), rule("~", "lib"), rule("@", "other")],
        Path::new("/proj"),
      );

      assert_eq!(
        err,
        Err(ConfigurationError::DuplicateSymbol {
          symbol: String::from("@"),
          target: PathBuf::from("other")
        })
      );
    }

    #[test]
    fn is_deterministic_across_repeated_calls() {
      let rules = [rule("@", "src"), rule("~", "lib")];

      let first = resolve(&rules, Path::new("/proj")).unwrap();
      let second = resolve(&rules, Path::new("/proj")).unwrap();

      assert_eq!(first, second);
    }
  }
}
