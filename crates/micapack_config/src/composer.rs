use std::path::PathBuf;

use micapack_core::diagnostic::ConfigurationError;
use micapack_core::types::AliasRule;
use micapack_core::types::BuildMode;
use micapack_filesystem::FileSystemRef;
use tracing::debug;

use crate::alias_resolver;
use crate::env_loader;
use crate::env_loader::EnvironmentSource;
use crate::environment::EnvironmentRef;
use crate::plugin_registry;
use crate::resolved_configuration::PluginNode;
use crate::resolved_configuration::ResolvedConfiguration;

/// Inputs for one composition pass
#[derive(Clone, Debug, Default)]
pub struct ComposeOptions {
  pub project_root: PathBuf,
  pub mode: BuildMode,
  /// Explicit environment definition file; when unset the mode-specific
  /// `.env` family under the project root is consulted instead
  pub env_file: Option<PathBuf>,
  /// Lowest-precedence environment entries, applied after every file source
  pub env_defaults: Vec<(String, String)>,
  pub alias_rules: Vec<AliasRule>,
  pub plugins: Vec<PluginNode>,
}

/// Merges environment state, alias rules and plugin descriptors into a
/// single immutable configuration
pub struct ConfigComposer {
  fs: FileSystemRef,
  env: EnvironmentRef,
}

impl ConfigComposer {
  pub fn new(fs: FileSystemRef, env: EnvironmentRef) -> Self {
    ConfigComposer { fs, env }
  }

  /// Composes a `ResolvedConfiguration`, all-or-nothing.
  ///
  /// Environment loading completes before alias resolution so alias targets
  /// or plugin options may reference freshly loaded variables. The project
  /// root is validated before anything else; an invalid invocation never
  /// mutates the environment namespace.
  pub fn compose(
    &self,
    options: ComposeOptions,
  ) -> Result<ResolvedConfiguration, ConfigurationError> {
    let ComposeOptions {
      project_root,
      mode,
      env_file,
      env_defaults,
      alias_rules,
      plugins,
    } = options;

    if !project_root.is_absolute() {
      return Err(ConfigurationError::InvalidRoot { root: project_root });
    }

    match &env_file {
      Some(path) => {
        if let Some(source) = EnvironmentSource::load(&self.fs, path)? {
          let applied = source.apply(&*self.env);
          debug!("Applied {applied} entries from {}", path.display());
        }
      }
      None => env_loader::load_for_mode(&self.fs, &project_root, &mode, &*self.env)?,
    }

    EnvironmentSource::from_pairs(env_defaults).apply(&*self.env);

    let aliases = alias_resolver::resolve(&alias_rules, &project_root)?;
    let plugins = plugin_registry::register(plugins);

    debug!(
      "Composed configuration for {} with {} plugins and {} aliases",
      project_root.display(),
      plugins.len(),
      aliases.len()
    );

    Ok(ResolvedConfiguration {
      project_root,
      mode,
      plugins,
      aliases,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;
  use std::sync::Arc;

  use micapack_filesystem::in_memory_file_system::InMemoryFileSystem;
  use pretty_assertions::assert_eq;

  use crate::environment::Environment;
  use crate::environment::InMemoryEnvironment;

  use super::*;

  fn alias(symbol: &str, target: &str) -> AliasRule {
    AliasRule {
      symbol: symbol.to_string(),
      target: PathBuf::from(target),
    }
  }

  fn plugin(package_name: &str) -> PluginNode {
    PluginNode {
      package_name: package_name.to_string(),
      resolve_from: Arc::new(PathBuf::from("/proj")),
      options: None,
    }
  }

  fn composer(
    fs: Arc<InMemoryFileSystem>,
    env: Arc<InMemoryEnvironment>,
  ) -> ConfigComposer {
    ConfigComposer::new(fs, env)
  }

  mod compose {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn composes_a_zero_plugin_zero_alias_configuration() {
      let composer = composer(Arc::default(), Arc::default());

      let configuration = composer
        .compose(ComposeOptions {
          project_root: PathBuf::from("/proj"),
          ..ComposeOptions::default()
        })
        .unwrap();

      assert!(configuration.plugins.is_empty());
      assert!(configuration.aliases.is_empty());
      assert_eq!(configuration.project_root, PathBuf::from("/proj"));
    }

    #[test]
    fn resolves_aliases_and_preserves_plugin_order() {
      let composer = composer(Arc::default(), Arc::default());

      let configuration = composer
        .compose(ComposeOptions {
          project_root: PathBuf::from("/proj"),
          alias_rules: vec![alias("@", "src")],
          plugins: vec![plugin("@micapack/transformer-vue"), plugin("@micapack/transformer-js")],
          ..ComposeOptions::default()
        })
        .unwrap();

      assert_eq!(
        configuration.aliases.get("@"),
        Some(&PathBuf::from("/proj/src"))
      );
      assert_eq!(
        configuration
          .plugins
          .iter()
          .map(|p| p.package_name.as_str())
          .collect::<Vec<_>>(),
        vec!["@micapack/transformer-vue", "@micapack/transformer-js"]
      );
    }

    #[test]
    fn loads_the_environment_before_returning() {
      let fs = Arc::new(InMemoryFileSystem::default());
      fs.write_file(Path::new("/proj/.env"), String::from("FROM_FILE=yes\n"));

      let env = Arc::new(InMemoryEnvironment::default());
      let composer = composer(fs, Arc::clone(&env));

      composer
        .compose(ComposeOptions {
          project_root: PathBuf::from("/proj"),
          ..ComposeOptions::default()
        })
        .unwrap();

      assert_eq!(env.get("FROM_FILE"), Some(String::from("yes")));
    }

    #[test]
    fn an_explicit_env_file_replaces_the_mode_family() {
      let fs = Arc::new(InMemoryFileSystem::default());
      fs.write_file(Path::new("/proj/.env"), String::from("FAMILY=yes\n"));
      fs.write_file(Path::new("/proj/ci.env"), String::from("EXPLICIT=yes\n"));

      let env = Arc::new(InMemoryEnvironment::default());
      let composer = composer(fs, Arc::clone(&env));

      composer
        .compose(ComposeOptions {
          project_root: PathBuf::from("/proj"),
          env_file: Some(PathBuf::from("/proj/ci.env")),
          ..ComposeOptions::default()
        })
        .unwrap();

      assert_eq!(env.get("EXPLICIT"), Some(String::from("yes")));
      assert_eq!(env.get("FAMILY"), None);
    }

    #[test]
    fn defaults_lose_to_files_and_ambient_values() {
      let fs = Arc::new(InMemoryFileSystem::default());
      fs.write_file(Path::new("/proj/.env"), String::from("FROM_FILE=file\n"));

      let env = Arc::new(InMemoryEnvironment::from_iter([(
        String::from("FROM_AMBIENT"),
        String::from("ambient"),
      )]));
      let composer = composer(fs, Arc::clone(&env));

      composer
        .compose(ComposeOptions {
          project_root: PathBuf::from("/proj"),
          env_defaults: vec![
            (String::from("FROM_AMBIENT"), String::from("default")),
            (String::from("FROM_FILE"), String::from("default")),
            (String::from("ONLY_DEFAULT"), String::from("default")),
          ],
          ..ComposeOptions::default()
        })
        .unwrap();

      assert_eq!(env.get("FROM_AMBIENT"), Some(String::from("ambient")));
      assert_eq!(env.get("FROM_FILE"), Some(String::from("file")));
      assert_eq!(env.get("ONLY_DEFAULT"), Some(String::from("default")));
    }

    #[test]
    fn propagates_alias_resolution_failures() {
      let composer = composer(Arc::default(), Arc::default());

      let err = composer.compose(ComposeOptions {
        project_root: PathBuf::from("/proj"),
        alias_rules: vec![alias("@", "src"), alias("@", "lib")],
        ..ComposeOptions::default()
      });

      assert_eq!(
        err,
        Err(ConfigurationError::DuplicateSymbol {
          symbol: String::from("@"),
          target: PathBuf::from("lib")
        })
      );
    }

    #[test]
    fn an_invalid_root_fails_before_any_environment_mutation() {
      let fs = Arc::new(InMemoryFileSystem::default());
      fs.write_file(Path::new("/proj/.env"), String::from("FROM_FILE=yes\n"));

      let env = Arc::new(InMemoryEnvironment::default());
      let composer = composer(fs, Arc::clone(&env));

      let err = composer.compose(ComposeOptions {
        project_root: PathBuf::from("proj"),
        ..ComposeOptions::default()
      });

      assert_eq!(
        err,
        Err(ConfigurationError::InvalidRoot {
          root: PathBuf::from("proj")
        })
      );
      assert!(env.snapshot().is_empty());
    }

    #[test]
    fn repeated_composition_yields_structurally_equal_configurations() {
      let fs = Arc::new(InMemoryFileSystem::default());
      fs.write_file(Path::new("/proj/.env"), String::from("FROM_FILE=yes\n"));

      let env = Arc::new(InMemoryEnvironment::default());
      let composer = composer(fs, env);

      let options = ComposeOptions {
        project_root: PathBuf::from("/proj"),
        mode: BuildMode::Production,
        alias_rules: vec![alias("@", "src"), alias("~", "lib")],
        plugins: vec![plugin("@micapack/transformer-vue")],
        ..ComposeOptions::default()
      };

      let first = composer.compose(options.clone()).unwrap();
      let second = composer.compose(options).unwrap();

      assert_eq!(first, second);
    }
  }
}
