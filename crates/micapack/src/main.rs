use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use micapack_config::environment::OsEnvironment;
use micapack_config::ComposeOptions;
use micapack_config::ConfigComposer;
use micapack_config::PluginNode;
use micapack_core::types::AliasRule;
use micapack_core::types::BuildMode;
use micapack_filesystem::os_file_system::OsFileSystem;
use tracing::debug;
use tracing::error;

#[derive(Parser)]
struct Args {
  /// Project root that alias targets resolve against; defaults to the
  /// current directory
  #[arg(long)]
  project_root: Option<PathBuf>,

  /// Build mode selecting the .env file family
  #[arg(long, default_value = "development")]
  mode: BuildMode,

  /// Explicit environment definition file, replacing the .env family
  #[arg(long)]
  env_file: Option<PathBuf>,

  /// Alias rule as SYMBOL=TARGET; may be repeated
  #[arg(long = "alias")]
  aliases: Vec<String>,

  /// Plugin package name; may be repeated, order is preserved
  #[arg(long = "plugin")]
  plugins: Vec<String>,
}

fn main() {
  initialize_tracing();

  let args = Args::parse();
  run(args).unwrap_or_else(|e| {
    error!("Failed to compose configuration: {e}");
    std::process::exit(1);
  });
}

fn run(args: Args) -> anyhow::Result<()> {
  let project_root = match args.project_root {
    Some(root) => root,
    None => std::env::current_dir()?,
  };

  let alias_rules = args
    .aliases
    .iter()
    .map(|raw| parse_alias(raw))
    .collect::<anyhow::Result<Vec<_>>>()?;

  let resolve_from = Arc::new(project_root.clone());
  let plugins = args
    .plugins
    .into_iter()
    .map(|package_name| PluginNode {
      package_name,
      resolve_from: Arc::clone(&resolve_from),
      options: None,
    })
    .collect();

  debug!("Composing configuration for {}", project_root.display());

  let composer = ConfigComposer::new(Arc::new(OsFileSystem), Arc::new(OsEnvironment));
  let configuration = composer
    .compose(ComposeOptions {
      project_root,
      mode: args.mode,
      env_file: args.env_file,
      env_defaults: Vec::new(),
      alias_rules,
      plugins,
    })
    .map_err(|e| anyhow!("{}: {e}", e.kind()))?;

  println!("{}", serde_json::to_string_pretty(&configuration)?);

  Ok(())
}

fn parse_alias(raw: &str) -> anyhow::Result<AliasRule> {
  let (symbol, target) = raw
    .split_once('=')
    .ok_or_else(|| anyhow!("Expected SYMBOL=TARGET alias rule, got {raw:?}"))?;

  Ok(AliasRule {
    symbol: symbol.to_string(),
    target: PathBuf::from(target),
  })
}

fn initialize_tracing() {
  if std::env::var("RUST_LOG").is_err() {
    std::env::set_var("RUST_LOG", "info");
  }

  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();
}
