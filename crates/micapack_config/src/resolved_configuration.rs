use std::path::PathBuf;
use std::sync::Arc;

use micapack_core::types::AliasTable;
use micapack_core::types::BuildMode;
use serde::Deserialize;
use serde::Serialize;

use crate::plugin_registry::OrderedPluginList;

/// An opaque plugin descriptor.
///
/// Composition preserves identity and order only; `options` travels through
/// verbatim and is interpreted by the hosting bundler.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginNode {
  pub package_name: String,
  pub resolve_from: Arc<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<serde_json::Value>,
}

/// Represents a fully composed build configuration.
///
/// Created once per build invocation and consumed read-only by every
/// downstream stage; a configuration change means composing a new instance.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
  pub project_root: PathBuf,
  pub mode: BuildMode,
  pub plugins: OrderedPluginList,
  pub aliases: AliasTable,
}
