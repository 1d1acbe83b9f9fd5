use serde::Deserialize;
use serde::Serialize;

use crate::resolved_configuration::PluginNode;

/// Plugins to apply during a build, in registration order.
///
/// Read-only once constructed; the ordering is significant to the hosting
/// bundler and is preserved verbatim.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderedPluginList {
  plugins: Vec<PluginNode>,
}

impl OrderedPluginList {
  pub fn iter(&self) -> std::slice::Iter<'_, PluginNode> {
    self.plugins.iter()
  }

  pub fn len(&self) -> usize {
    self.plugins.len()
  }

  pub fn is_empty(&self) -> bool {
    self.plugins.is_empty()
  }
}

/// Registers plugin descriptors for a build.
///
/// Descriptors are opaque: no sorting, deduplication, or validation of their
/// contents happens here. An empty input is a legal zero-plugin build.
pub fn register(descriptors: Vec<PluginNode>) -> OrderedPluginList {
  OrderedPluginList {
    plugins: descriptors,
  }
}
