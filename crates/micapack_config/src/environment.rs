use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Environment abstraction instance
///
/// This should be `OsEnvironment` for non-testing environments and
/// `InMemoryEnvironment` for testing.
pub type EnvironmentRef = Arc<dyn Environment + Send + Sync>;

/// Trait abstracting the ambient environment namespace.
///
/// The process-wide namespace is only touched through `OsEnvironment`,
/// constructed at the outermost entry point; library code receives an
/// explicit handle. Within this subsystem the namespace is written at most
/// once per key and never torn down.
#[mockall::automock]
pub trait Environment: std::fmt::Debug {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&self, key: &str, value: &str);

  fn is_set(&self, key: &str) -> bool {
    self.get(key).is_some()
  }
}

/// The real process environment
#[derive(Debug, Default)]
pub struct OsEnvironment;

impl Environment for OsEnvironment {
  fn get(&self, key: &str) -> Option<String> {
    std::env::var(key).ok()
  }

  fn set(&self, key: &str, value: &str) {
    std::env::set_var(key, value);
  }
}

/// In memory implementation of the `Environment` trait, for testing purposes.
#[derive(Debug, Default)]
pub struct InMemoryEnvironment {
  vars: RwLock<BTreeMap<String, String>>,
}

impl InMemoryEnvironment {
  pub fn snapshot(&self) -> BTreeMap<String, String> {
    self.vars.read().clone()
  }
}

impl FromIterator<(String, String)> for InMemoryEnvironment {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    InMemoryEnvironment {
      vars: RwLock::new(iter.into_iter().collect()),
    }
  }
}

impl Environment for InMemoryEnvironment {
  fn get(&self, key: &str) -> Option<String> {
    self.vars.read().get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) {
    self
      .vars
      .write()
      .insert(key.to_string(), value.to_string());
  }
}
