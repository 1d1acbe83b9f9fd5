pub mod diagnostic;
pub mod types;

pub use diagnostic::ConfigurationError;
pub use diagnostic::ErrorKind;
