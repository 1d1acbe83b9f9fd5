mod configuration_error;
mod error_kind;

pub use self::configuration_error::*;
pub use self::error_kind::*;
