pub use self::alias::*;
pub use self::build_mode::*;

mod alias;
mod build_mode;
