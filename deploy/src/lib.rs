pub mod artifacts;
pub mod deployer;
pub mod error;
pub mod logging;
pub mod record;
pub mod shared;

pub use error::{Error, Result};
