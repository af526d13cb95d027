pub mod cs;
pub mod error;

pub use cs::hashing;
pub use cs::hashing::{HashParams, HashParamsBuilder, PowerTable, StringHash, Symbol};
pub use error::{Error, Result};
