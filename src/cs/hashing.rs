pub mod modular;
pub mod polynomial_rolling;
pub mod power_table;
pub mod registry;

pub use polynomial_rolling::{StringHash, Symbol};
pub use power_table::PowerTable;
pub use registry::{HashParams, HashParamsBuilder, DEFAULT_HASH_COUNT, HASH_P};
