pub mod gold;

pub use gold::{GoldCollateral, Karat};
