pub mod crypto;
pub mod units;

pub use crypto::*;
pub use units::*;
