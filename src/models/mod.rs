pub mod plan;
pub mod requests;
pub mod user;

pub use plan::*;
pub use requests::*;
pub use user::*;
