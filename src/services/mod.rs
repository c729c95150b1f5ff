pub mod account_generator;
pub mod filter;
pub mod metrics;
pub mod plan_annotator;
pub mod transcript;
pub mod user_query;

pub use account_generator::*;
pub use metrics::*;
pub use user_query::*;
