pub mod analysis;
pub mod health;

pub use analysis::{get_analysis, update_analysis};
pub use health::{health_check, metrics_endpoint, readiness_check};
