pub mod consultations;
pub mod health;

pub use consultations::{read_history, submit_consultation};
pub use health::{health_check, metrics_endpoint};
