pub mod classifier;
pub mod consultation;
pub mod content;
pub mod history;
pub mod invoker;
pub mod metrics;
pub mod providers;

pub use consultation::{ConsultationError, ConsultationOrchestrator};
pub use history::HistoryStore;
pub use invoker::{InvocationError, ModelInvoker};
pub use metrics::{get_metrics, init_metrics};
