pub mod progress;
pub mod schema;

pub use progress::ProgressStore;
pub use schema::{CertificateLedgerData, ProgressData};
