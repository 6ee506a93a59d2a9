// hirestats - Hiring report runner
//
// Wires configuration, the core transformation and the report sink into a
// single scoped run.

mod init;
mod session;

pub use init::init_tracing;
pub use session::{ReportSession, RunSummary};

pub use hirestats_config::RuntimeConfig;
pub use hirestats_core::Reports;
