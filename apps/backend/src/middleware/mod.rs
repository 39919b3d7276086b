pub mod auth_gate;
pub mod request_trace;
pub mod role_gate;
pub mod structured_logger;
pub mod trace_span;

pub use auth_gate::AuthGate;
pub use request_trace::RequestTrace;
pub use role_gate::RoleGate;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
