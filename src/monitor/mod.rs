//! Telemetry acquisition: line parser, sample buffer, subprocess supervisor,
//! and the session facade that composes them.

pub mod buffer;
pub mod parser;
pub mod session;
pub mod supervisor;
