//! Energy computation over buffered power samples.

pub mod integrate;
