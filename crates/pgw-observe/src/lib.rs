//! Process-wide logging setup for the pushgateway publisher.
mod logger;
pub use logger::*;
