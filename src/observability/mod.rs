//! Observability
//!
//! Structured, synchronous JSON logging of scan lifecycle events.
//!
//! ```ignore
//! use docscan::observability::{Event, Logger};
//!
//! Logger::info(Event::ScanOpen, &[("index", "accounts"), ("rows", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
