//! The categorized, leveled event kernel named in spec.md §2.2, with a
//! console sink and the binary file sink format specified in §6.

pub mod binary;
mod event;
mod kernel;
mod level;

pub use event::{Data, Event, EventType};
pub use kernel::{Kernel, Span, FILE_SINK_BUDGET_BYTES};
pub use level::Level;
