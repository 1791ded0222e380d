//! Registry, poll loop and report rendering

mod poller;
mod registry;
pub mod report;

pub use poller::{Poller, PollerState, StatusHandle};
pub use registry::{FailedSource, Registry, StatusGroup};
