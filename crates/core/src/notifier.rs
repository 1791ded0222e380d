//! Change notification seam
//!
//! The poller hands every reportable change to a [`Notifier`]. Delivering it
//! (chat message, stdout, log) is up to the host.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

/// A reportable change detected in one sampling cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    /// Names of the sources responsible, in sampling order
    pub triggered_by: Vec<String>,
    /// Rendered status report at the time of the change
    pub report: String,
}

/// Receiver of change notices
///
/// The poller awaits each call before starting the next cycle. Errors are
/// logged by the poller and never stop it.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &ChangeNotice) -> impl Future<Output = Result<()>> + Send;
}

impl<N: Notifier> Notifier for Arc<N> {
    fn notify(&self, notice: &ChangeNotice) -> impl Future<Output = Result<()>> + Send {
        self.as_ref().notify(notice)
    }
}
