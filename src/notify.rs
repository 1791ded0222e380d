//! Notifiers shipped with the binary
//!
//! Chat delivery lives outside this crate; these cover local runs.

use anyhow::Result;
use std::io::Write;
use switchwatch_core::{ChangeNotice, Notifier};

/// Prints every report to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    async fn notify(&self, notice: &ChangeNotice) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", notice.report)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Writes every report to the log at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, notice: &ChangeNotice) -> Result<()> {
        log::info!(
            "Status update triggered by {:?}:\n{}",
            notice.triggered_by,
            notice.report
        );
        Ok(())
    }
}
