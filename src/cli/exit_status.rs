use std::process::ExitCode;

/// Exit status for the CLI.
///
/// - `Success` (0): extraction completed; per-file anomalies are never
///   failures.
/// - `Error` (2): the run aborted (unwritable output, unreadable header,
///   invalid config).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
