//! Human-readable run output.
//!
//! Report lines use a fixed tag grammar so that scripts can grep them:
//!
//! ```text
//! [ADD][SUC] octocat/hello; bug; ff0000
//! [UPD][DRY] octocat/hello; Docs; 0075ca
//! [DEL][ERR] octocat/hello; wontfix; ffffff; 404 - Not Found
//! [LBL][ERR] octocat/missing; 404 - Not Found
//! [SUMMARY] 2 error(s) in total, please check log above
//! ```
//!
//! In normal mode only failures are printed, to the error stream, as
//! `ERROR: <TAG>; ...`, followed by a `SUMMARY: ...` line. Quiet mode prints
//! nothing. The verbosity never changes what the run does.

use std::io::{self, Write};

use tracing::warn;

use crate::operation::{OperationOutcome, OperationRecord};
use crate::orchestrator::RunSummary;
use crate::reconciler::{FetchFailure, RepositoryReport};

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// How much a run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// One line per operation plus the summary, on standard output.
    Verbose,
    /// Failures on the error stream plus the summary.
    #[default]
    Normal,
    /// Nothing; only the exit code tells the result.
    Quiet,
}

impl Verbosity {
    /// Resolves the `--verbose` / `--quiet` pair. Both together cancel out.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, false) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            _ => Verbosity::Normal,
        }
    }
}

/// Writes report lines to an output and an error sink.
pub struct Reporter {
    verbosity: Verbosity,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Reporter {
    pub fn new(
        verbosity: Verbosity,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            verbosity,
            out,
            err,
        }
    }

    /// Reporter writing to the process standard output and error streams.
    pub fn stdio(verbosity: Verbosity) -> Self {
        Self::new(verbosity, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Prints every line belonging to one repository.
    pub fn repository(&mut self, report: &RepositoryReport) {
        if let Some(failure) = &report.fetch_error {
            self.fetch_failure(&report.repo, failure);
            return;
        }
        for record in &report.records {
            self.operation(record);
        }
    }

    pub fn operation(&mut self, record: &OperationRecord) {
        let tag = record.kind.tag();
        let head = format!(
            "{}; {}; {}",
            record.repo, record.label.name, record.label.color
        );

        let line = match (&record.outcome, self.verbosity) {
            (_, Verbosity::Quiet) => None,
            (OperationOutcome::Failed { code, message }, Verbosity::Verbose) => Some((
                false,
                format!("[{}][ERR] {}; {}", tag, head, failure_text(*code, message)),
            )),
            (OperationOutcome::Failed { code, message }, Verbosity::Normal) => Some((
                true,
                format!("ERROR: {}; {}; {}", tag, head, failure_text(*code, message)),
            )),
            (_, Verbosity::Verbose) if record.dry_run => {
                Some((false, format!("[{}][DRY] {}", tag, head)))
            }
            (OperationOutcome::Skipped, _) => None,
            (_, Verbosity::Verbose) => Some((false, format!("[{}][SUC] {}", tag, head))),
            (_, Verbosity::Normal) => None,
        };

        if let Some((to_err, line)) = line {
            self.emit(to_err, &line);
        }
    }

    pub fn fetch_failure(&mut self, repo: &str, failure: &FetchFailure) {
        let text = failure_text(failure.code, &failure.message);
        match self.verbosity {
            Verbosity::Verbose => self.emit(false, &format!("[LBL][ERR] {}; {}", repo, text)),
            Verbosity::Normal => self.emit(true, &format!("ERROR: LBL; {}; {}", repo, text)),
            Verbosity::Quiet => {}
        }
    }

    /// Prints the final summary line.
    pub fn summary(&mut self, summary: &RunSummary) {
        let prefix = match self.verbosity {
            Verbosity::Verbose => "[SUMMARY]",
            Verbosity::Normal => "SUMMARY:",
            Verbosity::Quiet => return,
        };

        let line = if summary.failures > 0 {
            format!(
                "{} {} error(s) in total, please check log above",
                prefix, summary.failures
            )
        } else {
            format!(
                "{} {} repo(s) updated successfully",
                prefix, summary.repositories_succeeded
            )
        };
        self.emit(false, &line);
    }

    fn emit(&mut self, to_err: bool, line: &str) {
        let sink = if to_err { &mut self.err } else { &mut self.out };
        if let Err(e) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
            warn!(error = %e, "Failed to write report line");
        }
    }
}

/// `<code> - <message>`; transport failures have no status code.
fn failure_text(code: Option<u16>, message: &str) -> String {
    match code {
        Some(code) => format!("{} - {}", code, message),
        None => format!("N/A - {}", message),
    }
}
