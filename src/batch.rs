//! Batch conversion: start the application, plot every drawing, shut down.

use crate::automation::{AppLauncher, AutomationResult, DrawingApp};
use crate::config::Config;
use crate::error::{BatchError, Result};
use crate::report::{BatchReport, FileReport, FileStatus};
use crate::retry::{RetryError, RetryPolicy};
use crate::scan;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Drives one application instance through a list of drawings.
///
/// Busy rejections are retried at the scope where they happen: while starting
/// the application the whole session is restarted on a fresh instance, while
/// processing a drawing only that drawing is retried. Any other error during
/// start-up aborts the run; any other error on a drawing abandons that drawing
/// and moves on to the next one.
pub struct BatchConverter<L> {
    launcher: L,
    policy: RetryPolicy,
    prog_id: String,
    plot_profile: String,
}

impl<L: AppLauncher> BatchConverter<L> {
    pub fn new(launcher: L, config: &Config) -> Self {
        Self {
            launcher,
            policy: config.retry_policy(),
            prog_id: config.prog_id.clone(),
            plot_profile: config.plot_profile.clone(),
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enumerate `dir` and convert every drawing found.
    ///
    /// Nothing is launched when the folder is missing or holds no drawings.
    pub fn run(&mut self, dir: &Path, extension: &str) -> Result<BatchReport> {
        let files = scan::find_drawings(dir, extension)?;
        info!("Found {} drawing(s) in {}", files.len(), dir.display());
        self.convert(&files)
    }

    /// Convert the given drawings, in order.
    pub fn convert(&mut self, files: &[PathBuf]) -> Result<BatchReport> {
        let policy = self.policy;
        let retried = policy.run("initializing the application", |attempt| {
            debug!("Session attempt {}", attempt);
            self.session(files)
        });

        match retried.outcome {
            Ok(files) => Ok(BatchReport {
                init_attempts: retried.attempts,
                files,
            }),
            Err(RetryError::Exhausted(last)) => Err(BatchError::InitRetriesExhausted {
                attempts: retried.attempts,
                last,
            }),
            Err(RetryError::Permanent(err)) => {
                error!("Error initializing the application: {}", err);
                Err(BatchError::Fatal(err))
            }
        }
    }

    /// One application instance from launch to quit.
    fn session(&mut self, files: &[PathBuf]) -> AutomationResult<Vec<FileReport>> {
        info!("Starting {}...", self.prog_id);
        let mut app = self.launcher.launch(&self.prog_id)?;
        app.set_visible(false)?;
        app.close_active_document(false)?;

        let mut reports = Vec::with_capacity(files.len());
        for input in files {
            reports.push(self.convert_file(app.as_mut(), input));
        }

        app.quit()?;
        info!("Finished publishing all drawings.");
        Ok(reports)
    }

    fn convert_file(&self, app: &mut dyn DrawingApp, input: &Path) -> FileReport {
        let output = scan::output_path(input);
        let what = format!("processing {}", input.display());

        let retried = self.policy.run(&what, |_| {
            plot_drawing(&mut *app, input, &output, &self.plot_profile)
        });

        let status = match retried.outcome {
            Ok(()) => FileStatus::Converted,
            Err(RetryError::Exhausted(err)) => {
                warn!(
                    "Giving up on {} after {} attempt(s)",
                    input.display(),
                    retried.attempts
                );
                FileStatus::RetriesExhausted {
                    reason: err.to_string(),
                }
            }
            Err(RetryError::Permanent(err)) => {
                error!("Error processing {}: {}", input.display(), err);
                FileStatus::Abandoned {
                    reason: err.to_string(),
                }
            }
        };

        FileReport {
            input: input.to_path_buf(),
            output,
            attempts: retried.attempts,
            status,
        }
    }
}

/// Open, plot and close one drawing.
///
/// A drawing that fails to plot is closed without saving before the error is
/// returned.
fn plot_drawing(
    app: &mut dyn DrawingApp,
    input: &Path,
    output: &Path,
    profile: &str,
) -> AutomationResult<()> {
    info!("Opening {}...", input.display());
    let doc = app.open_document(input, false)?;

    info!("Publishing {}...", output.display());
    if let Err(err) = app.plot_to_file(doc, output, profile) {
        if let Err(close_err) = app.close_document(doc, false) {
            debug!("Closing {} after failed plot: {}", input.display(), close_err);
        }
        return Err(err);
    }

    info!("Closing {}...", input.display());
    app.close_document(doc, false)
}

/// List what a run would produce without starting the application.
pub fn plan(files: &[PathBuf]) -> BatchReport {
    let files = files
        .iter()
        .map(|input| {
            let output = scan::output_path(input);
            info!("{} -> {}", input.display(), output.display());
            FileReport {
                input: input.clone(),
                output,
                attempts: 0,
                status: FileStatus::Planned,
            }
        })
        .collect();

    BatchReport {
        init_attempts: 0,
        files,
    }
}
