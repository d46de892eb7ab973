//! Backend that exports each drawing by running a command-line plotter.

use super::{AppLauncher, AutomationResult, DocumentId, DrawingApp};
use crate::config::PlotterConfig;
use crate::error::{codes, AutomationError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Longest stderr excerpt carried in an error message.
const STDERR_EXCERPT: usize = 2000;

/// Launches [`CommandApp`] instances.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    config: PlotterConfig,
}

impl CommandLauncher {
    pub fn new(config: PlotterConfig) -> Self {
        Self { config }
    }
}

impl AppLauncher for CommandLauncher {
    fn launch(&mut self, prog_id: &str) -> AutomationResult<Box<dyn DrawingApp>> {
        let command = &self.config.command;

        // A bare program name is looked up on PATH at spawn time.
        if command.components().count() > 1 && !command.is_file() {
            return Err(AutomationError::new(
                codes::CLASS_NOT_REGISTERED,
                format!("Plotter executable not found: {}", command.display()),
            ));
        }

        debug!("Using plotter {} for {}", command.display(), prog_id);
        Ok(Box::new(CommandApp::new(self.config.clone(), prog_id)))
    }
}

/// Headless application: no window and no default drawing.
#[derive(Debug)]
pub struct CommandApp {
    config: PlotterConfig,
    prog_id: String,
    documents: HashMap<DocumentId, PathBuf>,
    next_id: u64,
}

impl CommandApp {
    pub fn new(config: PlotterConfig, prog_id: impl Into<String>) -> Self {
        Self {
            config,
            prog_id: prog_id.into(),
            documents: HashMap::new(),
            next_id: 1,
        }
    }

    /// Expand the argument template for one export.
    pub fn substitute_args(&self, input: &Path, output: &Path, profile: &str) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();

        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{profile}", profile)
                    .replace("{prog_id}", &self.prog_id)
            })
            .collect()
    }

    fn document(&self, doc: DocumentId) -> AutomationResult<&PathBuf> {
        self.documents
            .get(&doc)
            .ok_or_else(|| AutomationError::failed(format!("Document {} is not open", doc.0)))
    }
}

impl DrawingApp for CommandApp {
    fn set_visible(&mut self, _visible: bool) -> AutomationResult<()> {
        Ok(())
    }

    fn close_active_document(&mut self, _save_changes: bool) -> AutomationResult<()> {
        Ok(())
    }

    fn open_document(&mut self, path: &Path, read_only: bool) -> AutomationResult<DocumentId> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AutomationError::failed(format!("Cannot open {}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(AutomationError::failed(format!(
                "Not a drawing file: {}",
                path.display()
            )));
        }

        if !read_only && metadata.permissions().readonly() {
            return Err(AutomationError::failed(format!(
                "Drawing is write-protected: {}",
                path.display()
            )));
        }

        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.documents.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn plot_to_file(
        &mut self,
        doc: DocumentId,
        output: &Path,
        profile: &str,
    ) -> AutomationResult<()> {
        let input = self.document(doc)?.clone();
        let args = self.substitute_args(&input, output, profile);

        debug!(
            "Running plotter: command='{}', args={:?}",
            self.config.command.display(),
            args
        );

        let result = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                AutomationError::failed(format!(
                    "Failed to run {}: {}",
                    self.config.command.display(),
                    e
                ))
            })?;

        if result.status.success() {
            if !output.exists() {
                warn!(
                    "Plotter succeeded but output file not found: {}",
                    output.display()
                );
            }
            return Ok(());
        }

        let stderr: String = String::from_utf8_lossy(&result.stderr)
            .trim()
            .chars()
            .take(STDERR_EXCERPT)
            .collect();

        match result.status.code() {
            Some(code) if code == self.config.busy_exit_code => Err(AutomationError::busy(
                format!("Plotter reported the application busy: {}", stderr),
            )),
            Some(code) => Err(AutomationError::failed(format!(
                "Plotter exited with code {}: {}",
                code, stderr
            ))),
            None => Err(AutomationError::failed(format!(
                "Plotter was terminated by a signal: {}",
                stderr
            ))),
        }
    }

    fn close_document(&mut self, doc: DocumentId, _save_changes: bool) -> AutomationResult<()> {
        self.documents
            .remove(&doc)
            .map(|_| ())
            .ok_or_else(|| AutomationError::failed(format!("Document {} is not open", doc.0)))
    }

    fn quit(self: Box<Self>) -> AutomationResult<()> {
        if !self.documents.is_empty() {
            debug!("Quitting with {} drawing(s) still open", self.documents.len());
        }
        Ok(())
    }
}
