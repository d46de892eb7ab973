//! dwg-plot - Batch conversion of DWG drawings to PDF.
//!
//! The converter drives a drawing application through the small
//! [`automation::DrawingApp`] interface: start an instance, open each drawing,
//! plot it with a named plot configuration, close it, quit. Calls the
//! application rejects because it is busy are retried after a fixed delay.
//!
//! # Example
//!
//! ```no_run
//! use dwg_plot_rs::{BatchConverter, CommandLauncher, Config};
//!
//! let config = Config::new("drawings");
//! let mut converter = BatchConverter::new(CommandLauncher::new(config.plotter.clone()), &config);
//! let report = converter.run("drawings".as_ref(), config.extension()).unwrap();
//! println!("{} converted, {} failed", report.converted(), report.failed());
//! ```

pub mod automation;
pub mod batch;
pub mod config;
pub mod error;
pub mod report;
pub mod retry;
pub mod scan;

// Re-exports for convenience
pub use automation::{AppLauncher, CommandLauncher, DocumentId, DrawingApp};
pub use batch::{plan, BatchConverter};
pub use config::Config;
pub use error::{AutomationError, BatchError, ConfigError, Result};
pub use report::{BatchReport, FileReport, FileStatus};
pub use retry::RetryPolicy;
pub use scan::{find_drawings, output_path};
