//! Service layer: the workflows behind the HTTP handlers.

pub mod dashboard;
pub mod locations;
pub mod options;
pub mod outcome;
pub mod reports;
pub mod submissions;
pub mod tables;

pub use dashboard::DashboardService;
pub use locations::LocationResolver;
pub use options::{load_form_options, FormOptions, SubmitFlags};
pub use outcome::SubmissionStatus;
pub use reports::ReportAggregator;
pub use submissions::{Submission, SubmissionOutcome, SubmissionService};
pub use tables::TableBrowser;
