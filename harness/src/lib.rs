pub mod actions;
pub mod app;
pub mod checks;
pub mod error;
pub mod output;
pub mod report;
pub mod result;
pub mod runner;
pub mod sample;

pub use actions::{corrective_actions, CorrectiveAction, Severity};
pub use app::{AppConfig, ConfigVar, VarType};
pub use checks::{planned_checks, PlannedCheck};
pub use error::{HarnessError, HarnessResult};
pub use output::Console;
pub use report::{
    render_json, render_markdown, write_reports, JsonReport, ReportPaths, JSON_REPORT_FILE,
    MARKDOWN_REPORT_FILE,
};
pub use result::{CheckOutcome, ResultCollector, TestResult, TestStatus, TestSummary, SUITE_NAME};
pub use runner::ValidationRunner;
pub use sample::{generate_sample_data, SampleRecord, SAMPLE_SERIAL_PREFIX};
