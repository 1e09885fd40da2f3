//! Report artifacts written at the end of every run.
//!
//! `test-results.json` holds the full summary, the application descriptor and
//! the corrective actions. `TEST_REPORT.md` is the same information for humans.

use crate::actions::{corrective_actions, CorrectiveAction};
use crate::app::AppConfig;
use crate::error::HarnessResult;
use crate::result::TestSummary;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const JSON_REPORT_FILE: &str = "test-results.json";
pub const MARKDOWN_REPORT_FILE: &str = "TEST_REPORT.md";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub summary: &'a TestSummary,
    pub config: &'a AppConfig,
    pub instance: &'a str,
    pub timestamp: DateTime<Utc>,
    pub corrective_actions: Vec<CorrectiveAction>,
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a TestSummary, config: &'a AppConfig, instance: &'a str) -> Self {
        Self {
            summary,
            config,
            instance,
            timestamp: Utc::now(),
            corrective_actions: corrective_actions(&summary.results),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

pub fn render_json(summary: &TestSummary, config: &AppConfig, instance: &str) -> HarnessResult<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(summary, config, instance))?)
}

pub fn render_markdown(
    summary: &TestSummary,
    config: &AppConfig,
    instance: &str,
    generated_at: DateTime<Utc>,
) -> HarnessResult<String> {
    let date = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut md = String::new();

    md.push_str("# ServiceNow Integration Test Report\n\n");
    md.push_str(&format!("**Application**: {}\n\n", config.app_name));
    md.push_str(&format!("**Scope**: {}\n\n", config.scope));
    md.push_str(&format!("**Instance**: {}\n\n", instance));
    md.push_str(&format!("**Date**: {}\n\n", date));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Total Tests**: {}\n", summary.total_tests));
    md.push_str(&format!("- **Passed**: ✅ {}\n", summary.passed));
    md.push_str(&format!("- **Failed**: ❌ {}\n", summary.failed));
    md.push_str(&format!("- **Skipped**: ⚠️ {}\n", summary.skipped));
    md.push_str(&format!("- **Duration**: {}ms\n", summary.duration));
    let overall = if summary.is_success() {
        "✅ PASS"
    } else {
        "❌ FAIL"
    };
    md.push_str(&format!("- **Overall Status**: {}\n", overall));

    md.push_str("\n## Test Results\n\n");
    for result in &summary.results {
        md.push_str(&format!("### {} {}\n\n", result.status.icon(), result.test_name));
        md.push_str(&format!("- **Status**: {}\n", result.status.label()));
        md.push_str(&format!("- **Message**: {}\n", result.message));
        if let Some(details) = &result.details {
            let pretty = serde_json::to_string_pretty(details)?;
            md.push_str(&format!("- **Details**:\n\n```json\n{}\n```\n", pretty));
        }
        md.push('\n');
    }

    let actions = corrective_actions(&summary.results);
    if actions.is_empty() {
        md.push_str("## ✅ No Corrective Actions Needed\n\n");
        md.push_str(
            "All tests passed or were appropriately skipped. The integration is ready for use.\n",
        );
    } else {
        md.push_str("## ⚠️ Corrective Actions Required\n\n");
        for action in &actions {
            md.push_str(&format!(
                "### {} (Severity: {})\n\n",
                action.test,
                action.severity.to_string().to_uppercase()
            ));
            md.push_str(&format!("**Action**: {}\n\n", action.action));
        }
    }

    md.push_str("\n---\n\n");
    md.push_str("*Generated by ServiceNow Integration Test Suite*\n");
    Ok(md)
}

/// Writes both report files into `dir`, creating it if needed.
pub fn write_reports(
    dir: &Path,
    summary: &TestSummary,
    config: &AppConfig,
    instance: &str,
) -> HarnessResult<ReportPaths> {
    std::fs::create_dir_all(dir)?;

    let report = JsonReport::new(summary, config, instance);
    let json = serde_json::to_string_pretty(&report)?;
    let markdown = render_markdown(summary, config, instance, report.timestamp)?;

    let paths = ReportPaths {
        json: dir.join(JSON_REPORT_FILE),
        markdown: dir.join(MARKDOWN_REPORT_FILE),
    };
    std::fs::write(&paths.json, json)?;
    std::fs::write(&paths.markdown, markdown)?;

    info!(
        "Reports written to {} and {}",
        paths.json.display(),
        paths.markdown.display()
    );
    Ok(paths)
}
