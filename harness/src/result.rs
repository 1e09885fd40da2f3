use crate::output::Console;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const SUITE_NAME: &str = "ServiceNow Integration Validation";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Skipped => "SKIPPED",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TestStatus::Passed => "✅",
            TestStatus::Failed => "❌",
            TestStatus::Skipped => "⚠️",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

/// Outcome of one check. Never modified after it is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_name: String,
    pub status: TestStatus,
    pub message: String,
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    pub fn new(
        test_name: impl Into<String>,
        status: TestStatus,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            status,
            message: message.into(),
            details,
            timestamp: Utc::now(),
        }
    }
}

/// What a check concluded before it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub status: TestStatus,
    pub message: String,
    pub details: Option<Value>,
}

impl CheckOutcome {
    pub fn passed(message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            status: TestStatus::Passed,
            message: message.into(),
            details,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            message: message.into(),
            details: None,
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            message: message.into(),
            details: None,
        }
    }
}

/// Ordered accumulator for one run's results.
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: Vec<TestResult>,
    console: Console,
}

impl ResultCollector {
    pub fn new(console: Console) -> Self {
        Self {
            results: Vec::new(),
            console,
        }
    }

    pub fn console(&self) -> Console {
        self.console
    }

    pub fn record(
        &mut self,
        test_name: impl Into<String>,
        status: TestStatus,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> &TestResult {
        let result = TestResult::new(test_name, status, message, details);
        self.console.result(&result);
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Records `outcome`, or a failure carrying the error text prefixed with
    /// `failure_context` when the check errored.
    pub fn record_outcome<E: fmt::Display>(
        &mut self,
        test_name: &str,
        outcome: Result<CheckOutcome, E>,
        failure_context: &str,
    ) -> TestStatus {
        let outcome = outcome
            .unwrap_or_else(|e| CheckOutcome::failed(format!("{}: {}", failure_context, e)));
        self.record(test_name, outcome.status, outcome.message, outcome.details)
            .status
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn into_summary(self, duration_ms: u64) -> TestSummary {
        TestSummary::from_results(self.results, duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub suite_name: String,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<TestResult>,
    /// Wall-clock time of the run in milliseconds.
    pub duration: u64,
}

impl TestSummary {
    pub fn from_results(results: Vec<TestResult>, duration_ms: u64) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            suite_name: SUITE_NAME.to_string(),
            total_tests: results.len(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            skipped: count(TestStatus::Skipped),
            results,
            duration: duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// 0 when nothing failed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
