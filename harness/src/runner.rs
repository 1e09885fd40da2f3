use crate::app::AppConfig;
use crate::checks;
use crate::output::Console;
use crate::result::{ResultCollector, TestStatus, TestSummary};
use servicenow::TableApi;
use std::time::Instant;
use tracing::info;

/// Runs the checks one after another against a single instance.
pub struct ValidationRunner<'a> {
    api: &'a dyn TableApi,
    app: &'a AppConfig,
    console: Console,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(api: &'a dyn TableApi, app: &'a AppConfig) -> Self {
        Self {
            api,
            app,
            console: Console::default(),
        }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub async fn run(&self) -> TestSummary {
        let started = Instant::now();
        let mut results = ResultCollector::new(self.console);

        self.console.banner(&self.app.app_name);
        info!(
            "Validating {} on {}",
            self.app.app_name,
            self.api.instance_name()
        );

        let table_status = checks::table_exists(self.api, self.app, &mut results).await;
        checks::system_properties(self.api, self.app, &mut results).await;
        checks::update_set(self.api, self.app, &mut results).await;
        checks::table_fields(self.api, self.app, &mut results).await;
        checks::access_control(self.api, self.app, &mut results).await;

        if table_status == TestStatus::Passed {
            checks::data_round_trip(self.api, self.app, &mut results).await;
        } else {
            checks::skip_data_round_trip(&mut results);
        }

        let summary = results.into_summary(started.elapsed().as_millis() as u64);
        self.console.summary(&summary);
        info!(
            "Validation finished: {} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        );
        summary
    }
}
