//! Installation checks.
//!
//! Every check takes the instance API, the application descriptor and the
//! run's [`ResultCollector`], records exactly one result, and converts its own
//! errors into a failed result so the next check still runs.

use crate::app::AppConfig;
use crate::output::Console;
use crate::result::{CheckOutcome, ResultCollector, TestStatus};
use crate::sample::{generate_sample_data, SampleRecord, SAMPLE_SERIAL_PREFIX};
use serde::Serialize;
use serde_json::{json, Value};
use servicenow::{
    created_sys_id, record_path, result_rows, table_path, ApiRequest, ApiResult, EncodedQuery,
    TableApi, TableQuery,
};
use tracing::{debug, info, warn};

pub const TABLE_EXISTENCE: &str = "Table Existence Check";
pub const SYSTEM_PROPERTIES: &str = "System Properties Check";
pub const UPDATE_SET: &str = "Update Set Validation";
pub const TABLE_FIELDS: &str = "Table Fields Validation";
pub const ACCESS_CONTROL: &str = "ACL Validation";
pub const DATA_ROUND_TRIP: &str = "Data Read/Write Test";

/// A check as it would run, without touching the instance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlannedCheck {
    pub name: &'static str,
    pub description: String,
}

pub fn table_query(app: &AppConfig) -> TableQuery {
    TableQuery::new("sys_db_object")
        .with_filter(EncodedQuery::new().equals("name", &app.table_name))
        .with_fields(&["name", "label", "super_class"])
        .with_limit(1)
}

pub fn properties_query(app: &AppConfig) -> TableQuery {
    TableQuery::new("sys_properties")
        .with_filter(EncodedQuery::new().starts_with("name", &app.scope))
        .with_fields(&["name", "value"])
        .with_limit(100)
}

pub fn update_set_query(app: &AppConfig) -> TableQuery {
    TableQuery::new("sys_update_set")
        .with_filter(EncodedQuery::new().starts_with("name", &app.scope))
        .with_fields(&["name", "state"])
        .with_limit(10)
}

pub fn fields_query(app: &AppConfig) -> TableQuery {
    TableQuery::new("sys_dictionary")
        .with_filter(
            EncodedQuery::new()
                .equals("name", &app.table_name)
                .is_not_empty("element"),
        )
        .with_fields(&["element", "column_label", "internal_type"])
        .with_limit(100)
}

pub fn acl_query(app: &AppConfig) -> TableQuery {
    TableQuery::new("sys_security_acl")
        .with_filter(EncodedQuery::new().contains("name", &app.table_name))
        .with_fields(&["name", "operation", "type"])
        .with_limit(50)
}

pub fn verify_query(app: &AppConfig) -> TableQuery {
    TableQuery::new(app.table_name.clone())
        .with_filter(EncodedQuery::new().starts_with("serial_number", SAMPLE_SERIAL_PREFIX))
        .with_fields(&["name", "serial_number", "family", "state"])
        .with_limit(10)
}

pub fn planned_checks(app: &AppConfig) -> Vec<PlannedCheck> {
    let describe = |query: TableQuery| format!("GET {} ({})", table_path(&query.table), query.query);
    vec![
        PlannedCheck {
            name: TABLE_EXISTENCE,
            description: describe(table_query(app)),
        },
        PlannedCheck {
            name: SYSTEM_PROPERTIES,
            description: format!(
                "{}, expecting {} properties",
                describe(properties_query(app)),
                app.expected_property_count()
            ),
        },
        PlannedCheck {
            name: UPDATE_SET,
            description: describe(update_set_query(app)),
        },
        PlannedCheck {
            name: TABLE_FIELDS,
            description: describe(fields_query(app)),
        },
        PlannedCheck {
            name: ACCESS_CONTROL,
            description: describe(acl_query(app)),
        },
        PlannedCheck {
            name: DATA_ROUND_TRIP,
            description: format!(
                "POST {} sample records to {}, verify, then DELETE each (only if the table exists)",
                generate_sample_data().len(),
                table_path(&app.table_name)
            ),
        },
    ]
}

async fn fetch_rows(api: &dyn TableApi, query: &TableQuery) -> ApiResult<Vec<Value>> {
    let body = api.execute(query.to_request()).await?;
    Ok(result_rows(&body))
}

/// Records passed when the table is registered in `sys_db_object`; a missing
/// table is skipped rather than failed.
pub async fn table_exists(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let outcome = fetch_rows(api, &table_query(app)).await.map(|rows| {
        match rows.into_iter().next() {
            Some(table) => {
                let label = table
                    .get("label")
                    .and_then(Value::as_str)
                    .filter(|label| !label.is_empty())
                    .unwrap_or("N/A")
                    .to_string();
                CheckOutcome::passed(
                    format!("Table '{}' exists (label: {})", app.table_name, label),
                    Some(table),
                )
            }
            None => CheckOutcome::skipped(format!(
                "Table '{}' not found - install package first",
                app.table_name
            )),
        }
    });

    results.record_outcome(TABLE_EXISTENCE, outcome, "Table verification failed")
}

pub async fn system_properties(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let expected = app.expected_property_count();
    let outcome = fetch_rows(api, &properties_query(app))
        .await
        .map(|rows| properties_outcome(rows, expected));

    results.record_outcome(SYSTEM_PROPERTIES, outcome, "Property verification failed")
}

fn properties_outcome(rows: Vec<Value>, expected: usize) -> CheckOutcome {
    let found = rows.len();
    if found >= expected {
        CheckOutcome::passed(
            format!("Found {} properties (expected {})", found, expected),
            Some(Value::Array(rows)),
        )
    } else if found > 0 {
        CheckOutcome::failed(format!(
            "Only found {} properties, expected {}",
            found, expected
        ))
    } else {
        CheckOutcome::skipped("No properties configured yet - run post-install setup")
    }
}

pub async fn update_set(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let outcome = fetch_rows(api, &update_set_query(app)).await.map(|rows| {
        if rows.is_empty() {
            CheckOutcome::skipped("No update sets found - may be a new installation")
        } else {
            CheckOutcome::passed(
                format!("Found {} update set(s) for scope", rows.len()),
                Some(Value::Array(rows)),
            )
        }
    });

    results.record_outcome(UPDATE_SET, outcome, "Update set check failed")
}

pub async fn table_fields(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let outcome = fetch_rows(api, &fields_query(app)).await.map(|rows| {
        if rows.is_empty() {
            CheckOutcome::skipped("No custom fields found (table may extend base table)")
        } else {
            CheckOutcome::passed(
                format!("Table has {} custom field(s)", rows.len()),
                Some(Value::Array(rows)),
            )
        }
    });

    results.record_outcome(TABLE_FIELDS, outcome, "Field validation failed")
}

pub async fn access_control(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let outcome = fetch_rows(api, &acl_query(app)).await.map(|rows| {
        if rows.is_empty() {
            CheckOutcome::skipped("No ACL rules found (may use inherited or role-based security)")
        } else {
            CheckOutcome::passed(
                format!("Found {} ACL rule(s) for table", rows.len()),
                Some(Value::Array(rows)),
            )
        }
    });

    results.record_outcome(ACCESS_CONTROL, outcome, "ACL validation failed")
}

/// Writes the sample records, re-reads them, and deletes every record it
/// managed to create, whatever the outcome.
///
/// A partial write still passes; the failure count is kept in the message and
/// the details. A failed re-read fails the check.
pub async fn data_round_trip(
    api: &dyn TableApi,
    app: &AppConfig,
    results: &mut ResultCollector,
) -> TestStatus {
    let console = results.console();
    let samples = generate_sample_data();
    let mut created = Vec::new();

    let outcome = populate_and_verify(api, app, &samples, &mut created, console).await;
    let status = results.record_outcome(DATA_ROUND_TRIP, outcome, "Sample data population failed");

    cleanup_records(api, app, &created, console).await;
    status
}

/// Skipped round-trip result for when the table is not installed.
pub fn skip_data_round_trip(results: &mut ResultCollector) -> TestStatus {
    results
        .record(
            DATA_ROUND_TRIP,
            TestStatus::Skipped,
            "Table does not exist - install package first",
            None,
        )
        .status
}

async fn populate_and_verify(
    api: &dyn TableApi,
    app: &AppConfig,
    samples: &[SampleRecord],
    created: &mut Vec<String>,
    console: Console,
) -> ApiResult<CheckOutcome> {
    let path = table_path(&app.table_name);
    let mut failures = 0usize;

    console.line(&format!("\nWriting {} sample records...", samples.len()));

    for sample in samples {
        let body = serde_json::to_value(sample)?;
        match api.execute(ApiRequest::post(path.clone(), body)).await {
            Ok(response) => match created_sys_id(&response) {
                Some(sys_id) => {
                    console.line(&format!("  OK Created: {} ({})", sample.name, sys_id));
                    created.push(sys_id);
                }
                None => {
                    failures += 1;
                    console.line(&format!("  FAIL Failed: {}", sample.name));
                }
            },
            Err(e) => {
                failures += 1;
                console.line(&format!("  FAIL Error creating {}: {}", sample.name, e));
            }
        }
    }

    if created.is_empty() {
        return Ok(CheckOutcome::failed(format!(
            "Failed to create any records ({} errors)",
            failures
        )));
    }

    let rows = fetch_rows(api, &verify_query(app)).await?;
    console.line(&format!("\nVerified {} records in table", rows.len()));
    if !rows.is_empty() {
        console.line("Sample records:");
        for row in &rows {
            console.line(&format!(
                "  - {} [{}] - {}",
                field(row, "name"),
                field(row, "family"),
                field(row, "state")
            ));
        }
    }

    let mut message = format!("Created {}/{} records", created.len(), samples.len());
    if failures > 0 {
        message.push_str(&format!(" ({} failed)", failures));
    }

    Ok(CheckOutcome::passed(
        message,
        Some(json!({
            "created": created.clone(),
            "failures": failures,
            "verified": rows.len(),
        })),
    ))
}

fn field<'a>(row: &'a Value, name: &str) -> &'a str {
    row.get(name).and_then(Value::as_str).unwrap_or("")
}

/// Deletes each record by sys_id. A failing delete is logged and the rest
/// still run. Returns how many deletes succeeded.
pub async fn cleanup_records(
    api: &dyn TableApi,
    app: &AppConfig,
    created: &[String],
    console: Console,
) -> usize {
    if created.is_empty() {
        return 0;
    }

    let mut deleted = 0;
    for sys_id in created {
        match api
            .execute(ApiRequest::delete(record_path(&app.table_name, sys_id)))
            .await
        {
            Ok(_) => {
                debug!("Deleted {}/{}", app.table_name, sys_id);
                deleted += 1;
            }
            Err(e) => {
                warn!("Failed to delete {}/{}: {}", app.table_name, sys_id, e);
                console.line(&format!("  FAIL Could not delete {}: {}", sys_id, e));
            }
        }
    }

    info!("Cleaned up {} of {} test record(s)", deleted, created.len());
    console.line(&format!("Cleaned up {} test record(s).", deleted));
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({ "name": format!("x_ic_siveillance.prop_{}", i), "value": "1" }))
            .collect()
    }

    #[test]
    fn test_properties_outcome_thresholds() {
        assert_eq!(properties_outcome(rows(6), 6).status, TestStatus::Passed);
        assert_eq!(properties_outcome(rows(8), 6).status, TestStatus::Passed);
        assert_eq!(properties_outcome(rows(3), 6).status, TestStatus::Failed);
        assert_eq!(properties_outcome(rows(0), 6).status, TestStatus::Skipped);
        assert_eq!(properties_outcome(rows(0), 0).status, TestStatus::Passed);
        assert_eq!(properties_outcome(rows(2), 0).status, TestStatus::Passed);

        let partial = properties_outcome(rows(3), 6);
        assert_eq!(partial.message, "Only found 3 properties, expected 6");
    }

    #[test]
    fn test_queries_follow_descriptor() {
        let app = AppConfig::default();

        assert_eq!(
            table_query(&app).query.to_string(),
            "name=cmdb_ci_ot_ic_siveillance"
        );
        assert_eq!(
            properties_query(&app).query.to_string(),
            "nameSTARTSWITHx_ic_siveillance"
        );
        assert_eq!(
            fields_query(&app).query.to_string(),
            "name=cmdb_ci_ot_ic_siveillance^element!=NULL"
        );
        assert_eq!(
            acl_query(&app).query.to_string(),
            "nameCONTAINScmdb_ci_ot_ic_siveillance"
        );
        assert_eq!(
            verify_query(&app).query.to_string(),
            "serial_numberSTARTSWITHSIV-2024"
        );
        assert_eq!(table_query(&app).limit, Some(1));
        assert_eq!(acl_query(&app).limit, Some(50));
    }

    #[test]
    fn test_planned_checks_cover_every_check() {
        let plan = planned_checks(&AppConfig::default());
        let names: Vec<_> = plan.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                TABLE_EXISTENCE,
                SYSTEM_PROPERTIES,
                UPDATE_SET,
                TABLE_FIELDS,
                ACCESS_CONTROL,
                DATA_ROUND_TRIP
            ]
        );
        assert!(plan[0]
            .description
            .contains("/api/now/table/sys_db_object"));
        assert!(plan[1].description.contains("expecting 6 properties"));
    }
}
