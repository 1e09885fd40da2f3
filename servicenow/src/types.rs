use serde_json::Value;
use std::fmt;

pub const TABLE_API: &str = "/api/now/table";

pub fn table_path(table: &str) -> String {
    format!("{}/{}", TABLE_API, table)
}

pub fn record_path(table: &str, sys_id: &str) -> String {
    format!("{}/{}/{}", TABLE_API, table, sys_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            params: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_query(self, query: &TableQuery) -> Self {
        query
            .to_params()
            .into_iter()
            .fold(self, |request, (key, value)| request.with_param(key, value))
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for the `sysparm_query` encoded query syntax.
///
/// Terms are joined with `^`, which the platform reads as AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedQuery {
    terms: Vec<String>,
}

impl EncodedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.terms.push(format!("{}={}", field, value));
        self
    }

    pub fn starts_with(mut self, field: &str, value: &str) -> Self {
        self.terms.push(format!("{}STARTSWITH{}", field, value));
        self
    }

    pub fn contains(mut self, field: &str, value: &str) -> Self {
        self.terms.push(format!("{}CONTAINS{}", field, value));
        self
    }

    pub fn is_not_empty(mut self, field: &str) -> Self {
        self.terms.push(format!("{}!=NULL", field));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.terms.join("^"))
    }
}

/// A filtered read against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub query: EncodedQuery,
    pub fields: Vec<String>,
    pub limit: Option<u32>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            query: EncodedQuery::new(),
            fields: Vec::new(),
            limit: None,
        }
    }

    pub fn with_filter(mut self, query: EncodedQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(("sysparm_query".to_string(), self.query.to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("sysparm_fields".to_string(), self.fields.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("sysparm_limit".to_string(), limit.to_string()));
        }
        params
    }

    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::get(table_path(&self.table)).with_query(self)
    }
}

/// Rows of a Table API list response. A missing or non-array `result`
/// yields no rows.
pub fn result_rows(body: &Value) -> Vec<Value> {
    body.get("result")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// `result.sys_id` of a Table API create response, if present.
pub fn created_sys_id(body: &Value) -> Option<String> {
    body.get("result")
        .and_then(|result| result.get("sys_id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(table_path("sys_db_object"), "/api/now/table/sys_db_object");
        assert_eq!(
            record_path("incident", "abc123"),
            "/api/now/table/incident/abc123"
        );
    }

    #[test]
    fn test_encoded_query_compound() {
        let query = EncodedQuery::new()
            .equals("name", "cmdb_ci_ot_ic_siveillance")
            .is_not_empty("element");
        assert_eq!(query.to_string(), "name=cmdb_ci_ot_ic_siveillance^element!=NULL");

        let query = EncodedQuery::new().starts_with("name", "x_ic_siveillance");
        assert_eq!(query.to_string(), "nameSTARTSWITHx_ic_siveillance");

        let query = EncodedQuery::new().contains("name", "cmdb_ci");
        assert_eq!(query.to_string(), "nameCONTAINScmdb_ci");
    }

    #[test]
    fn test_table_query_params() {
        let query = TableQuery::new("sys_properties")
            .with_filter(EncodedQuery::new().starts_with("name", "x_app"))
            .with_fields(&["name", "value"])
            .with_limit(100);

        let request = query.to_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/now/table/sys_properties");
        assert_eq!(request.param("sysparm_query"), Some("nameSTARTSWITHx_app"));
        assert_eq!(request.param("sysparm_fields"), Some("name,value"));
        assert_eq!(request.param("sysparm_limit"), Some("100"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_empty_table_query_has_no_params() {
        assert!(TableQuery::new("incident").to_params().is_empty());
    }

    #[test]
    fn test_result_rows() {
        assert_eq!(result_rows(&json!({ "result": [{ "a": 1 }, { "a": 2 }] })).len(), 2);
        assert!(result_rows(&json!({ "result": [] })).is_empty());
        assert!(result_rows(&json!({ "result": { "sys_id": "x" } })).is_empty());
        assert!(result_rows(&json!({})).is_empty());
        assert!(result_rows(&Value::Null).is_empty());
    }

    #[test]
    fn test_created_sys_id() {
        let body = json!({ "result": { "sys_id": "46d44a0f", "name": "x" } });
        assert_eq!(created_sys_id(&body).as_deref(), Some("46d44a0f"));
        assert_eq!(created_sys_id(&json!({ "result": {} })), None);
        assert_eq!(created_sys_id(&json!({ "result": { "sys_id": "" } })), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
