pub mod client;
pub mod config;
pub mod provider;
pub mod types;

pub use client::ServiceNowClient;
pub use config::InstanceConfig;
pub use provider::{ApiError, ApiResult, TableApi};
pub use types::{
    created_sys_id, record_path, result_rows, table_path, ApiRequest, EncodedQuery, HttpMethod,
    TableQuery, TABLE_API,
};

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::provider::*;
    pub use crate::types::*;
}
