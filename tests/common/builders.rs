//! Test data builders for execution rows and projects

#![allow(dead_code)]

use chrono::NaiveDateTime;
use dbt_timeline::models::{ExecutionRecord, ProjectRef};

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test timestamp")
}

pub fn project(id: i32, name: &str) -> ProjectRef {
    ProjectRef {
        id,
        name: name.to_string(),
        description: Some(format!("{name} analytics")),
        created_at: None,
    }
}

/// Builder for test ExecutionRecords
pub struct ExecutionRecordBuilder {
    name: String,
    schema: String,
    started_at: NaiveDateTime,
    runtime_seconds: f64,
    dependencies: Vec<String>,
}

impl ExecutionRecordBuilder {
    pub fn new(name: &str, started_at: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: "analytics".to_string(),
            started_at: ts(started_at),
            runtime_seconds: 1.0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_runtime(mut self, seconds: f64) -> Self {
        self.runtime_seconds = seconds;
        self
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    pub fn with_dependency(mut self, dependency: &str) -> Self {
        self.dependencies.push(dependency.to_string());
        self
    }

    pub fn build(self) -> ExecutionRecord {
        ExecutionRecord {
            unit_id: format!("model.jaffle_shop.{}", self.name),
            unit_name: self.name,
            namespace: "warehouse".to_string(),
            schema: self.schema,
            dependency_list: self.dependencies,
            run_started_at: self.started_at,
            total_runtime_seconds: self.runtime_seconds,
        }
    }
}
