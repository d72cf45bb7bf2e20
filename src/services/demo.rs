//! # Demo Dataset
//!
//! A fixed three-layer ecommerce pipeline used when the store is unreachable and
//! `timeline.demo_fallback_enabled` is set. The rows go through the regular
//! [`TimelineBuilder`] and the result is tagged [`DataSource::Demo`].

use chrono::Duration;

use crate::constants::DataSource;
use crate::models::{DependencyEdge, ExecutionRecord, ProjectRef};
use crate::timeline::{DayRange, TimelineBuilder, TimelineData};

const DEMO_NAMESPACE: &str = "demo";
const FIRST_RUN_HOUR: u32 = 10;
const STAGGER_MILLIS: i64 = 500;

/// `(schema, unit, runtime seconds)` in execution order
const DEMO_UNITS: &[(&str, &str, f64)] = &[
    ("staging", "stg_ecommerce__customers", 0.5),
    ("staging", "stg_ecommerce__products", 0.4),
    ("staging", "stg_ecommerce__orders", 0.6),
    ("staging", "stg_ecommerce__order_items", 0.4),
    ("intermediate", "int_customer_orders", 1.2),
    ("intermediate", "int_order_items_products", 0.8),
    ("marts", "dim_customers", 0.4),
    ("marts", "dim_products", 0.3),
    ("marts", "fct_orders", 1.5),
    ("marts", "mart_customer_orders", 1.1),
];

/// `(source, target)` as `schema.unit`
const DEMO_EDGES: &[(&str, &str)] = &[
    ("raw_data.customers", "staging.stg_ecommerce__customers"),
    ("raw_data.products", "staging.stg_ecommerce__products"),
    ("raw_data.orders", "staging.stg_ecommerce__orders"),
    ("raw_data.order_items", "staging.stg_ecommerce__order_items"),
    ("staging.stg_ecommerce__orders", "intermediate.int_customer_orders"),
    ("staging.stg_ecommerce__customers", "intermediate.int_customer_orders"),
    ("staging.stg_ecommerce__order_items", "intermediate.int_customer_orders"),
    ("staging.stg_ecommerce__order_items", "intermediate.int_order_items_products"),
    ("staging.stg_ecommerce__products", "intermediate.int_order_items_products"),
    ("staging.stg_ecommerce__customers", "marts.dim_customers"),
    ("staging.stg_ecommerce__products", "marts.dim_products"),
    ("intermediate.int_customer_orders", "marts.fct_orders"),
    ("staging.stg_ecommerce__orders", "marts.fct_orders"),
    ("intermediate.int_order_items_products", "marts.fct_orders"),
    ("marts.dim_customers", "marts.mart_customer_orders"),
    ("marts.fct_orders", "marts.mart_customer_orders"),
    ("staging.stg_ecommerce__orders", "marts.mart_customer_orders"),
];

pub fn demo_project(project_id: i32) -> ProjectRef {
    ProjectRef {
        id: project_id,
        name: "demo_ecommerce".to_string(),
        description: Some("Demo pipeline shown while the artifacts store is unavailable".to_string()),
        created_at: None,
    }
}

fn demo_edges() -> Vec<DependencyEdge> {
    DEMO_EDGES
        .iter()
        .map(|(source, target)| DependencyEdge::new(*source, *target))
        .collect()
}

/// Execution rows for `day`, starting at 10:00 and staggered by half a second
pub fn demo_records(day: &DayRange) -> Vec<ExecutionRecord> {
    let first_start = day.start + Duration::hours(i64::from(FIRST_RUN_HOUR));
    let edges = demo_edges();

    DEMO_UNITS
        .iter()
        .enumerate()
        .map(|(index, (schema, name, runtime))| {
            let qualified = format!("{schema}.{name}");
            let dependency_list = edges
                .iter()
                .filter(|edge| edge.target_model == qualified)
                .map(|edge| edge.source_model.clone())
                .collect();

            ExecutionRecord {
                unit_id: format!("{DEMO_NAMESPACE}.{qualified}"),
                unit_name: name.to_string(),
                namespace: DEMO_NAMESPACE.to_string(),
                schema: schema.to_string(),
                dependency_list,
                run_started_at: first_start + Duration::milliseconds(STAGGER_MILLIS * index as i64),
                total_runtime_seconds: *runtime,
            }
        })
        .collect()
}

/// Demo timeline for `project_id` on `day`, tagged as demo data
pub fn demo_timeline(builder: &TimelineBuilder, project_id: i32, day: &DayRange) -> TimelineData {
    builder.build_tagged(
        demo_project(project_id),
        day,
        &demo_records(day),
        DataSource::Demo,
    )
}
