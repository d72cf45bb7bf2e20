#![allow(dead_code)]

use proptest::prelude::*;

/// Runtimes in seconds, sub-millisecond to several hours
pub fn runtime_seconds_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![0.0f64..1.0, 1.0f64..3600.0, 3600.0f64..20_000.0]
}

/// Warning/danger pairs with warning strictly below danger
pub fn threshold_strategy() -> impl Strategy<Value = (i64, i64)> {
    (0i64..60, 1i64..120).prop_map(|(warning, gap)| (warning, warning + gap))
}

/// Model names as dbt writes them
pub fn unit_name_strategy() -> impl Strategy<Value = String> {
    "(stg|int|dim|fct)_[a-z][a-z0-9_]{0,20}"
}
