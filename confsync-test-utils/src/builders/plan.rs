//! Plan and apply response fixtures

use serde_json::{Value, json};

/// Builder for `migrate_settings_2_0` response bodies
#[derive(Debug, Default)]
pub struct PlanBuilder {
    modules: Vec<Value>,
}

impl PlanBuilder {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// One module with one resource per change kind
    ///
    /// Summarizes to `Add 1 resources:  test_module >>> test_resource_4`,
    /// `Update 1 resources:  test_module >>> test_resource_2` and
    /// `Delete 1 resources:  test_module >>> test_resource_3`.
    pub fn sample() -> Self {
        Self::new().with_module(
            "test_module",
            &["A", "U", "D"],
            &[
                ("test_resource_4", "A"),
                ("test_resource_2", "U"),
                ("test_resource_3", "D"),
            ],
        )
    }

    /// Append a module with its `stats` codes and `(key_id, status)` resources
    pub fn with_module(mut self, name: &str, stats: &[&str], resources: &[(&str, &str)]) -> Self {
        let data: Vec<Value> = resources
            .iter()
            .map(|(key_id, status)| json!({"key_id": key_id, "status": status}))
            .collect();

        self.modules.push(json!({
            "module": name,
            "stats": stats,
            "data": data,
        }));
        self
    }

    /// Append an already-shaped module object
    pub fn with_raw_module(mut self, module: Value) -> Self {
        self.modules.push(module);
        self
    }

    pub fn build(self) -> Value {
        json!({ "modules": self.modules })
    }
}

/// `terraform_apply_all` response body; `None` omits `apply_complete`
pub fn apply_result(complete: Option<bool>) -> Value {
    match complete {
        Some(flag) => json!({"log_dict": {"apply_complete": flag}}),
        None => json!({"log_dict": {}}),
    }
}
