//! Human-readable summary of a migration plan
//!
//! One line per reported change kind, e.g.
//! `Add 2 resources:  dashboards >>> d1 d2 alerting >>> a7`.

use crate::backend::{ChangeKind, PlanResult};
use std::fmt;

/// Resources of one change kind across all modules of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: ChangeKind,
    pub count: usize,
    /// ` <module> >>> <key> <key>` per contributing module, in plan order
    pub report: String,
}

impl fmt::Display for KindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} resources: {}", self.kind, self.count, self.report)
    }
}

/// Summarize the resources of `kind`
///
/// A module contributes only if its `stats` list the kind and at least one of
/// its resources carries that status.
pub fn summarize(plan: &PlanResult, kind: ChangeKind) -> KindSummary {
    let mut report = String::new();
    let mut count = 0;

    for module in plan.modules.iter().filter(|m| m.has_kind(kind)) {
        let keys: Vec<&str> = module
            .data
            .iter()
            .filter(|resource| resource.status == kind)
            .map(|resource| resource.key_id.as_str())
            .collect();

        if keys.is_empty() {
            continue;
        }

        count += keys.len();
        report.push_str(&format!(" {} >>>", module.module));
        for key in keys {
            report.push(' ');
            report.push_str(key);
        }
    }

    KindSummary {
        kind,
        count,
        report,
    }
}

/// Add, Update and Delete summaries, in that order
pub fn summary_lines(plan: &PlanResult) -> Vec<KindSummary> {
    ChangeKind::REPORTED
        .iter()
        .map(|kind| summarize(plan, *kind))
        .collect()
}
