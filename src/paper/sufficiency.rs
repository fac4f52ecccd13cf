use std::collections::HashMap;

use serde::Serialize;

use crate::paper::catalog::PaperTemplate;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct TierSufficiency {
    pub(crate) label: &'static str,
    pub(crate) mark_value: i64,
    pub(crate) required: usize,
    pub(crate) available: usize,
    pub(crate) satisfied: bool,
}

/// Compares per-mark pool sizes against a template's tier quotas. Purely
/// advisory: generation proceeds regardless and degrades per tier.
pub(crate) fn check(
    counts_by_mark: &HashMap<i64, usize>,
    template: &PaperTemplate,
) -> Vec<TierSufficiency> {
    template
        .tiers
        .iter()
        .map(|tier| {
            let available = counts_by_mark.get(&tier.mark_value).copied().unwrap_or(0);
            TierSufficiency {
                label: tier.label,
                mark_value: tier.mark_value,
                required: tier.required,
                available,
                satisfied: available >= tier.required,
            }
        })
        .collect()
}

pub(crate) fn all_satisfied(report: &[TierSufficiency]) -> bool {
    report.iter().all(|tier| tier.satisfied)
}
