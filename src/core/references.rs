use crate::domain::model::{Finding, FindingCategory, Router, Service};
use std::collections::BTreeSet;

/// Separator marking a service owned by another provider (`svc@docker`).
pub const CROSS_PROVIDER_SEPARATOR: char = '@';

/// Flags every router whose service is neither local nor cross-provider.
pub fn validate(routers: &[Router], services: &[Service]) -> Vec<Finding> {
    let known: BTreeSet<&str> = services.iter().map(|s| s.name.as_str()).collect();

    routers
        .iter()
        .filter_map(|router| {
            let service = router.service_ref.as_deref()?;

            if service.contains(CROSS_PROVIDER_SEPARATOR) {
                tracing::debug!(
                    "Router '{}' uses cross-provider service '{}', not checked",
                    router.name,
                    service
                );
                return None;
            }

            if known.contains(service) {
                return None;
            }

            Some(Finding::critical(
                FindingCategory::MissingService,
                format!(
                    "router `{}` references missing service `{}`",
                    router.name, service
                ),
                Some(router.name.clone()),
            ))
        })
        .collect()
}
