//! Gateway outcomes as Prometheus counters.

use qs_03_mutation_gateway::{MutationAction, MutationObserver};
use quote_telemetry::GATEWAY_MUTATIONS;
use shared_types::errors::{EntityKind, QuoteError};

/// Counts every gateway call in `qs_gateway_mutations_total`.
#[derive(Debug, Default)]
pub struct PrometheusObserver;

impl MutationObserver for PrometheusObserver {
    fn mutation_recorded(
        &self,
        entity: EntityKind,
        action: MutationAction,
        error: Option<&QuoteError>,
    ) {
        let entity = entity.to_string();
        let outcome = error.map_or("committed", QuoteError::kind);
        GATEWAY_MUTATIONS
            .with_label_values(&[entity.as_str(), action.as_str(), outcome])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        let rejected = GATEWAY_MUTATIONS.with_label_values(&["Date", "create", "uniqueness"]);
        let before = rejected.get();

        let error = QuoteError::Uniqueness {
            entity: EntityKind::LineItemDate,
            field: "date",
            value: "2024-01-01".into(),
        };
        PrometheusObserver.mutation_recorded(
            EntityKind::LineItemDate,
            MutationAction::Create,
            Some(&error),
        );

        assert_eq!(rejected.get(), before + 1);
    }
}
