//! Metrics setup and update for the query engine.

use prometheus::core::{AtomicU64, GenericCounter};

#[derive(Debug, Clone)]
pub struct Metrics {
    query_total: GenericCounter<AtomicU64>,
    mutation_total: GenericCounter<AtomicU64>,
    rejected_queries_total: GenericCounter<AtomicU64>,
    dropped_conditions_total: GenericCounter<AtomicU64>,
}

impl Metrics {
    /// Set up counters used to produce Prometheus metrics.
    pub fn initialize(metrics_registry: &mut prometheus::Registry) -> Result<Self, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "envsensor_query_total",
            "Total successful queries.",
        )?;

        let mutation_total = add_int_counter_metric(
            metrics_registry,
            "envsensor_mutation_total",
            "Total successful record mutations.",
        )?;

        let rejected_queries_total = add_int_counter_metric(
            metrics_registry,
            "envsensor_rejected_queries_total",
            "Total queries rejected because of invalid parameters.",
        )?;

        let dropped_conditions_total = add_int_counter_metric(
            metrics_registry,
            "envsensor_dropped_conditions_total",
            "Total malformed raw conditions left out of a query.",
        )?;

        Ok(Self {
            query_total,
            mutation_total,
            rejected_queries_total,
            dropped_conditions_total,
        })
    }

    pub fn record_successful_query(&self) {
        self.query_total.inc();
    }

    pub fn record_successful_mutation(&self) {
        self.mutation_total.inc();
    }

    pub fn record_rejected_query(&self) {
        self.rejected_queries_total.inc();
    }

    pub fn record_dropped_conditions(&self, count: usize) {
        self.dropped_conditions_total.inc_by(count as u64);
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry.
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, prometheus::Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_registered() {
        let mut registry = prometheus::Registry::new();
        let metrics = Metrics::initialize(&mut registry).unwrap();
        metrics.record_successful_query();
        metrics.record_dropped_conditions(2);

        let families = registry.gather();
        let value_of = |name: &str| {
            families
                .iter()
                .find(|family| family.get_name() == name)
                .map(|family| family.get_metric()[0].get_counter().get_value())
        };
        assert_eq!(value_of("envsensor_query_total"), Some(1.0));
        assert_eq!(value_of("envsensor_dropped_conditions_total"), Some(2.0));
        assert_eq!(value_of("envsensor_mutation_total"), Some(0.0));
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = prometheus::Registry::new();
        Metrics::initialize(&mut registry).unwrap();
        assert!(Metrics::initialize(&mut registry).is_err());
    }
}
