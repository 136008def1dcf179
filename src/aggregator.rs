//! The blocking aggregator facade.
//!
//! `HttpRequestAggregator` owns everything one batch needs: its configuration, a
//! transport, a current-thread executor and the state of the latest run. There is
//! no process-wide event loop; two aggregators never share scheduling state.

use std::sync::Arc;

use log::error;
use tokio::runtime::Runtime;

use crate::aggregate::{fragments, parse_aggregate, ReturnData};
use crate::config::Config;
use crate::error_handling::{AggregatorError, InitializationError};
use crate::fetch::{ReqwestTransport, RequestBatch, Timeouts, Transport};
use crate::initialization::{init_client, init_runtime};
use crate::report;
use crate::run::{execute_run, Run, RunReport, TrackerState};
use crate::store::ResponseRecord;

/// Fans a batch of URIs out as concurrent GET requests and aggregates the results.
///
/// # Example
///
/// ```no_run
/// use http_request_aggregator::{Config, HttpRequestAggregator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut aggregator = HttpRequestAggregator::new(Config {
///     uris: vec![
///         "https://api.example.com/items/1".to_string(),
///         "https://api.example.com/items/2".to_string(),
///     ],
///     ..Default::default()
/// })?;
///
/// aggregator.run_batch()?;
/// print!("{}", aggregator.summary());
/// println!("{}", aggregator.aggregated_json()?);
/// # Ok(())
/// # }
/// ```
pub struct HttpRequestAggregator<T: Transport = ReqwestTransport> {
    config: Config,
    runtime: Runtime,
    transport: Arc<T>,
    batch: RequestBatch,
    run: Option<Run>,
    processed: usize,
}

impl HttpRequestAggregator<ReqwestTransport> {
    /// Creates an aggregator backed by a `reqwest` client built from `config`.
    ///
    /// The batch is not fetched until `run_batch` is called.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the HTTP client or the executor cannot be built.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        Self::with_transport(config, ReqwestTransport::new(client))
    }
}

impl<T: Transport> HttpRequestAggregator<T> {
    /// Creates an aggregator that issues its requests through `transport`.
    pub fn with_transport(config: Config, transport: T) -> Result<Self, InitializationError> {
        let runtime = init_runtime()?;
        let batch = RequestBatch::from(&config);
        Ok(Self {
            config,
            runtime,
            transport: Arc::new(transport),
            batch,
            run: None,
            processed: 0,
        })
    }

    /// Replaces the batch and discards the current run, including its cached aggregate.
    pub fn reset_batch(&mut self, uris: Vec<String>) {
        self.batch = self.batch.with_uris(uris);
        self.run = None;
    }

    /// Executes one run over the current batch, blocking until every request has
    /// completed.
    ///
    /// Each call starts from a fresh counter, store and aggregation cache.
    ///
    /// # Errors
    ///
    /// Returns `AggregatorError::Configuration` if the method is not GET; no request
    /// is issued in that case.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context, since the
    /// aggregator drives its own executor. Use `run::execute_run` from async code.
    pub fn run_batch(&mut self) -> Result<&RunReport, AggregatorError> {
        self.run = None;
        let run = self.runtime.block_on(execute_run(
            Arc::clone(&self.transport),
            self.batch.clone(),
            Timeouts::from(&self.config),
        ))?;
        self.processed += run.tracker().completions();
        Ok(self.run.insert(run).report())
    }

    /// `"<code>: <count>"` lines for the latest run. Empty before the first run.
    pub fn summary(&self) -> String {
        self.run
            .as_ref()
            .map(|run| report::summary(run.store()))
            .unwrap_or_default()
    }

    /// Non-2xx codes of the latest run, ascending, with their records.
    pub fn failed_requests(&self) -> Vec<(u16, &[ResponseRecord])> {
        self.run
            .as_ref()
            .map(|run| report::failed_requests(run.store()))
            .unwrap_or_default()
    }

    /// The raw aggregate of the latest run's 200 bodies, memoized per run.
    ///
    /// # Errors
    ///
    /// `NoSuccessfulResponses` when there is no run or its 200 bucket is empty;
    /// `Decode` when a body is not valid UTF-8.
    pub fn aggregate(&mut self) -> Result<&str, AggregatorError> {
        match self.run.as_mut() {
            Some(run) => run.aggregate(),
            None => {
                error!("No successful responses: no run has completed");
                Err(AggregatorError::NoSuccessfulResponses)
            }
        }
    }

    /// The aggregate, validated and re-serialized as compact JSON.
    pub fn aggregated_json(&mut self) -> Result<String, AggregatorError> {
        let value = parse_aggregate(self.aggregate()?)?;
        Ok(value.to_string())
    }

    /// The aggregate as a parsed JSON array (`as_json`) or as one JSON string per
    /// element.
    pub fn return_data(&mut self, as_json: bool) -> Result<ReturnData, AggregatorError> {
        let aggregate = self.aggregate()?;
        if as_json {
            Ok(ReturnData::Json(parse_aggregate(aggregate)?))
        } else {
            Ok(ReturnData::Fragments(fragments(aggregate)?))
        }
    }

    /// Completions recorded over the lifetime of this aggregator, across runs.
    pub fn processed_count(&self) -> usize {
        self.processed
    }

    /// The batch the next run will execute.
    pub fn batch(&self) -> &RequestBatch {
        &self.batch
    }

    /// The latest run, if one has completed since the last reset.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// `Idle` until a run has completed, then the latest run's tracker state.
    pub fn tracker_state(&self) -> TrackerState {
        self.run
            .as_ref()
            .map(|run| run.tracker().state())
            .unwrap_or(TrackerState::Idle)
    }

    /// Configuration this aggregator was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpMethod;
    use crate::error_handling::ConfigurationError;
    use crate::fetch::test_helpers::ScriptedTransport;
    use serde_json::{json, Value};

    fn aggregator(
        uris: &[&str],
        transport: ScriptedTransport,
    ) -> HttpRequestAggregator<ScriptedTransport> {
        let config = Config {
            uris: uris.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        };
        HttpRequestAggregator::with_transport(config, transport).expect("aggregator should build")
    }

    fn mixed_transport() -> ScriptedTransport {
        ScriptedTransport::new()
            .respond("http://api/a", 200, "{\"a\":1}")
            .respond("http://api/b", 200, "{\"b\":2}")
            .respond("http://api/missing", 404, "")
    }

    #[test]
    fn test_construction_does_not_fetch() {
        let agg = aggregator(&["http://api/a"], mixed_transport());
        assert_eq!(agg.tracker_state(), TrackerState::Idle);
        assert!(agg.run().is_none());
        assert_eq!(agg.summary(), "");
        assert!(agg.failed_requests().is_empty());
        assert_eq!(agg.processed_count(), 0);
    }

    #[test]
    fn test_two_successes_and_a_404() {
        let mut agg = aggregator(
            &["http://api/a", "http://api/b", "http://api/missing"],
            mixed_transport(),
        );
        let report = agg.run_batch().expect("run should execute").clone();
        assert_eq!(report.total_requests, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(agg.tracker_state(), TrackerState::Complete);

        let failed = agg.failed_requests();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, 404);
        assert_eq!(failed[0].1.len(), 1);
        assert_eq!(failed[0].1[0].url(), "http://api/missing");

        let parsed: Value = serde_json::from_str(&agg.aggregated_json().unwrap()).unwrap();
        let items = parsed.as_array().expect("aggregate is an array");
        assert_eq!(items.len(), 2);
        assert!(items.contains(&json!({"a": 1})));
        assert!(items.contains(&json!({"b": 2})));
    }

    #[test]
    fn test_empty_batch() {
        let mut agg = aggregator(&[], ScriptedTransport::new());
        let report = agg.run_batch().unwrap();
        assert_eq!(report.total_requests, 0);
        assert_eq!(agg.tracker_state(), TrackerState::Complete);
        assert_eq!(agg.run().unwrap().tracker().in_flight(), 0);
        assert!(matches!(
            agg.aggregated_json(),
            Err(AggregatorError::NoSuccessfulResponses)
        ));
        // Reporting stays available after a failed aggregation
        assert_eq!(agg.summary(), "");
    }

    #[test]
    fn test_aggregate_before_any_run() {
        let mut agg = aggregator(&["http://api/a"], mixed_transport());
        assert!(matches!(
            agg.aggregate(),
            Err(AggregatorError::NoSuccessfulResponses)
        ));
    }

    #[test]
    fn test_non_get_method_fails_fast() {
        let config = Config {
            uris: vec!["http://api/a".to_string()],
            method: HttpMethod::Put,
            ..Default::default()
        };
        let mut agg = HttpRequestAggregator::with_transport(config, mixed_transport()).unwrap();

        let err = agg.run_batch().expect_err("PUT is not dispatchable");
        assert!(matches!(
            err,
            AggregatorError::Configuration(ConfigurationError::UnsupportedMethod(HttpMethod::Put))
        ));
        assert!(agg.run().is_none());
        assert_eq!(agg.processed_count(), 0);
    }

    #[test]
    fn test_reset_batch_discards_previous_run() {
        let transport = mixed_transport().respond("http://api/c", 200, "{\"c\":3}");
        let mut agg = aggregator(&["http://api/a", "http://api/b"], transport);
        agg.run_batch().unwrap();
        match agg.return_data(true).unwrap() {
            ReturnData::Json(Value::Array(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected a JSON array, got {other:?}"),
        }

        agg.reset_batch(vec!["http://api/c".to_string()]);
        assert!(agg.run().is_none());
        assert_eq!(agg.summary(), "");
        assert_eq!(agg.batch().uris(), &["http://api/c".to_string()]);

        agg.run_batch().unwrap();
        assert_eq!(agg.aggregated_json().unwrap(), "[{\"c\":3}]");
        assert_eq!(agg.summary(), "200: 1\n");
        assert_eq!(agg.processed_count(), 3);
    }

    #[test]
    fn test_rerun_starts_a_fresh_store() {
        let mut agg = aggregator(&["http://api/a", "http://api/missing"], mixed_transport());
        agg.run_batch().unwrap();
        agg.aggregate().unwrap();
        agg.run_batch().unwrap();

        let run = agg.run().unwrap();
        assert!(!run.is_aggregate_cached());
        assert_eq!(run.store().total(), 2);
        assert_eq!(agg.processed_count(), 4);
    }

    #[test]
    fn test_return_data_fragments() {
        let transport = ScriptedTransport::new().respond("http://api/text", 200, "{\"t\":\"x, [y]\"}");
        let mut agg = aggregator(&["http://api/text"], transport);
        agg.run_batch().unwrap();

        assert_eq!(
            agg.return_data(false).unwrap(),
            ReturnData::Fragments(vec!["{\"t\":\"x, [y]\"}".to_string()])
        );
    }

    #[test]
    fn test_validated_outputs_keep_body_values_intact() {
        let body = "{\"z\":1,\"a\":123456789012345678901234567890,\"f\":0.10000000000000000555}";
        let transport = ScriptedTransport::new().respond("http://api/precise", 200, body);
        let mut agg = aggregator(&["http://api/precise"], transport);
        agg.run_batch().unwrap();

        assert_eq!(agg.aggregated_json().unwrap(), format!("[{body}]"));
        assert_eq!(
            agg.return_data(false).unwrap(),
            ReturnData::Fragments(vec![body.to_string()])
        );
        match agg.return_data(true).unwrap() {
            ReturnData::Json(Value::Array(items)) => {
                let keys: Vec<&str> = items[0]
                    .as_object()
                    .expect("object body")
                    .keys()
                    .map(String::as_str)
                    .collect();
                assert_eq!(keys, vec!["z", "a", "f"]);
                assert_eq!(items[0]["a"].to_string(), "123456789012345678901234567890");
            }
            other => panic!("expected a JSON array, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_surfaces_and_reporting_survives() {
        let transport = ScriptedTransport::new().respond("http://api/bin", 200, vec![0xFFu8, 0xFE]);
        let mut agg = aggregator(&["http://api/bin"], transport);
        agg.run_batch().unwrap();

        match agg.aggregate() {
            Err(AggregatorError::Decode { url, .. }) => assert_eq!(url, "http://api/bin"),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(!agg.run().unwrap().is_aggregate_cached());
        assert_eq!(agg.summary(), "200: 1\n");
        assert!(agg.failed_requests().is_empty());
    }
}
