use crate::models::{CallResult, EndpointResult};
use crate::params::{Method, Params};
use crate::rpc::{resolve_references, RpcClient, Transport};
use chrono::Utc;

const NO_TRANSACTION_HASH: &str = "No transaction hash available";

/// Benchmarks every endpoint against every catalog method, strictly
/// sequentially in input order. Always yields one `EndpointResult` per
/// endpoint with one response per method; an endpoint that fails reference
/// resolution gets a full row of failed results instead of aborting the run.
pub async fn run_benchmark<T: Transport>(
    client: &RpcClient<T>,
    endpoints: &[String],
    methods: &[Method],
) -> Vec<EndpointResult> {
    let mut results = Vec::with_capacity(endpoints.len());
    for url in endpoints {
        results.push(benchmark_endpoint(client, url, methods).await);
    }
    results
}

async fn benchmark_endpoint<T: Transport>(
    client: &RpcClient<T>,
    url: &str,
    methods: &[Method],
) -> EndpointResult {
    let refs = match resolve_references(client, url).await {
        Ok(refs) => refs,
        Err(e) => {
            eprintln!(
                "[{}] [{}] reference resolution failed: {}",
                Utc::now().to_rfc3339(),
                url,
                e.message
            );
            return all_failed(url, methods, &e.message);
        }
    };

    let mut responses = Vec::with_capacity(methods.len());
    for method in methods {
        let response = match method.params(&refs) {
            Params::Unavailable => {
                CallResult::failed(method.name(), 0.0, NO_TRANSACTION_HASH.to_string())
            }
            Params::Ready(params) => client.call(url, method.name(), params).await,
        };
        if response.error {
            eprintln!(
                "[{}] [{}] {} failed: {}",
                Utc::now().to_rfc3339(),
                url,
                response.method,
                response.error_message
            );
        }
        responses.push(response);
    }

    println!(
        "[{}] [{}] benchmarked {} methods",
        Utc::now().to_rfc3339(),
        url,
        responses.len()
    );

    EndpointResult {
        endpoint_url: url.to_string(),
        responses,
    }
}

fn all_failed(url: &str, methods: &[Method], message: &str) -> EndpointResult {
    EndpointResult {
        endpoint_url: url.to_string(),
        responses: methods
            .iter()
            .map(|m| CallResult::failed(m.name(), 0.0, message.to_string()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::*;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn urls(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    /// Scripted pass for one endpoint: resolution plus all eleven methods.
    fn healthy_endpoint_script(
        script: &mut Vec<Result<crate::rpc::TransportResponse, crate::rpc::TransportError>>,
    ) {
        script.push(http_ok(json!("0x10"), 1.0));
        script.push(http_ok(block_with_transactions(&["0xtx"]), 2.0));
        for _ in Method::CATALOG {
            script.push(http_ok(json!("0x1"), 10.0));
        }
    }

    #[tokio::test]
    async fn result_shape_matches_inputs() {
        let mut script = Vec::new();
        healthy_endpoint_script(&mut script);
        healthy_endpoint_script(&mut script);
        let client = RpcClient::new(FakeTransport::new(script));

        let results = run_benchmark(&client, &urls(&["http://a", "http://b"]), &Method::CATALOG).await;
        assert_eq!(results.len(), 2);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.endpoint_url, ["http://a", "http://b"][i]);
            assert_eq!(result.responses.len(), Method::CATALOG.len());
            for (response, method) in result.responses.iter().zip(Method::CATALOG) {
                assert_eq!(response.method, method.name());
                assert!(!response.error);
            }
        }
    }

    #[tokio::test]
    async fn resolution_failure_expands_to_full_failed_row() {
        let transport = FakeTransport::new(vec![transport_error("connect timeout", 30.0)]);
        let client = RpcClient::new(transport);

        let results = run_benchmark(&client, &urls(&["http://down"]), &Method::CATALOG).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].responses.len(), Method::CATALOG.len());
        for response in &results[0].responses {
            assert!(response.error);
            assert_eq!(response.time, 0.0);
            assert_eq!(response.error_message, "connect timeout (30.00 ms)");
        }
    }

    #[tokio::test]
    async fn failing_endpoint_does_not_block_the_next_one() {
        let mut script = vec![transport_error("connection refused", 5.0)];
        healthy_endpoint_script(&mut script);
        let client = RpcClient::new(FakeTransport::new(script));

        let results = run_benchmark(&client, &urls(&["http://a", "http://b"]), &Method::CATALOG).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].responses.iter().all(|r| r.error));
        assert!(results[1].responses.iter().all(|r| !r.error));
        assert_eq!(results[0].endpoint_url, "http://a");
        assert_eq!(results[1].endpoint_url, "http://b");
    }

    #[tokio::test]
    async fn missing_transaction_hash_skips_network_calls() {
        // Empty latest block: resolution succeeds but the two
        // transaction-hash methods must not go to the wire.
        let mut script = vec![
            http_ok(json!("0x10"), 1.0),
            http_ok(block_with_transactions(&[]), 2.0),
        ];
        let wire_methods = Method::CATALOG.len() - 2;
        for _ in 0..wire_methods {
            script.push(http_ok(json!("0x1"), 10.0));
        }
        let transport = FakeTransport::new(script);
        let counter = transport.counter();
        let client = RpcClient::new(transport);

        let results = run_benchmark(&client, &urls(&["http://a"]), &Method::CATALOG).await;
        // 2 resolution calls plus one per method that had params.
        assert_eq!(counter.load(Ordering::SeqCst), 2 + wire_methods);

        let by_method = |name: &str| {
            results[0]
                .responses
                .iter()
                .find(|r| r.method == name)
                .unwrap()
                .clone()
        };
        for name in ["eth_getTransactionByHash", "eth_getTransactionReceipt"] {
            let response = by_method(name);
            assert!(response.error);
            assert_eq!(response.time, 0.0);
            assert_eq!(response.error_message, "No transaction hash available");
        }
        assert!(!by_method("eth_gasPrice").error);
    }

    #[tokio::test]
    async fn per_method_failures_are_isolated() {
        let mut script = vec![
            http_ok(json!("0x10"), 1.0),
            http_ok(block_with_transactions(&["0xtx"]), 2.0),
        ];
        // First catalog method fails at the RPC level, the rest succeed.
        script.push(rpc_error("execution reverted", 8.0));
        for _ in 1..Method::CATALOG.len() {
            script.push(http_ok(json!("0x1"), 10.0));
        }
        let client = RpcClient::new(FakeTransport::new(script));

        let results = run_benchmark(&client, &urls(&["http://a"]), &Method::CATALOG).await;
        let responses = &results[0].responses;
        assert!(responses[0].error);
        assert_eq!(responses[0].error_message, "execution reverted (8.00 ms)");
        assert!(responses[1..].iter().all(|r| !r.error));
    }
}
