use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One named, ordered list of endpoints benchmarked as a unit.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointGroup {
    pub name: String,
    pub title: String,
    pub endpoints: Vec<String>,
}

/// Chain state fetched once per endpoint and used to parameterize the
/// method calls of that endpoint's pass. Discarded after the pass.
#[derive(Debug, Clone)]
pub struct ReferenceBundle {
    pub latest_block_number: Value,
    pub latest_block_hash: String,
    pub latest_transaction_hash: Option<String>,
}

/// Outcome of one timed RPC invocation.
///
/// `time` is always populated, including on failure, as the elapsed
/// milliseconds up to the point the failure was detected.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    pub method: String,
    pub time: f64,
    pub error: bool,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl CallResult {
    pub fn ok(method: &str, time: f64, result: Option<Value>) -> Self {
        Self {
            method: method.to_string(),
            time,
            error: false,
            error_message: String::new(),
            result,
        }
    }

    pub fn failed(method: &str, time: f64, error_message: String) -> Self {
        Self {
            method: method.to_string(),
            time,
            error: true,
            error_message,
            result: None,
        }
    }
}

/// All responses for one endpoint, one per catalog method, in catalog order.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResult {
    pub endpoint_url: String,
    pub responses: Vec<CallResult>,
}

/// An average or median over a set of non-error timings. Serialized as a
/// number, or the string "N/A" when the set was empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    Value(f64),
    NotAvailable,
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Value(v) => serializer.serialize_f64(*v),
            Stat::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MethodStats {
    pub method: String,
    pub average: Stat,
    pub median: Stat,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointStats {
    pub endpoint_url: String,
    pub average: Stat,
    pub median: Stat,
}

/// Everything the dashboard needs for one group: the raw result set plus
/// the per-method and per-endpoint summaries.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub results: Vec<EndpointResult>,
    pub method_stats: Vec<MethodStats>,
    pub endpoint_stats: Vec<EndpointStats>,
}
