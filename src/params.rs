use crate::models::ReferenceBundle;
use serde_json::{json, Value};

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// The benchmarked RPC methods. `CATALOG` fixes the order, which is shared
/// by every endpoint in a run and drives the row order of the result grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    BlockNumber,
    GetBlockByNumber,
    GetBlockByHash,
    GetBlockTransactionCountByNumber,
    GetBlockTransactionCountByHash,
    GetTransactionByHash,
    GetTransactionReceipt,
    Call,
    GetLogs,
    GetBalance,
    GasPrice,
}

/// Parameter list for one method, or `Unavailable` when a required
/// reference value does not exist for this endpoint's latest block.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Ready(Vec<Value>),
    Unavailable,
}

impl Method {
    pub const CATALOG: [Method; 11] = [
        Method::BlockNumber,
        Method::GetBlockByNumber,
        Method::GetBlockByHash,
        Method::GetBlockTransactionCountByNumber,
        Method::GetBlockTransactionCountByHash,
        Method::GetTransactionByHash,
        Method::GetTransactionReceipt,
        Method::Call,
        Method::GetLogs,
        Method::GetBalance,
        Method::GasPrice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::BlockNumber => "eth_blockNumber",
            Method::GetBlockByNumber => "eth_getBlockByNumber",
            Method::GetBlockByHash => "eth_getBlockByHash",
            Method::GetBlockTransactionCountByNumber => "eth_getBlockTransactionCountByNumber",
            Method::GetBlockTransactionCountByHash => "eth_getBlockTransactionCountByHash",
            Method::GetTransactionByHash => "eth_getTransactionByHash",
            Method::GetTransactionReceipt => "eth_getTransactionReceipt",
            Method::Call => "eth_call",
            Method::GetLogs => "eth_getLogs",
            Method::GetBalance => "eth_getBalance",
            Method::GasPrice => "eth_gasPrice",
        }
    }

    /// Pure mapping from method to parameter list. Only the transaction
    /// hash can be missing from the bundle; methods that need it signal
    /// `Unavailable` instead of failing.
    pub fn params(self, refs: &ReferenceBundle) -> Params {
        match self {
            Method::BlockNumber | Method::GasPrice => Params::Ready(vec![]),
            Method::GetBlockByNumber => {
                Params::Ready(vec![refs.latest_block_number.clone(), json!(true)])
            }
            Method::GetBlockByHash => {
                Params::Ready(vec![json!(refs.latest_block_hash), json!(true)])
            }
            Method::GetBlockTransactionCountByNumber => {
                Params::Ready(vec![refs.latest_block_number.clone()])
            }
            Method::GetBlockTransactionCountByHash => {
                Params::Ready(vec![json!(refs.latest_block_hash)])
            }
            Method::GetTransactionByHash | Method::GetTransactionReceipt => {
                match &refs.latest_transaction_hash {
                    Some(hash) => Params::Ready(vec![json!(hash)]),
                    None => Params::Unavailable,
                }
            }
            Method::Call => Params::Ready(vec![json!({"to": ZERO_ADDRESS}), json!("latest")]),
            Method::GetLogs => Params::Ready(vec![
                json!({"fromBlock": "latest", "address": ZERO_ADDRESS}),
            ]),
            Method::GetBalance => Params::Ready(vec![json!(ZERO_ADDRESS), json!("latest")]),
        }
    }
}
