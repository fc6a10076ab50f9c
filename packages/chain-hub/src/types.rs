use std::collections::BTreeMap;

use cosmwasm_std::Uint256;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Receiver address value for transfers handed to the packet-forward middleware.
/// Purposely not valid bech32.
pub const PFM_RECEIVER: &str = "pfm";

/// Port bound to the ICS-20 transfer module.
pub const TRANSFER_PORT: &str = "transfer";

/// Chain metadata registered under a local chain name (e.g. `osmosis`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    /// Protocol-level identifier, e.g. `osmosis-1`
    pub chain_id: String,
    pub bech32_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_tokens: Option<Vec<StakingToken>>,
    /// Keyed by counterparty chain id. `None` means unknown, not unconnected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<BTreeMap<String, IbcConnectionInfo>>,
    #[serde(default)]
    pub pfm_enabled: bool,
    #[serde(default)]
    pub icq_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icq_connection_id: Option<String>,
}

impl ChainInfo {
    pub fn new(chain_id: impl Into<String>, bech32_prefix: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            bech32_prefix: bech32_prefix.into(),
            staking_tokens: None,
            connections: None,
            pfm_enabled: false,
            icq_enabled: false,
            icq_connection_id: None,
        }
    }

    /// CAIP-2 identifier of the chain
    pub fn caip_id(&self) -> String {
        format!("cosmos:{}", self.chain_id)
    }

    /// Merge a newer registration into this record.
    ///
    /// Scalar fields take the newer value; connection entries are unioned with the
    /// newer entry winning per counterparty.
    pub fn merged_with(&self, newer: ChainInfo) -> ChainInfo {
        let connections = match (&self.connections, newer.connections) {
            (None, None) => None,
            (Some(old), None) => Some(old.clone()),
            (None, Some(new)) => Some(new),
            (Some(old), Some(new)) => {
                let mut merged = old.clone();
                merged.extend(new);
                Some(merged)
            }
        };
        ChainInfo {
            connections,
            ..newer
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct StakingToken {
    pub denom: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct IbcConnectionInfo {
    pub id: String,
    pub client_id: String,
    pub counterparty: ConnectionCounterparty,
    pub state: ConnectionState,
    #[serde(rename = "transferChannel")]
    pub transfer_channel: TransferChannel,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ConnectionCounterparty {
    pub client_id: String,
    pub connection_id: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Uninitialized,
    Init,
    Tryopen,
    Open,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferChannel {
    pub channel_id: String,
    pub counter_party_channel_id: String,
    pub port_id: String,
    pub counter_party_port_id: String,
    pub ordering: ChannelOrdering,
    pub state: ChannelState,
    pub version: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrdering {
    Unordered,
    Ordered,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Uninitialized,
    Init,
    Tryopen,
    Open,
    Closed,
}

/// A denom as held on one specific chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DenomDetail {
    /// Holding chain, e.g. `agoric`
    pub chain_name: String,
    /// Issuing chain, e.g. `cosmoshub`
    pub base_name: String,
    /// Denom on the issuing chain, e.g. `uatom`
    pub base_denom: String,
    /// Opaque reference to a local accounting unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct DenomAmount {
    pub denom: String,
    pub value: Uint256,
}

impl DenomAmount {
    pub fn new(denom: impl Into<String>, value: impl Into<Uint256>) -> Self {
        Self {
            denom: denom.into(),
            value: value.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AddressEncoding {
    Bech32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainAddress {
    pub chain_id: String,
    pub value: String,
    pub encoding: AddressEncoding,
}

impl ChainAddress {
    pub fn bech32(chain_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            value: value.into(),
            encoding: AddressEncoding::Bech32,
        }
    }
}

/// Either side of a connection lookup: a bare chain id or anything carrying one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChainIdArg {
    ChainId(String),
    Chain {
        #[serde(rename = "chainId")]
        chain_id: String,
    },
}

impl ChainIdArg {
    pub fn chain_id(&self) -> &str {
        match self {
            ChainIdArg::ChainId(id) => id,
            ChainIdArg::Chain { chain_id } => chain_id,
        }
    }
}

impl From<&str> for ChainIdArg {
    fn from(id: &str) -> Self {
        ChainIdArg::ChainId(id.to_string())
    }
}

impl From<String> for ChainIdArg {
    fn from(id: String) -> Self {
        ChainIdArg::ChainId(id)
    }
}

impl From<&ChainInfo> for ChainIdArg {
    fn from(info: &ChainInfo) -> Self {
        ChainIdArg::Chain {
            chain_id: info.chain_id.clone(),
        }
    }
}

impl From<&ChainAddress> for ChainIdArg {
    fn from(address: &ChainAddress) -> Self {
        ChainIdArg::Chain {
            chain_id: address.chain_id.clone(),
        }
    }
}

/// A destination given either as a bare address / CAIP-10 id or as a resolved address.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountIdArg {
    Address(String),
    ChainAddress(ChainAddress),
}

impl From<&str> for AccountIdArg {
    fn from(address: &str) -> Self {
        AccountIdArg::Address(address.to_string())
    }
}

impl From<ChainAddress> for AccountIdArg {
    fn from(address: ChainAddress) -> Self {
        AccountIdArg::ChainAddress(address)
    }
}

/// Caller overrides for a forwarded (multi-hop) transfer.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForwardOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u8>,
    /// Go duration string, e.g. `10m`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_recipient: Option<ChainAddress>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ForwardInfo {
    pub forward: Forward,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Forward {
    pub receiver: String,
    pub port: String,
    pub channel: String,
    pub retries: u8,
    pub timeout: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Token {
    pub denom: String,
    /// Decimal string
    pub amount: String,
}

/// The wire-level instruction for a transfer out of the holding chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRoute {
    pub source_port: String,
    pub source_channel: String,
    pub receiver: String,
    pub token: Token,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_info: Option<ForwardInfo>,
}

impl TransferRoute {
    /// The packet-forward memo for this route, if it is multi-hop.
    pub fn memo(&self) -> Option<String> {
        self.forward_info
            .as_ref()
            .and_then(|info| serde_json::to_string(info).ok())
    }
}

/// Subset of a chain-registry asset list entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct CosmosAssetInfo {
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<AssetTrace>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct AssetTrace {
    pub counterparty: TraceCounterparty,
    pub chain: TraceChain,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct TraceCounterparty {
    pub chain_name: String,
    pub base_denom: String,
    pub channel_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct TraceChain {
    pub channel_id: String,
    pub path: String,
}
