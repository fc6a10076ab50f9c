use cosmwasm_std::StdError;
use thiserror::Error;

/// Failures surfaced by the hub's registries, address codec and route resolver.
///
/// The type is `Clone` so a single lazy lookup can hand the same outcome to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("chain info not found for holding chain: {chain_name}")]
    HoldingChainUnknown { chain_name: String },

    #[error("chain info not found for issuing chain: {chain_name}")]
    IssuingChainUnknown { chain_name: String },

    #[error("no denom detail for: {denom} on {chain_name}. ensure it is registered in chainHub.")]
    AssetUnregistered { denom: String, chain_name: String },

    #[error("no connection info found for {primary}<->{counterparty}")]
    ConnectionNotFound {
        primary: String,
        counterparty: String,
    },

    #[error("pfm not enabled on issuing chain: {chain_name}")]
    ForwardingNotSupported { chain_name: String },

    #[error("invalid bech32 address {address}: {reason}")]
    DecodeError { address: String, reason: String },

    #[error("Chain info not found for bech32Prefix {prefix}")]
    UnknownPrefix { prefix: String },

    #[error("invalid denom path: {path}")]
    InvalidFormat { path: String },

    #[error("chain not found:{chain_name}")]
    ChainNotFound { chain_name: String },

    #[error("chain {chain_name} is registered with chain id {registered}, not {provided}")]
    ChainIdMismatch {
        chain_name: String,
        registered: String,
        provided: String,
    },

    #[error("must register chain {chain_name} first")]
    ChainNotRegistered { chain_name: String },

    #[error("Connection {primary}<->{counterparty} not registered")]
    ConnectionNotRegistered {
        primary: String,
        counterparty: String,
    },

    #[error("{alias} is already registered to {registered}, not {chain_name}")]
    ChainAliasTaken {
        alias: String,
        chain_name: String,
        registered: String,
    },

    #[error("brand {brand} is already registered to {registered}, not {denom}")]
    BrandTaken {
        brand: String,
        denom: String,
        registered: String,
    },

    #[error("Asset {denom} on {chain_name} not registered")]
    AssetNotRegistered { denom: String, chain_name: String },

    #[error("{chain_name} must be a bare chain name")]
    InvalidChainName { chain_name: String },

    #[error("unsupported account id: {account_id}")]
    InvalidAccountId { account_id: String },

    #[error("connections missing for {chain_name}")]
    MissingConnections { chain_name: String },

    #[error("{chain_name} missing")]
    ChainInfoMissing { chain_name: String },

    #[error("unexpected {count} traces for {denom}")]
    UnexpectedTraces { denom: String, count: usize },

    #[error("invalid config: {msg}")]
    InvalidConfig { msg: String },

    #[error("storage error: {msg}")]
    Storage { msg: String },
}

pub type HubResult<T> = Result<T, HubError>;

impl From<StdError> for HubError {
    fn from(err: StdError) -> Self {
        HubError::Storage {
            msg: err.to_string(),
        }
    }
}

impl From<HubError> for StdError {
    fn from(err: HubError) -> Self {
        StdError::generic_err(err.to_string())
    }
}
