use std::fmt;

use crate::error::HubResult;
use crate::types::{ChainInfo, DenomDetail, IbcConnectionInfo};

/// Secondary keys under which a chain name can be found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainAlias<'a> {
    ChainId(&'a str),
    Bech32Prefix(&'a str),
}

impl fmt::Display for ChainAlias<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainAlias::ChainId(id) => write!(f, "chain id {id}"),
            ChainAlias::Bech32Prefix(prefix) => write!(f, "bech32 prefix {prefix}"),
        }
    }
}

/// Read access to registered topology and assets.
///
/// Connections are exchanged in their normalised form, keyed by
/// [`connection_key`](crate::connection::connection_key).
pub trait HubView {
    fn chain(&self, name: &str) -> HubResult<Option<ChainInfo>>;

    fn chain_name(&self, alias: ChainAlias<'_>) -> HubResult<Option<String>>;

    fn connection(&self, key: &str) -> HubResult<Option<IbcConnectionInfo>>;

    fn asset(&self, denom: &str, chain_name: &str) -> HubResult<Option<DenomDetail>>;

    fn denom_for_brand(&self, brand: &str) -> HubResult<Option<String>>;
}

/// Write access. Registration rules live in [`crate::registry`]; implementations only
/// persist what they are handed.
pub trait HubStore: HubView {
    fn save_chain(&mut self, name: &str, info: &ChainInfo) -> HubResult<()>;

    fn save_chain_alias(&mut self, alias: ChainAlias<'_>, name: &str) -> HubResult<()>;

    fn remove_chain_alias(&mut self, alias: ChainAlias<'_>) -> HubResult<()>;

    fn save_connection(&mut self, key: &str, info: &IbcConnectionInfo) -> HubResult<()>;

    fn save_asset(&mut self, denom: &str, detail: &DenomDetail) -> HubResult<()>;

    fn save_brand(&mut self, brand: &str, denom: &str) -> HubResult<()>;

    fn remove_brand(&mut self, brand: &str) -> HubResult<()>;
}
