use crate::error::{HubError, HubResult};
use crate::store::{ChainAlias, HubView};
use crate::types::{AccountIdArg, ChainAddress};

/// Separator between the human-readable part and the data part of a bech32 string.
const BECH32_SEPARATOR: char = '1';

/// Human-readable prefix of a bech32 address (`osmo` for `osmo1...`).
///
/// The separator is the last `1` in the string, so prefixes may themselves contain `1`.
pub fn bech32_prefix(address: &str) -> HubResult<&str> {
    let decode_error = |reason: &str| HubError::DecodeError {
        address: address.to_string(),
        reason: reason.to_string(),
    };
    let (prefix, _) = address
        .rsplit_once(BECH32_SEPARATOR)
        .ok_or_else(|| decode_error("missing separator"))?;
    if prefix.is_empty() {
        return Err(decode_error("empty prefix"));
    }
    Ok(prefix)
}

/// Resolve a bech32 address, or a `cosmos:<chainId>:<address>` account id, to a
/// [`ChainAddress`] on a registered chain.
pub fn make_chain_address(view: &impl HubView, partial_id: &str) -> HubResult<ChainAddress> {
    if let Some(address) = parse_account_id(partial_id)? {
        return Ok(address);
    }
    let chain_id = chain_id_for_address(view, partial_id)?;
    Ok(ChainAddress::bech32(chain_id, partial_id))
}

/// Identity for an already resolved address.
pub fn coerce_cosmos_address(view: &impl HubView, arg: AccountIdArg) -> HubResult<ChainAddress> {
    match arg {
        AccountIdArg::ChainAddress(address) => Ok(address),
        AccountIdArg::Address(address) => make_chain_address(view, &address),
    }
}

/// CAIP-10 account id (`cosmos:<chainId>:<address>`) for a bech32 address.
pub fn resolve_account_id(view: &impl HubView, partial_id: &str) -> HubResult<String> {
    if partial_id.split(':').count() == 3 {
        return Ok(partial_id.to_string());
    }
    let chain_id = chain_id_for_address(view, partial_id)?;
    Ok(format!("cosmos:{chain_id}:{partial_id}"))
}

fn parse_account_id(partial_id: &str) -> HubResult<Option<ChainAddress>> {
    let parts: Vec<&str> = partial_id.split(':').collect();
    match parts.as_slice() {
        ["cosmos", chain_id, value] => Ok(Some(ChainAddress::bech32(*chain_id, *value))),
        [_, _, _] => Err(HubError::InvalidAccountId {
            account_id: partial_id.to_string(),
        }),
        _ => Ok(None),
    }
}

fn chain_id_for_address(view: &impl HubView, address: &str) -> HubResult<String> {
    let prefix = bech32_prefix(address)?;
    let unknown = || HubError::UnknownPrefix {
        prefix: prefix.to_string(),
    };
    let name = view
        .chain_name(ChainAlias::Bech32Prefix(prefix))?
        .ok_or_else(unknown)?;
    Ok(view.chain(&name)?.ok_or_else(unknown)?.chain_id)
}
