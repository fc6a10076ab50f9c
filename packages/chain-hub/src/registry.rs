use crate::connection::{connection_key, normalize_connection};
use crate::error::{HubError, HubResult};
use crate::store::{ChainAlias, HubStore, HubView};
use crate::types::{ChainInfo, DenomDetail, IbcConnectionInfo};

/// Chain names are bare keys; `:` is reserved for CAIP ids.
pub fn ensure_bare_name(chain_name: &str) -> HubResult<()> {
    if chain_name.is_empty() || chain_name.contains(':') {
        return Err(HubError::InvalidChainName {
            chain_name: chain_name.to_string(),
        });
    }
    Ok(())
}

/// Register a chain under `name`, merging into any existing record.
///
/// The chain id under a name never changes. Connections are unioned with what is
/// already known; every other field takes the new value. The chain id and bech32
/// prefix must not already belong to another chain.
pub fn register_chain(store: &mut impl HubStore, name: &str, info: ChainInfo) -> HubResult<()> {
    ensure_bare_name(name)?;
    let existing = store.chain(name)?;
    if let Some(existing) = &existing {
        ensure_same_chain_id(name, existing, &info)?;
    }
    ensure_aliases_free(&*store, name, &info)?;

    let merged = match existing {
        Some(existing) => {
            release_old_prefix(store, name, &existing, &info)?;
            existing.merged_with(info)
        }
        None => info,
    };
    save_indexed(store, name, &merged)
}

/// Replace the record of an already registered chain wholesale.
pub fn update_chain(store: &mut impl HubStore, name: &str, info: ChainInfo) -> HubResult<()> {
    let existing = store
        .chain(name)?
        .ok_or_else(|| HubError::ChainNotRegistered {
            chain_name: name.to_string(),
        })?;
    ensure_same_chain_id(name, &existing, &info)?;
    ensure_aliases_free(&*store, name, &info)?;
    release_old_prefix(store, name, &existing, &info)?;
    save_indexed(store, name, &info)
}

fn ensure_same_chain_id(name: &str, existing: &ChainInfo, info: &ChainInfo) -> HubResult<()> {
    if existing.chain_id != info.chain_id {
        return Err(HubError::ChainIdMismatch {
            chain_name: name.to_string(),
            registered: existing.chain_id.clone(),
            provided: info.chain_id.clone(),
        });
    }
    Ok(())
}

fn ensure_aliases_free(view: &impl HubView, name: &str, info: &ChainInfo) -> HubResult<()> {
    ensure_alias_free(view, ChainAlias::ChainId(&info.chain_id), name)?;
    if !info.bech32_prefix.is_empty() {
        ensure_alias_free(view, ChainAlias::Bech32Prefix(&info.bech32_prefix), name)?;
    }
    Ok(())
}

fn ensure_alias_free(view: &impl HubView, alias: ChainAlias<'_>, name: &str) -> HubResult<()> {
    match view.chain_name(alias)? {
        Some(registered) if registered != name => Err(HubError::ChainAliasTaken {
            alias: alias.to_string(),
            chain_name: name.to_string(),
            registered,
        }),
        _ => Ok(()),
    }
}

/// Drop the prefix `existing` was indexed under when `info` moves it, as long as the
/// index still points at `name`.
fn release_old_prefix(
    store: &mut impl HubStore,
    name: &str,
    existing: &ChainInfo,
    info: &ChainInfo,
) -> HubResult<()> {
    if existing.bech32_prefix.is_empty() || existing.bech32_prefix == info.bech32_prefix {
        return Ok(());
    }
    let alias = ChainAlias::Bech32Prefix(&existing.bech32_prefix);
    if store.chain_name(alias)?.as_deref() == Some(name) {
        store.remove_chain_alias(alias)?;
    }
    Ok(())
}

fn save_indexed(store: &mut impl HubStore, name: &str, info: &ChainInfo) -> HubResult<()> {
    store.save_chain(name, info)?;
    store.save_chain_alias(ChainAlias::ChainId(&info.chain_id), name)?;
    if !info.bech32_prefix.is_empty() {
        store.save_chain_alias(ChainAlias::Bech32Prefix(&info.bech32_prefix), name)?;
    }
    Ok(())
}

/// Registered chain info by its protocol-level chain id.
pub fn chain_by_chain_id(view: &impl HubView, chain_id: &str) -> HubResult<ChainInfo> {
    let not_found = || HubError::ChainNotFound {
        chain_name: chain_id.to_string(),
    };
    let name = view
        .chain_name(ChainAlias::ChainId(chain_id))?
        .ok_or_else(not_found)?;
    view.chain(&name)?.ok_or_else(not_found)
}

/// Store the connection between two chains, given from `primary`'s side.
pub fn register_connection(
    store: &mut impl HubStore,
    primary: &str,
    counterparty: &str,
    info: IbcConnectionInfo,
) -> HubResult<()> {
    let (key, normalized) = normalize_connection(primary, counterparty, info);
    store.save_connection(&key, &normalized)
}

pub fn update_connection(
    store: &mut impl HubStore,
    primary: &str,
    counterparty: &str,
    info: IbcConnectionInfo,
) -> HubResult<()> {
    if store.connection(&connection_key(primary, counterparty))?.is_none() {
        return Err(HubError::ConnectionNotRegistered {
            primary: primary.to_string(),
            counterparty: counterparty.to_string(),
        });
    }
    register_connection(store, primary, counterparty, info)
}

/// Register `denom` as held on `detail.chain_name`.
///
/// Both the holding and issuing chain must already be registered. A later
/// registration of the same `(denom, chain)` replaces the earlier one. A brand maps
/// to one denom; a brand already mapped to another denom is rejected.
pub fn register_asset(store: &mut impl HubStore, denom: &str, detail: DenomDetail) -> HubResult<()> {
    for chain_name in [&detail.chain_name, &detail.base_name] {
        if store.chain(chain_name)?.is_none() {
            return Err(HubError::ChainNotRegistered {
                chain_name: chain_name.clone(),
            });
        }
    }

    if let Some(brand) = &detail.brand {
        if let Some(registered) = store.denom_for_brand(brand)?.filter(|d| d != denom) {
            return Err(HubError::BrandTaken {
                brand: brand.clone(),
                denom: denom.to_string(),
                registered,
            });
        }
    }

    if let Some(previous) = store.asset(denom, &detail.chain_name)? {
        if let Some(brand) = previous.brand.filter(|b| Some(b) != detail.brand.as_ref()) {
            if store.denom_for_brand(&brand)?.as_deref() == Some(denom) {
                store.remove_brand(&brand)?;
            }
        }
    }

    store.save_asset(denom, &detail)?;
    if let Some(brand) = &detail.brand {
        store.save_brand(brand, denom)?;
    }
    Ok(())
}

pub fn update_asset(store: &mut impl HubStore, denom: &str, detail: DenomDetail) -> HubResult<()> {
    if store.asset(denom, &detail.chain_name)?.is_none() {
        return Err(HubError::AssetNotRegistered {
            denom: denom.to_string(),
            chain_name: detail.chain_name,
        });
    }
    register_asset(store, denom, detail)
}
