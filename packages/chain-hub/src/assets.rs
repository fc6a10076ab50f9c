use std::collections::BTreeMap;

use crate::denom::ibc_denom;
use crate::error::{HubError, HubResult};
use crate::registry::register_asset;
use crate::store::HubStore;
use crate::types::{ChainInfo, CosmosAssetInfo, DenomDetail};

/// Build the `(denom, detail)` registration for `base_denom`, issued by `base_name`
/// and held on `chain_name`.
///
/// Without a holding chain the asset is native and keeps its base denom. Otherwise
/// the denom is the `ibc/` hash over the holding chain's transfer channel to the
/// issuer, taken from `info_of`.
pub fn asset_on(
    base_denom: &str,
    base_name: &str,
    chain_name: Option<&str>,
    info_of: Option<&BTreeMap<String, ChainInfo>>,
    brand: Option<&str>,
) -> HubResult<(String, DenomDetail)> {
    let brand = brand.map(str::to_string);
    let Some(chain_name) = chain_name else {
        let detail = DenomDetail {
            chain_name: base_name.to_string(),
            base_name: base_name.to_string(),
            base_denom: base_denom.to_string(),
            brand,
        };
        return Ok((base_denom.to_string(), detail));
    };

    let info_of = info_of.ok_or_else(|| HubError::ChainInfoMissing {
        chain_name: chain_name.to_string(),
    })?;
    let missing = |name: &str| HubError::ChainInfoMissing {
        chain_name: name.to_string(),
    };
    let holding = info_of.get(chain_name).ok_or_else(|| missing(chain_name))?;
    let issuer = info_of.get(base_name).ok_or_else(|| missing(base_name))?;

    let connections = holding
        .connections
        .as_ref()
        .ok_or_else(|| HubError::MissingConnections {
            chain_name: chain_name.to_string(),
        })?;
    let to_issuer = connections
        .get(&issuer.chain_id)
        .ok_or_else(|| HubError::ConnectionNotFound {
            primary: holding.chain_id.clone(),
            counterparty: issuer.chain_id.clone(),
        })?;

    let denom = ibc_denom(&to_issuer.transfer_channel.channel_id, base_denom);
    let detail = DenomDetail {
        chain_name: chain_name.to_string(),
        base_name: base_name.to_string(),
        base_denom: base_denom.to_string(),
        brand,
    };
    Ok((denom, detail))
}

/// Register the entries of a chain-registry asset list held on `chain_name`.
///
/// An entry without traces is native. An entry with one trace is issued by the
/// trace's counterparty. Stops at the first failure.
pub fn register_assets(
    store: &mut impl HubStore,
    chain_name: &str,
    assets: &[CosmosAssetInfo],
) -> HubResult<usize> {
    for asset in assets {
        let detail = match asset.traces.as_deref() {
            None => DenomDetail {
                chain_name: chain_name.to_string(),
                base_name: chain_name.to_string(),
                base_denom: asset.base.clone(),
                brand: None,
            },
            Some([trace]) => DenomDetail {
                chain_name: chain_name.to_string(),
                base_name: trace.counterparty.chain_name.clone(),
                base_denom: trace.counterparty.base_denom.clone(),
                brand: None,
            },
            Some(traces) => {
                return Err(HubError::UnexpectedTraces {
                    denom: asset.base.clone(),
                    count: traces.len(),
                })
            }
        };
        register_asset(store, &asset.base, detail)?;
    }
    Ok(assets.len())
}
