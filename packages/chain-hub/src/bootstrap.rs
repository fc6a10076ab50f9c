use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::connection::connection_key;
use crate::error::HubError;
use crate::registry::{register_asset, register_chain, register_connection};
use crate::store::HubStore;
use crate::types::{ChainInfo, DenomDetail};

/// What a batch registration could not register, and why.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationFailure {
    Chain {
        name: String,
        reason: String,
    },
    Connection {
        primary: String,
        counterparty: String,
        reason: String,
    },
    Asset {
        denom: String,
        chain_name: String,
        reason: String,
    },
}

/// Register chains, then every connection named in their `connections` maps, then
/// assets.
///
/// Each connection is registered once per chain pair, and only from chains that
/// registered. A failure is logged and collected and the remaining entries are
/// still registered.
pub fn register_chains_and_assets(
    store: &mut impl HubStore,
    chains: &BTreeMap<String, ChainInfo>,
    assets: &[(String, DenomDetail)],
) -> Vec<RegistrationFailure> {
    let mut failures = Vec::new();
    let mut registered = BTreeSet::new();

    for (name, info) in chains {
        if let Err(err) = register_chain(store, name, info.clone()) {
            warn!(chain_name = name.as_str(), %err, "skipping chain");
            failures.push(RegistrationFailure::Chain {
                name: name.clone(),
                reason: err.to_string(),
            });
            continue;
        }
        registered.insert(name);
    }

    let mut seen = BTreeSet::new();
    for (_, info) in chains.iter().filter(|(name, _)| registered.contains(name)) {
        for (counterparty, connection) in info.connections.iter().flatten() {
            if !seen.insert(connection_key(&info.chain_id, counterparty)) {
                continue;
            }
            if let Err(err) =
                register_connection(store, &info.chain_id, counterparty, connection.clone())
            {
                warn!(primary = info.chain_id.as_str(), %counterparty, %err, "skipping connection");
                failures.push(connection_failure(&info.chain_id, counterparty, err));
            }
        }
    }

    for (denom, detail) in assets {
        if let Err(err) = register_asset(store, denom, detail.clone()) {
            warn!(%denom, chain_name = detail.chain_name.as_str(), %err, "skipping asset");
            failures.push(RegistrationFailure::Asset {
                denom: denom.clone(),
                chain_name: detail.chain_name.clone(),
                reason: err.to_string(),
            });
        }
    }

    info!(
        chains = chains.len(),
        connections = seen.len(),
        assets = assets.len(),
        failures = failures.len(),
        "registered chains and assets"
    );
    failures
}

fn connection_failure(primary: &str, counterparty: &str, err: HubError) -> RegistrationFailure {
    RegistrationFailure::Connection {
        primary: primary.to_string(),
        counterparty: counterparty.to_string(),
        reason: err.to_string(),
    }
}
