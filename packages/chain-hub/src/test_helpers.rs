use std::collections::BTreeMap;

use crate::connection::reverse_connection;
use crate::denom::ibc_denom;
use crate::hub::MemoryStore;
use crate::registry::{register_asset, register_chain, register_connection};
use crate::types::{
    ChainInfo, ChannelOrdering, ChannelState, ConnectionCounterparty, ConnectionState,
    DenomDetail, IbcConnectionInfo, StakingToken, TransferChannel,
};

pub const AGORIC: &str = "agoric-3";
pub const NOBLE: &str = "noble-1";
pub const OSMOSIS: &str = "osmosis-1";
pub const COSMOSHUB: &str = "cosmoshub-4";

/// Open transfer connection as seen from the side owning `id` and `channel_id`.
pub fn connection(
    id: &str,
    counterparty_id: &str,
    channel_id: &str,
    counterparty_channel_id: &str,
) -> IbcConnectionInfo {
    IbcConnectionInfo {
        id: id.to_string(),
        client_id: id.replace("connection", "07-tendermint"),
        counterparty: ConnectionCounterparty {
            client_id: counterparty_id.replace("connection", "07-tendermint"),
            connection_id: counterparty_id.to_string(),
        },
        state: ConnectionState::Open,
        transfer_channel: TransferChannel {
            channel_id: channel_id.to_string(),
            counter_party_channel_id: counterparty_channel_id.to_string(),
            port_id: "transfer".to_string(),
            counter_party_port_id: "transfer".to_string(),
            ordering: ChannelOrdering::Unordered,
            state: ChannelState::Open,
            version: "ics20-1".to_string(),
        },
    }
}

pub fn agoric_noble() -> IbcConnectionInfo {
    connection("connection-72", "connection-40", "channel-62", "channel-21")
}

pub fn noble_osmosis() -> IbcConnectionInfo {
    connection("connection-2", "connection-2241", "channel-1", "channel-750")
}

pub fn agoric_osmosis() -> IbcConnectionInfo {
    connection("connection-1", "connection-2109", "channel-1", "channel-320")
}

pub fn agoric_cosmoshub() -> IbcConnectionInfo {
    connection("connection-8", "connection-649", "channel-5", "channel-405")
}

fn chain(chain_id: &str, prefix: &str, pfm_enabled: bool, staking: Option<&str>) -> ChainInfo {
    ChainInfo {
        pfm_enabled,
        staking_tokens: staking.map(|denom| {
            vec![StakingToken {
                denom: denom.to_string(),
            }]
        }),
        ..ChainInfo::new(chain_id, prefix)
    }
}

/// Chain infos keyed by name, with each chain's `connections` filled in.
pub fn known_chains() -> BTreeMap<String, ChainInfo> {
    let mut agoric = chain(AGORIC, "agoric", false, Some("ubld"));
    agoric.connections = Some(BTreeMap::from([
        (NOBLE.to_string(), agoric_noble()),
        (OSMOSIS.to_string(), agoric_osmosis()),
        (COSMOSHUB.to_string(), agoric_cosmoshub()),
    ]));

    let mut noble = chain(NOBLE, "noble", true, None);
    noble.connections = Some(BTreeMap::from([
        (
            AGORIC.to_string(),
            reverse_connection(&agoric_noble()),
        ),
        (OSMOSIS.to_string(), noble_osmosis()),
    ]));

    let osmosis = chain(OSMOSIS, "osmo", true, Some("uosmo"));
    let cosmoshub = chain(COSMOSHUB, "cosmos", true, Some("uatom"));

    BTreeMap::from([
        ("agoric".to_string(), agoric),
        ("noble".to_string(), noble),
        ("osmosis".to_string(), osmosis),
        ("cosmoshub".to_string(), cosmoshub),
    ])
}

pub fn detail(chain_name: &str, base_name: &str, base_denom: &str) -> DenomDetail {
    DenomDetail {
        chain_name: chain_name.to_string(),
        base_name: base_name.to_string(),
        base_denom: base_denom.to_string(),
        brand: None,
    }
}

pub fn usdc_on_agoric() -> String {
    ibc_denom("channel-62", "uusdc")
}

pub fn atom_on_agoric() -> String {
    ibc_denom("channel-5", "uatom")
}

/// Store with the four fixture chains, their connections and a handful of assets.
pub fn populated_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    for (name, info) in known_chains() {
        register_chain(&mut store, &name, info).unwrap();
    }
    register_connection(&mut store, AGORIC, NOBLE, agoric_noble()).unwrap();
    register_connection(&mut store, NOBLE, OSMOSIS, noble_osmosis()).unwrap();
    register_connection(&mut store, AGORIC, OSMOSIS, agoric_osmosis()).unwrap();
    register_connection(&mut store, AGORIC, COSMOSHUB, agoric_cosmoshub()).unwrap();

    let assets = [
        ("uist".to_string(), detail("agoric", "agoric", "uist")),
        ("ubld".to_string(), detail("agoric", "agoric", "ubld")),
        (usdc_on_agoric(), detail("agoric", "noble", "uusdc")),
        (atom_on_agoric(), detail("agoric", "cosmoshub", "uatom")),
        ("uusdc".to_string(), detail("noble", "noble", "uusdc")),
        ("uatom".to_string(), detail("cosmoshub", "cosmoshub", "uatom")),
    ];
    for (denom, detail) in assets {
        register_asset(&mut store, &denom, detail).unwrap();
    }
    store
}
