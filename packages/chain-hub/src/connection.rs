use crate::error::{HubError, HubResult};
use crate::store::HubView;
use crate::types::{ChainIdArg, ConnectionCounterparty, IbcConnectionInfo, TransferChannel};

/// Separates the two chain ids in a connection key.
const CHAIN_ID_SEPARATOR: char = '_';

/// Double every separator in `chain_id` so an encoded pair can be split again.
pub fn encode_chain_id(chain_id: &str) -> String {
    chain_id.replace(CHAIN_ID_SEPARATOR, "__")
}

/// Order-independent key for the connection between two chains.
pub fn connection_key(chain_id_a: &str, chain_id_b: &str) -> String {
    let mut ids = [encode_chain_id(chain_id_a), encode_chain_id(chain_id_b)];
    ids.sort();
    format!("{}{CHAIN_ID_SEPARATOR}{}", ids[0], ids[1])
}

/// The same connection seen from the counterparty's side.
pub fn reverse_connection(info: &IbcConnectionInfo) -> IbcConnectionInfo {
    let channel = &info.transfer_channel;
    IbcConnectionInfo {
        id: info.counterparty.connection_id.clone(),
        client_id: info.counterparty.client_id.clone(),
        counterparty: ConnectionCounterparty {
            client_id: info.client_id.clone(),
            connection_id: info.id.clone(),
        },
        state: info.state,
        transfer_channel: TransferChannel {
            channel_id: channel.counter_party_channel_id.clone(),
            counter_party_channel_id: channel.channel_id.clone(),
            port_id: channel.counter_party_port_id.clone(),
            counter_party_port_id: channel.port_id.clone(),
            ordering: channel.ordering,
            state: channel.state,
            version: channel.version.clone(),
        },
    }
}

/// Key and stored form of a connection given from `primary`'s perspective.
/// The stored form is always oriented from the lesser chain id.
pub fn normalize_connection(
    primary: &str,
    counterparty: &str,
    directed: IbcConnectionInfo,
) -> (String, IbcConnectionInfo) {
    let key = connection_key(primary, counterparty);
    if primary < counterparty {
        (key, directed)
    } else {
        (key, reverse_connection(&directed))
    }
}

/// View a stored connection from `primary`'s perspective.
pub fn denormalize_connection(
    primary: &str,
    counterparty: &str,
    normalized: IbcConnectionInfo,
) -> IbcConnectionInfo {
    if primary < counterparty {
        normalized
    } else {
        reverse_connection(&normalized)
    }
}

/// Connection from `primary` to `counterparty`, in either stored orientation.
pub fn connection_between(
    view: &impl HubView,
    primary: impl Into<ChainIdArg>,
    counterparty: impl Into<ChainIdArg>,
) -> HubResult<IbcConnectionInfo> {
    let primary = primary.into();
    let counterparty = counterparty.into();
    let (primary_id, counter_id) = (primary.chain_id(), counterparty.chain_id());

    let stored = view
        .connection(&connection_key(primary_id, counter_id))?
        .ok_or_else(|| HubError::ConnectionNotFound {
            primary: primary_id.to_string(),
            counterparty: counter_id.to_string(),
        })?;
    Ok(denormalize_connection(primary_id, counter_id, stored))
}
