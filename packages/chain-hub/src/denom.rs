use sha2::{Digest, Sha256};

use crate::error::{HubError, HubResult};
use crate::types::TRANSFER_PORT;

/// Inputs to [`denom_hash`]. `path` defaults to `port_id/channel_id`.
#[derive(Clone, Debug, Default)]
pub struct DenomHashArgs<'a> {
    pub port_id: Option<&'a str>,
    pub channel_id: Option<&'a str>,
    pub path: Option<&'a str>,
    pub denom: &'a str,
}

/// Upper-case hex SHA-256 of `path/denom`, the content-addressed name a denom takes
/// once it has crossed `path`.
pub fn denom_hash(args: DenomHashArgs<'_>) -> String {
    let path = match args.path {
        Some(path) => path.to_string(),
        None => format!(
            "{}/{}",
            args.port_id.unwrap_or(TRANSFER_PORT),
            args.channel_id.unwrap_or_default()
        ),
    };
    hash_trace(&path, args.denom)
}

/// Hash a full trace such as `transfer/channel-0/uatom`.
///
/// The base denom is everything after the last `/`.
pub fn denom_hash_from_path(full_path: &str) -> HubResult<String> {
    let invalid = || HubError::InvalidFormat {
        path: full_path.to_string(),
    };
    let (path, denom) = full_path.rsplit_once('/').ok_or_else(invalid)?;
    if path.is_empty() || denom.is_empty() {
        return Err(invalid());
    }
    Ok(hash_trace(path, denom))
}

/// `ibc/<hash>` for `denom` received over `channel_id` on the transfer port.
pub fn ibc_denom(channel_id: &str, denom: &str) -> String {
    let hash = denom_hash(DenomHashArgs {
        channel_id: Some(channel_id),
        denom,
        ..Default::default()
    });
    format!("ibc/{hash}")
}

fn hash_trace(path: &str, denom: &str) -> String {
    let digest = Sha256::digest(format!("{path}/{denom}").as_bytes());
    hex::encode_upper(digest)
}
