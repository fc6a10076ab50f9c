use crate::config::ForwardDefaults;
use crate::connection::connection_between;
use crate::error::{HubError, HubResult};
use crate::store::HubView;
use crate::types::{
    ChainAddress, DenomAmount, Forward, ForwardInfo, ForwardOpts, Token, TransferRoute,
    PFM_RECEIVER,
};

/// Determine the IBC transfer route for `amount`, held on `holding_chain`, to
/// `destination`.
///
/// A transfer is direct when the asset is native to the holding chain or is going
/// back to its issuer. Anything else is forwarded through the issuing chain, which
/// must run the packet-forward middleware. Routes with more than one intermediary
/// are not produced.
pub fn make_transfer_route(
    view: &impl HubView,
    defaults: &ForwardDefaults,
    destination: &ChainAddress,
    amount: &DenomAmount,
    holding_chain: &str,
    forward_opts: Option<&ForwardOpts>,
) -> HubResult<TransferRoute> {
    let holding = view
        .chain(holding_chain)?
        .ok_or_else(|| HubError::HoldingChainUnknown {
            chain_name: holding_chain.to_string(),
        })?;

    let detail = view
        .asset(&amount.denom, holding_chain)?
        .ok_or_else(|| HubError::AssetUnregistered {
            denom: amount.denom.clone(),
            chain_name: holding_chain.to_string(),
        })?;

    let issuer = view
        .chain(&detail.base_name)?
        .ok_or_else(|| HubError::IssuingChainUnknown {
            chain_name: detail.base_name.clone(),
        })?;

    let token = Token {
        denom: amount.denom.clone(),
        amount: amount.value.to_string(),
    };

    let is_native = detail.base_name == holding_chain;
    let to_issuer = destination.chain_id == issuer.chain_id;
    if is_native || to_issuer {
        let channel = connection_between(view, &holding, destination)?.transfer_channel;
        return Ok(TransferRoute {
            source_port: channel.port_id,
            source_channel: channel.channel_id,
            receiver: destination.value.clone(),
            token,
            forward_info: None,
        });
    }

    if !issuer.pfm_enabled {
        return Err(HubError::ForwardingNotSupported {
            chain_name: detail.base_name,
        });
    }

    let first_leg = connection_between(view, &holding, &issuer)?.transfer_channel;
    let second_leg = connection_between(view, &issuer, destination)?.transfer_channel;

    let opts = forward_opts.cloned().unwrap_or_default();
    let forward = Forward {
        receiver: destination.value.clone(),
        port: second_leg.port_id,
        channel: second_leg.channel_id,
        retries: opts.retries.unwrap_or(defaults.retries),
        timeout: opts.timeout.unwrap_or_else(|| defaults.timeout.clone()),
    };
    let receiver = opts
        .intermediate_recipient
        .map(|recipient| recipient.value)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| PFM_RECEIVER.to_string());

    Ok(TransferRoute {
        source_port: first_leg.port_id,
        source_channel: first_leg.channel_id,
        receiver,
        token,
        forward_info: Some(ForwardInfo { forward }),
    })
}
