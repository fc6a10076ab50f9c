use std::collections::BTreeMap;

use chain_hub::address::{coerce_cosmos_address, make_chain_address, resolve_account_id};
use chain_hub::assets::register_assets as register_asset_list;
use chain_hub::bootstrap::register_chains_and_assets as register_batch;
use chain_hub::connection::connection_between;
use chain_hub::registry;
use chain_hub::route::make_transfer_route;
use chain_hub::{
    AccountIdArg, ChainIdArg, ChainInfo, CosmosAssetInfo, DenomAmount, DenomDetail,
    ForwardOpts, HubConfig, HubError, HubView, IbcConnectionInfo,
};
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdResult, Storage,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    AccountIdResponse, AssetRegistration, AssetResponse, ChainAddressResponse,
    ChainInfoResponse, ChainsAndConnectionResponse, ConfigResponse, ConnectionInfoResponse,
    DenomResponse, ExecuteMsg, InstantiateMsg, ListChainsResponse, QueryMsg,
    RegistrationResponse, TransferRouteResponse,
};
use crate::state::{
    Config, StorageHub, StorageView, ASSET_COUNT, CHAIN_COUNT, CHAIN_ID_NAMES, CHAIN_INFOS,
    CONFIG,
};

const CONTRACT_NAME: &str = "crates.io:chain-hub-registry";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let admin = msg
        .admin
        .map(|a| deps.api.addr_validate(&a))
        .transpose()?
        .unwrap_or_else(|| info.sender.clone());

    let hub = msg.config.unwrap_or_default();
    hub.validate()?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(
        deps.storage,
        &Config {
            admin: admin.clone(),
            hub,
        },
    )?;
    CHAIN_COUNT.save(deps.storage, &0u64)?;
    ASSET_COUNT.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {});
    }

    match msg {
        ExecuteMsg::RegisterChain { name, chain_info } => {
            register_chain(deps.storage, name, chain_info)
        }
        ExecuteMsg::UpdateChain { name, chain_info } => {
            update_chain(deps.storage, name, chain_info)
        }
        ExecuteMsg::RegisterConnection {
            primary_chain_id,
            counterparty_chain_id,
            connection_info,
        } => register_connection(
            deps.storage,
            primary_chain_id,
            counterparty_chain_id,
            connection_info,
        ),
        ExecuteMsg::UpdateConnection {
            primary_chain_id,
            counterparty_chain_id,
            connection_info,
        } => update_connection(
            deps.storage,
            primary_chain_id,
            counterparty_chain_id,
            connection_info,
        ),
        ExecuteMsg::RegisterAsset { denom, detail } => register_asset(deps.storage, denom, detail),
        ExecuteMsg::UpdateAsset { denom, detail } => update_asset(deps.storage, denom, detail),
        ExecuteMsg::RegisterAssets { chain_name, assets } => {
            register_assets(deps.storage, chain_name, assets)
        }
        ExecuteMsg::RegisterChainsAndAssets {
            chain_info,
            asset_info,
        } => register_chains_and_assets(deps.storage, &config.hub, chain_info, asset_info),
        ExecuteMsg::UpdateConfig { config: hub } => update_config(deps.storage, config, hub),
        ExecuteMsg::UpdateAdmin { new_admin } => update_admin(deps, config, new_admin),
    }
}

fn register_chain(
    storage: &mut dyn Storage,
    name: String,
    chain_info: ChainInfo,
) -> Result<Response, ContractError> {
    let chain_id = chain_info.chain_id.clone();
    registry::register_chain(&mut StorageHub::new(storage), &name, chain_info)?;

    Ok(Response::new()
        .add_attribute("method", "register_chain")
        .add_attribute("name", name)
        .add_attribute("chain_id", chain_id))
}

fn update_chain(
    storage: &mut dyn Storage,
    name: String,
    chain_info: ChainInfo,
) -> Result<Response, ContractError> {
    registry::update_chain(&mut StorageHub::new(storage), &name, chain_info)?;

    Ok(Response::new()
        .add_attribute("method", "update_chain")
        .add_attribute("name", name))
}

fn register_connection(
    storage: &mut dyn Storage,
    primary_chain_id: String,
    counterparty_chain_id: String,
    connection_info: IbcConnectionInfo,
) -> Result<Response, ContractError> {
    let channel_id = connection_info.transfer_channel.channel_id.clone();
    registry::register_connection(
        &mut StorageHub::new(storage),
        &primary_chain_id,
        &counterparty_chain_id,
        connection_info,
    )?;

    Ok(Response::new()
        .add_attribute("method", "register_connection")
        .add_attribute("primary", primary_chain_id)
        .add_attribute("counterparty", counterparty_chain_id)
        .add_attribute("channel_id", channel_id))
}

fn update_connection(
    storage: &mut dyn Storage,
    primary_chain_id: String,
    counterparty_chain_id: String,
    connection_info: IbcConnectionInfo,
) -> Result<Response, ContractError> {
    registry::update_connection(
        &mut StorageHub::new(storage),
        &primary_chain_id,
        &counterparty_chain_id,
        connection_info,
    )?;

    Ok(Response::new()
        .add_attribute("method", "update_connection")
        .add_attribute("primary", primary_chain_id)
        .add_attribute("counterparty", counterparty_chain_id))
}

fn register_asset(
    storage: &mut dyn Storage,
    denom: String,
    detail: DenomDetail,
) -> Result<Response, ContractError> {
    let chain_name = detail.chain_name.clone();
    registry::register_asset(&mut StorageHub::new(storage), &denom, detail)?;

    Ok(Response::new()
        .add_attribute("method", "register_asset")
        .add_attribute("denom", denom)
        .add_attribute("chain_name", chain_name))
}

fn update_asset(
    storage: &mut dyn Storage,
    denom: String,
    detail: DenomDetail,
) -> Result<Response, ContractError> {
    let chain_name = detail.chain_name.clone();
    registry::update_asset(&mut StorageHub::new(storage), &denom, detail)?;

    Ok(Response::new()
        .add_attribute("method", "update_asset")
        .add_attribute("denom", denom)
        .add_attribute("chain_name", chain_name))
}

fn register_assets(
    storage: &mut dyn Storage,
    chain_name: String,
    assets: Vec<CosmosAssetInfo>,
) -> Result<Response, ContractError> {
    let count = register_asset_list(&mut StorageHub::new(storage), &chain_name, &assets)?;

    Ok(Response::new()
        .add_attribute("method", "register_assets")
        .add_attribute("chain_name", chain_name)
        .add_attribute("count", count.to_string()))
}

fn register_chains_and_assets(
    storage: &mut dyn Storage,
    hub: &HubConfig,
    chain_info: BTreeMap<String, ChainInfo>,
    asset_info: Vec<AssetRegistration>,
) -> Result<Response, ContractError> {
    let chains: BTreeMap<String, ChainInfo> = chain_info
        .into_iter()
        .map(|(name, info)| {
            let info = hub.with_capabilities(&name, info);
            (name, info)
        })
        .collect();
    let assets: Vec<(String, DenomDetail)> = asset_info
        .into_iter()
        .map(|a| (a.denom, a.detail))
        .collect();

    let failures = register_batch(&mut StorageHub::new(storage), &chains, &assets);

    Ok(Response::new()
        .add_attribute("method", "register_chains_and_assets")
        .add_attribute("chains", chains.len().to_string())
        .add_attribute("assets", assets.len().to_string())
        .add_attribute("failures", failures.len().to_string())
        .set_data(to_json_binary(&RegistrationResponse { failures })?))
}

fn update_config(
    storage: &mut dyn Storage,
    mut config: Config,
    hub: HubConfig,
) -> Result<Response, ContractError> {
    hub.validate()?;
    config.hub = hub;
    CONFIG.save(storage, &config)?;

    Ok(Response::new().add_attribute("method", "update_config"))
}

fn update_admin(
    deps: DepsMut,
    mut config: Config,
    new_admin: String,
) -> Result<Response, ContractError> {
    config.admin = deps.api.addr_validate(&new_admin)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_admin")
        .add_attribute("new_admin", new_admin))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::ChainInfo { name } => to_json_binary(&query_chain_info(deps, name)?),
        QueryMsg::ChainInfoByChainId { chain_id } => {
            to_json_binary(&query_chain_info_by_chain_id(deps, chain_id)?)
        }
        QueryMsg::ListChains { start_after, limit } => {
            to_json_binary(&query_list_chains(deps, start_after, limit)?)
        }
        QueryMsg::ConnectionInfo {
            primary,
            counterparty,
        } => to_json_binary(&query_connection_info(deps, primary, counterparty)?),
        QueryMsg::ChainsAndConnection {
            primary_name,
            counter_name,
        } => to_json_binary(&query_chains_and_connection(
            deps,
            primary_name,
            counter_name,
        )?),
        QueryMsg::Asset { denom, chain_name } => {
            to_json_binary(&query_asset(deps, denom, chain_name)?)
        }
        QueryMsg::Denom { brand } => to_json_binary(&query_denom(deps, brand)?),
        QueryMsg::ChainAddress { address } => {
            to_json_binary(&query_chain_address(deps, address)?)
        }
        QueryMsg::AccountId { partial_id } => {
            to_json_binary(&query_account_id(deps, partial_id)?)
        }
        QueryMsg::TransferRoute {
            destination,
            amount,
            holding_chain,
            forward_opts,
        } => to_json_binary(&query_transfer_route(
            deps,
            destination,
            amount,
            holding_chain,
            forward_opts,
        )?),
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
    }
}

fn load_chain(view: &StorageView, name: &str) -> StdResult<ChainInfo> {
    let chain_info = view.chain(name)?.ok_or_else(|| HubError::ChainNotFound {
        chain_name: name.to_string(),
    })?;
    Ok(chain_info)
}

fn query_chain_info(deps: Deps, name: String) -> StdResult<ChainInfoResponse> {
    let chain_info = load_chain(&StorageView::new(deps.storage), &name)?;
    Ok(ChainInfoResponse { name, chain_info })
}

fn query_chain_info_by_chain_id(deps: Deps, chain_id: String) -> StdResult<ChainInfoResponse> {
    let chain_info = registry::chain_by_chain_id(&StorageView::new(deps.storage), &chain_id)?;
    let name = CHAIN_ID_NAMES.load(deps.storage, &chain_id)?;
    Ok(ChainInfoResponse { name, chain_info })
}

fn query_list_chains(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ListChainsResponse> {
    let limit = limit.unwrap_or(10).min(100);
    let start = start_after.as_ref().map(|s| Bound::exclusive(s.as_str()));

    let chains: StdResult<Vec<ChainInfoResponse>> = CHAIN_INFOS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit as usize)
        .map(|item| item.map(|(name, chain_info)| ChainInfoResponse { name, chain_info }))
        .collect();

    Ok(ListChainsResponse { chains: chains? })
}

fn query_connection_info(
    deps: Deps,
    primary: ChainIdArg,
    counterparty: ChainIdArg,
) -> StdResult<ConnectionInfoResponse> {
    let connection_info =
        connection_between(&StorageView::new(deps.storage), primary, counterparty)?;
    Ok(ConnectionInfoResponse { connection_info })
}

fn query_chains_and_connection(
    deps: Deps,
    primary_name: String,
    counter_name: String,
) -> StdResult<ChainsAndConnectionResponse> {
    let view = StorageView::new(deps.storage);
    let primary = load_chain(&view, &primary_name)?;
    let counterparty = load_chain(&view, &counter_name)?;
    let connection_info = connection_between(&view, &primary, &counterparty)?;
    Ok(ChainsAndConnectionResponse {
        primary,
        counterparty,
        connection_info,
    })
}

fn query_asset(deps: Deps, denom: String, chain_name: String) -> StdResult<AssetResponse> {
    let detail = StorageView::new(deps.storage).asset(&denom, &chain_name)?;
    Ok(AssetResponse { detail })
}

fn query_denom(deps: Deps, brand: String) -> StdResult<DenomResponse> {
    let denom = StorageView::new(deps.storage).denom_for_brand(&brand)?;
    Ok(DenomResponse { denom })
}

fn query_chain_address(deps: Deps, address: String) -> StdResult<ChainAddressResponse> {
    let address = make_chain_address(&StorageView::new(deps.storage), &address)?;
    Ok(ChainAddressResponse { address })
}

fn query_account_id(deps: Deps, partial_id: String) -> StdResult<AccountIdResponse> {
    let account_id = resolve_account_id(&StorageView::new(deps.storage), &partial_id)?;
    Ok(AccountIdResponse { account_id })
}

fn query_transfer_route(
    deps: Deps,
    destination: AccountIdArg,
    amount: DenomAmount,
    holding_chain: String,
    forward_opts: Option<ForwardOpts>,
) -> StdResult<TransferRouteResponse> {
    let config = CONFIG.load(deps.storage)?;
    let view = StorageView::new(deps.storage);
    let destination = coerce_cosmos_address(&view, destination)?;
    let route = make_transfer_route(
        &view,
        &config.hub.forward,
        &destination,
        &amount,
        &holding_chain,
        forward_opts.as_ref(),
    )?;
    let memo = route.memo();
    Ok(TransferRouteResponse { route, memo })
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    let chain_count = CHAIN_COUNT.load(deps.storage)?;
    let asset_count = ASSET_COUNT.load(deps.storage)?;

    Ok(ConfigResponse {
        admin: config.admin,
        config: config.hub,
        chain_count,
        asset_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_hub::denom::ibc_denom;
    use chain_hub::{
        ChannelOrdering, ChannelState, ConnectionCounterparty, ConnectionState,
        RegistrationFailure, TransferChannel,
    };
    use cosmwasm_std::testing::{
        mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage,
    };
    use cosmwasm_std::{from_json, OwnedDeps, StdError, Uint256};

    type TestDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

    fn connection(id: &str, counterparty_id: &str, channel_id: &str, counter_channel: &str) -> IbcConnectionInfo {
        IbcConnectionInfo {
            id: id.to_string(),
            client_id: "07-tendermint-0".to_string(),
            counterparty: ConnectionCounterparty {
                client_id: "07-tendermint-1".to_string(),
                connection_id: counterparty_id.to_string(),
            },
            state: ConnectionState::Open,
            transfer_channel: TransferChannel {
                channel_id: channel_id.to_string(),
                counter_party_channel_id: counter_channel.to_string(),
                port_id: "transfer".to_string(),
                counter_party_port_id: "transfer".to_string(),
                ordering: ChannelOrdering::Unordered,
                state: ChannelState::Open,
                version: "ics20-1".to_string(),
            },
        }
    }

    fn chain(chain_id: &str, prefix: &str, pfm_enabled: bool) -> ChainInfo {
        ChainInfo {
            pfm_enabled,
            ..ChainInfo::new(chain_id, prefix)
        }
    }

    fn detail(chain_name: &str, base_name: &str, base_denom: &str) -> DenomDetail {
        DenomDetail {
            chain_name: chain_name.to_string(),
            base_name: base_name.to_string(),
            base_denom: base_denom.to_string(),
            brand: None,
        }
    }

    fn admin_exec(deps: &mut TestDeps, msg: ExecuteMsg) -> Result<Response, ContractError> {
        execute(deps.as_mut(), mock_env(), mock_info("admin", &[]), msg)
    }

    fn query_as<T: serde::de::DeserializeOwned>(deps: &TestDeps, msg: QueryMsg) -> T {
        from_json(query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
    }

    fn setup() -> TestDeps {
        let mut deps = mock_dependencies();
        let msg = InstantiateMsg {
            admin: None,
            config: None,
        };
        instantiate(deps.as_mut(), mock_env(), mock_info("admin", &[]), msg).unwrap();
        deps
    }

    /// agoric, noble and osmosis with agoric<->noble and noble<->osmosis connections,
    /// plus USDC held on agoric.
    fn setup_topology() -> TestDeps {
        let mut deps = setup();
        for (name, info) in [
            ("agoric", chain("agoric-3", "agoric", false)),
            ("noble", chain("noble-1", "noble", true)),
            ("osmosis", chain("osmosis-1", "osmo", true)),
        ] {
            admin_exec(
                &mut deps,
                ExecuteMsg::RegisterChain {
                    name: name.to_string(),
                    chain_info: info,
                },
            )
            .unwrap();
        }
        for (primary, counterparty, info) in [
            ("agoric-3", "noble-1", connection("connection-72", "connection-40", "channel-62", "channel-21")),
            ("noble-1", "osmosis-1", connection("connection-2", "connection-2241", "channel-1", "channel-750")),
        ] {
            admin_exec(
                &mut deps,
                ExecuteMsg::RegisterConnection {
                    primary_chain_id: primary.to_string(),
                    counterparty_chain_id: counterparty.to_string(),
                    connection_info: info,
                },
            )
            .unwrap();
        }
        admin_exec(
            &mut deps,
            ExecuteMsg::RegisterAsset {
                denom: ibc_denom("channel-62", "uusdc"),
                detail: detail("agoric", "noble", "uusdc"),
            },
        )
        .unwrap();
        deps
    }

    #[test]
    fn test_instantiate() {
        let deps = setup();
        let config: ConfigResponse = query_as(&deps, QueryMsg::Config {});
        assert_eq!(config.admin.as_str(), "admin");
        assert_eq!(config.config, HubConfig::default());
        assert_eq!(config.chain_count, 0);
        assert_eq!(config.asset_count, 0);
    }

    #[test]
    fn test_instantiate_rejects_invalid_config() {
        let mut deps = mock_dependencies();
        let mut hub = HubConfig::default();
        hub.forward.timeout = "soon".to_string();
        let msg = InstantiateMsg {
            admin: None,
            config: Some(hub),
        };
        let err = instantiate(deps.as_mut(), mock_env(), mock_info("admin", &[]), msg).unwrap_err();
        assert!(matches!(err, ContractError::Hub(HubError::InvalidConfig { .. })));
    }

    #[test]
    fn test_only_admin_registers() {
        let mut deps = setup();
        let msg = ExecuteMsg::RegisterChain {
            name: "osmosis".to_string(),
            chain_info: chain("osmosis-1", "osmo", true),
        };
        let err = execute(deps.as_mut(), mock_env(), mock_info("anyone", &[]), msg).unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized {}));
    }

    #[test]
    fn test_register_and_query_chain() {
        let mut deps = setup();
        let res = admin_exec(
            &mut deps,
            ExecuteMsg::RegisterChain {
                name: "osmosis".to_string(),
                chain_info: chain("osmosis-1", "osmo", true),
            },
        )
        .unwrap();
        assert_eq!(res.attributes.len(), 3);

        let by_name: ChainInfoResponse = query_as(
            &deps,
            QueryMsg::ChainInfo {
                name: "osmosis".to_string(),
            },
        );
        assert_eq!(by_name.chain_info.chain_id, "osmosis-1");

        let by_id: ChainInfoResponse = query_as(
            &deps,
            QueryMsg::ChainInfoByChainId {
                chain_id: "osmosis-1".to_string(),
            },
        );
        assert_eq!(by_id.name, "osmosis");

        let address: ChainAddressResponse = query_as(
            &deps,
            QueryMsg::ChainAddress {
                address: "osmo1234".to_string(),
            },
        );
        assert_eq!(address.address.chain_id, "osmosis-1");

        let account: AccountIdResponse = query_as(
            &deps,
            QueryMsg::AccountId {
                partial_id: "osmo1234".to_string(),
            },
        );
        assert_eq!(account.account_id, "cosmos:osmosis-1:osmo1234");

        let config: ConfigResponse = query_as(&deps, QueryMsg::Config {});
        assert_eq!(config.chain_count, 1);
    }

    #[test]
    fn test_unknown_chain_query_fails() {
        let deps = setup();
        let err = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::ChainInfo {
                name: "juno".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, StdError::GenericErr { msg, .. } if msg == "chain not found:juno"));
    }

    #[test]
    fn test_register_chain_rejects_chain_id_change() {
        let mut deps = setup();
        let register = |chain_id: &str| ExecuteMsg::RegisterChain {
            name: "osmosis".to_string(),
            chain_info: chain(chain_id, "osmo", true),
        };
        admin_exec(&mut deps, register("osmosis-1")).unwrap();
        let err = admin_exec(&mut deps, register("osmo-test-5")).unwrap_err();
        assert!(matches!(err, ContractError::Hub(HubError::ChainIdMismatch { .. })));
    }

    #[test]
    fn test_prefix_stays_with_first_chain() {
        let mut deps = setup_topology();
        let err = admin_exec(
            &mut deps,
            ExecuteMsg::RegisterChain {
                name: "osmo-fork".to_string(),
                chain_info: chain("osmo-fork-1", "osmo", true),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Hub(HubError::ChainAliasTaken { .. })));

        admin_exec(
            &mut deps,
            ExecuteMsg::UpdateChain {
                name: "noble".to_string(),
                chain_info: chain("noble-1", "nobl", true),
            },
        )
        .unwrap();
        let address: ChainAddressResponse = query_as(
            &deps,
            QueryMsg::ChainAddress {
                address: "osmo1abc".to_string(),
            },
        );
        assert_eq!(address.address.chain_id, "osmosis-1");
        let address: ChainAddressResponse = query_as(
            &deps,
            QueryMsg::ChainAddress {
                address: "nobl1abc".to_string(),
            },
        );
        assert_eq!(address.address.chain_id, "noble-1");
    }

    #[test]
    fn test_list_chains() {
        let deps = setup_topology();
        let page: ListChainsResponse = query_as(
            &deps,
            QueryMsg::ListChains {
                start_after: None,
                limit: Some(2),
            },
        );
        let names: Vec<_> = page.chains.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["agoric", "noble"]);

        let rest: ListChainsResponse = query_as(
            &deps,
            QueryMsg::ListChains {
                start_after: Some("noble".to_string()),
                limit: None,
            },
        );
        assert_eq!(rest.chains.len(), 1);
        assert_eq!(rest.chains[0].name, "osmosis");
    }

    #[test]
    fn test_connection_is_symmetric() {
        let deps = setup_topology();
        let forward: ConnectionInfoResponse = query_as(
            &deps,
            QueryMsg::ConnectionInfo {
                primary: "agoric-3".into(),
                counterparty: "noble-1".into(),
            },
        );
        let backward: ConnectionInfoResponse = query_as(
            &deps,
            QueryMsg::ConnectionInfo {
                primary: "noble-1".into(),
                counterparty: "agoric-3".into(),
            },
        );
        assert_eq!(forward.connection_info.transfer_channel.channel_id, "channel-62");
        assert_eq!(backward.connection_info.transfer_channel.channel_id, "channel-21");
        assert_eq!(backward.connection_info.id, "connection-40");

        let both: ChainsAndConnectionResponse = query_as(
            &deps,
            QueryMsg::ChainsAndConnection {
                primary_name: "noble".to_string(),
                counter_name: "osmosis".to_string(),
            },
        );
        assert_eq!(both.primary.chain_id, "noble-1");
        assert_eq!(both.connection_info.transfer_channel.channel_id, "channel-1");
    }

    #[test]
    fn test_multi_hop_route() {
        let deps = setup_topology();
        let usdc = ibc_denom("channel-62", "uusdc");
        let res: TransferRouteResponse = query_as(
            &deps,
            QueryMsg::TransferRoute {
                destination: "osmo1234".into(),
                amount: DenomAmount::new(usdc, Uint256::from(100u128)),
                holding_chain: "agoric".to_string(),
                forward_opts: None,
            },
        );
        assert_eq!(res.route.source_channel, "channel-62");
        assert_eq!(res.route.receiver, "pfm");
        assert_eq!(
            res.memo.as_deref(),
            Some(r#"{"forward":{"receiver":"osmo1234","port":"transfer","channel":"channel-1","retries":3,"timeout":"10m"}}"#)
        );
    }

    #[test]
    fn test_route_uses_configured_defaults() {
        let mut deps = setup_topology();
        let mut hub = HubConfig::default();
        hub.forward.retries = 1;
        hub.forward.timeout = "5m".to_string();
        admin_exec(&mut deps, ExecuteMsg::UpdateConfig { config: hub }).unwrap();

        let res: TransferRouteResponse = query_as(
            &deps,
            QueryMsg::TransferRoute {
                destination: "osmo1234".into(),
                amount: DenomAmount::new(ibc_denom("channel-62", "uusdc"), Uint256::from(1u128)),
                holding_chain: "agoric".to_string(),
                forward_opts: None,
            },
        );
        let forward = res.route.forward_info.unwrap().forward;
        assert_eq!((forward.retries, forward.timeout.as_str()), (1, "5m"));
    }

    #[test]
    fn test_route_to_issuer_is_direct() {
        let deps = setup_topology();
        let res: TransferRouteResponse = query_as(
            &deps,
            QueryMsg::TransferRoute {
                destination: "noble1234".into(),
                amount: DenomAmount::new(ibc_denom("channel-62", "uusdc"), Uint256::from(100u128)),
                holding_chain: "agoric".to_string(),
                forward_opts: None,
            },
        );
        assert_eq!(res.route.receiver, "noble1234");
        assert_eq!(res.memo, None);
    }

    #[test]
    fn test_register_asset_requires_chains() {
        let mut deps = setup();
        let err = admin_exec(
            &mut deps,
            ExecuteMsg::RegisterAsset {
                denom: "uist".to_string(),
                detail: detail("agoric", "agoric", "uist"),
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "must register chain agoric first"
        );
    }

    #[test]
    fn test_brand_lookup() {
        let mut deps = setup_topology();
        admin_exec(
            &mut deps,
            ExecuteMsg::RegisterAsset {
                denom: "ubld".to_string(),
                detail: DenomDetail {
                    brand: Some("BLD".to_string()),
                    ..detail("agoric", "agoric", "ubld")
                },
            },
        )
        .unwrap();

        let denom: DenomResponse = query_as(
            &deps,
            QueryMsg::Denom {
                brand: "BLD".to_string(),
            },
        );
        assert_eq!(denom.denom.as_deref(), Some("ubld"));
        let missing: DenomResponse = query_as(
            &deps,
            QueryMsg::Denom {
                brand: "IST".to_string(),
            },
        );
        assert_eq!(missing.denom, None);

        let asset: AssetResponse = query_as(
            &deps,
            QueryMsg::Asset {
                denom: "ubld".to_string(),
                chain_name: "noble".to_string(),
            },
        );
        assert_eq!(asset.detail, None);
    }

    #[test]
    fn test_brand_already_taken() {
        let mut deps = setup_topology();
        let branded = |denom: &str| ExecuteMsg::RegisterAsset {
            denom: denom.to_string(),
            detail: DenomDetail {
                brand: Some("BLD".to_string()),
                ..detail("agoric", "agoric", denom)
            },
        };
        admin_exec(&mut deps, branded("ubld")).unwrap();
        let err = admin_exec(&mut deps, branded("uist")).unwrap_err();
        assert!(matches!(err, ContractError::Hub(HubError::BrandTaken { .. })));

        let denom: DenomResponse = query_as(
            &deps,
            QueryMsg::Denom {
                brand: "BLD".to_string(),
            },
        );
        assert_eq!(denom.denom.as_deref(), Some("ubld"));
    }

    #[test]
    fn test_batch_registration_reports_failures() {
        let mut deps = setup();
        let mut agoric = chain("agoric-3", "agoric", true);
        agoric.connections = Some(BTreeMap::from([(
            "noble-1".to_string(),
            connection("connection-72", "connection-40", "channel-62", "channel-21"),
        )]));
        let chains = BTreeMap::from([
            ("agoric".to_string(), agoric),
            ("noble".to_string(), chain("noble-1", "noble", false)),
        ]);
        let assets = vec![
            AssetRegistration {
                denom: "ubld".to_string(),
                detail: detail("agoric", "agoric", "ubld"),
            },
            AssetRegistration {
                denom: "ujuno".to_string(),
                detail: detail("juno", "juno", "ujuno"),
            },
        ];

        let res = admin_exec(
            &mut deps,
            ExecuteMsg::RegisterChainsAndAssets {
                chain_info: chains,
                asset_info: assets,
            },
        )
        .unwrap();
        let data: RegistrationResponse = from_json(res.data.unwrap()).unwrap();
        assert_eq!(data.failures.len(), 1);
        assert!(matches!(
            &data.failures[0],
            RegistrationFailure::Asset { denom, .. } if denom == "ujuno"
        ));

        // capability table overrides the submitted flags
        let agoric: ChainInfoResponse = query_as(
            &deps,
            QueryMsg::ChainInfo {
                name: "agoric".to_string(),
            },
        );
        assert!(!agoric.chain_info.pfm_enabled);
        let noble: ChainInfoResponse = query_as(
            &deps,
            QueryMsg::ChainInfo {
                name: "noble".to_string(),
            },
        );
        assert!(noble.chain_info.pfm_enabled);

        let conn: ConnectionInfoResponse = query_as(
            &deps,
            QueryMsg::ConnectionInfo {
                primary: "noble-1".into(),
                counterparty: "agoric-3".into(),
            },
        );
        assert_eq!(conn.connection_info.transfer_channel.channel_id, "channel-21");
    }

    #[test]
    fn test_update_admin() {
        let mut deps = setup();
        admin_exec(
            &mut deps,
            ExecuteMsg::UpdateAdmin {
                new_admin: "operator".to_string(),
            },
        )
        .unwrap();

        let err = admin_exec(
            &mut deps,
            ExecuteMsg::UpdateConfig {
                config: HubConfig::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized {}));
    }
}
