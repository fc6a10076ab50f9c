use std::collections::BTreeMap;

use chain_hub::{
    AccountIdArg, ChainAddress, ChainIdArg, ChainInfo, CosmosAssetInfo, DenomAmount,
    DenomDetail, ForwardOpts, HubConfig, IbcConnectionInfo, RegistrationFailure,
    TransferRoute,
};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: Option<String>,
    pub config: Option<HubConfig>,
}

#[cw_serde]
pub enum ExecuteMsg {
    RegisterChain {
        name: String,
        chain_info: ChainInfo,
    },
    UpdateChain {
        name: String,
        chain_info: ChainInfo,
    },
    RegisterConnection {
        primary_chain_id: String,
        counterparty_chain_id: String,
        connection_info: IbcConnectionInfo,
    },
    UpdateConnection {
        primary_chain_id: String,
        counterparty_chain_id: String,
        connection_info: IbcConnectionInfo,
    },
    RegisterAsset {
        denom: String,
        detail: DenomDetail,
    },
    UpdateAsset {
        denom: String,
        detail: DenomDetail,
    },
    /// Register a chain-registry asset list held on `chain_name`.
    RegisterAssets {
        chain_name: String,
        assets: Vec<CosmosAssetInfo>,
    },
    /// Best-effort batch registration. Failures are returned in the response data.
    RegisterChainsAndAssets {
        chain_info: BTreeMap<String, ChainInfo>,
        asset_info: Vec<AssetRegistration>,
    },
    UpdateConfig {
        config: HubConfig,
    },
    UpdateAdmin {
        new_admin: String,
    },
}

#[cw_serde]
pub struct AssetRegistration {
    pub denom: String,
    pub detail: DenomDetail,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ChainInfoResponse)]
    ChainInfo { name: String },

    #[returns(ChainInfoResponse)]
    ChainInfoByChainId { chain_id: String },

    #[returns(ListChainsResponse)]
    ListChains {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(ConnectionInfoResponse)]
    ConnectionInfo {
        primary: ChainIdArg,
        counterparty: ChainIdArg,
    },

    #[returns(ChainsAndConnectionResponse)]
    ChainsAndConnection {
        primary_name: String,
        counter_name: String,
    },

    #[returns(AssetResponse)]
    Asset { denom: String, chain_name: String },

    #[returns(DenomResponse)]
    Denom { brand: String },

    #[returns(ChainAddressResponse)]
    ChainAddress { address: String },

    #[returns(AccountIdResponse)]
    AccountId { partial_id: String },

    #[returns(TransferRouteResponse)]
    TransferRoute {
        destination: AccountIdArg,
        amount: DenomAmount,
        holding_chain: String,
        forward_opts: Option<ForwardOpts>,
    },

    #[returns(ConfigResponse)]
    Config {},
}

#[cw_serde]
pub struct ChainInfoResponse {
    pub name: String,
    pub chain_info: ChainInfo,
}

#[cw_serde]
pub struct ListChainsResponse {
    pub chains: Vec<ChainInfoResponse>,
}

#[cw_serde]
pub struct ConnectionInfoResponse {
    pub connection_info: IbcConnectionInfo,
}

#[cw_serde]
pub struct ChainsAndConnectionResponse {
    pub primary: ChainInfo,
    pub counterparty: ChainInfo,
    pub connection_info: IbcConnectionInfo,
}

#[cw_serde]
pub struct AssetResponse {
    pub detail: Option<DenomDetail>,
}

#[cw_serde]
pub struct DenomResponse {
    pub denom: Option<String>,
}

#[cw_serde]
pub struct ChainAddressResponse {
    pub address: ChainAddress,
}

#[cw_serde]
pub struct AccountIdResponse {
    pub account_id: String,
}

#[cw_serde]
pub struct TransferRouteResponse {
    pub route: TransferRoute,
    /// Packet-forward memo, present for multi-hop routes
    pub memo: Option<String>,
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub config: HubConfig,
    pub chain_count: u64,
    pub asset_count: u64,
}

#[cw_serde]
pub struct RegistrationResponse {
    pub failures: Vec<RegistrationFailure>,
}
