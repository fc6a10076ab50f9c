use chain_hub::{
    ChainAlias, ChainInfo, DenomDetail, HubConfig, HubResult, HubStore, HubView,
    IbcConnectionInfo,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub hub: HubConfig,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const CHAIN_INFOS: Map<&str, ChainInfo> = Map::new("chain_infos");
pub const CHAIN_ID_NAMES: Map<&str, String> = Map::new("chain_id_names");
pub const PREFIX_NAMES: Map<&str, String> = Map::new("prefix_names");
pub const CONNECTION_INFOS: Map<&str, IbcConnectionInfo> = Map::new("connection_infos"); // sorted chain id pair
pub const DENOM_DETAILS: Map<(&str, &str), DenomDetail> = Map::new("denom_details"); // (holding chain, denom)
pub const BRAND_DENOMS: Map<&str, String> = Map::new("brand_denoms");
pub const CHAIN_COUNT: Item<u64> = Item::new("chain_count");
pub const ASSET_COUNT: Item<u64> = Item::new("asset_count");

fn increment(storage: &mut dyn Storage, counter: &Item<u64>) -> HubResult<()> {
    let count = counter.may_load(storage)?.unwrap_or_default();
    counter.save(storage, &(count + 1))?;
    Ok(())
}

/// Read-only registries over contract storage.
pub struct StorageView<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StorageView<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }
}

impl HubView for StorageView<'_> {
    fn chain(&self, name: &str) -> HubResult<Option<ChainInfo>> {
        Ok(CHAIN_INFOS.may_load(self.storage, name)?)
    }

    fn chain_name(&self, alias: ChainAlias<'_>) -> HubResult<Option<String>> {
        let name = match alias {
            ChainAlias::ChainId(id) => CHAIN_ID_NAMES.may_load(self.storage, id)?,
            ChainAlias::Bech32Prefix(prefix) => PREFIX_NAMES.may_load(self.storage, prefix)?,
        };
        Ok(name)
    }

    fn connection(&self, key: &str) -> HubResult<Option<IbcConnectionInfo>> {
        Ok(CONNECTION_INFOS.may_load(self.storage, key)?)
    }

    fn asset(&self, denom: &str, chain_name: &str) -> HubResult<Option<DenomDetail>> {
        Ok(DENOM_DETAILS.may_load(self.storage, (chain_name, denom))?)
    }

    fn denom_for_brand(&self, brand: &str) -> HubResult<Option<String>> {
        Ok(BRAND_DENOMS.may_load(self.storage, brand)?)
    }
}

/// Writable registries over contract storage, keeping the chain and asset counts.
pub struct StorageHub<'a> {
    storage: &'a mut dyn Storage,
}

impl<'a> StorageHub<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        Self { storage }
    }

    fn view(&self) -> StorageView<'_> {
        StorageView::new(&*self.storage)
    }
}

impl HubView for StorageHub<'_> {
    fn chain(&self, name: &str) -> HubResult<Option<ChainInfo>> {
        self.view().chain(name)
    }

    fn chain_name(&self, alias: ChainAlias<'_>) -> HubResult<Option<String>> {
        self.view().chain_name(alias)
    }

    fn connection(&self, key: &str) -> HubResult<Option<IbcConnectionInfo>> {
        self.view().connection(key)
    }

    fn asset(&self, denom: &str, chain_name: &str) -> HubResult<Option<DenomDetail>> {
        self.view().asset(denom, chain_name)
    }

    fn denom_for_brand(&self, brand: &str) -> HubResult<Option<String>> {
        self.view().denom_for_brand(brand)
    }
}

impl HubStore for StorageHub<'_> {
    fn save_chain(&mut self, name: &str, info: &ChainInfo) -> HubResult<()> {
        if !CHAIN_INFOS.has(self.storage, name) {
            increment(self.storage, &CHAIN_COUNT)?;
        }
        CHAIN_INFOS.save(self.storage, name, info)?;
        Ok(())
    }

    fn save_chain_alias(&mut self, alias: ChainAlias<'_>, name: &str) -> HubResult<()> {
        let name = name.to_string();
        match alias {
            ChainAlias::ChainId(id) => CHAIN_ID_NAMES.save(self.storage, id, &name)?,
            ChainAlias::Bech32Prefix(prefix) => PREFIX_NAMES.save(self.storage, prefix, &name)?,
        }
        Ok(())
    }

    fn remove_chain_alias(&mut self, alias: ChainAlias<'_>) -> HubResult<()> {
        match alias {
            ChainAlias::ChainId(id) => CHAIN_ID_NAMES.remove(self.storage, id),
            ChainAlias::Bech32Prefix(prefix) => PREFIX_NAMES.remove(self.storage, prefix),
        }
        Ok(())
    }

    fn save_connection(&mut self, key: &str, info: &IbcConnectionInfo) -> HubResult<()> {
        CONNECTION_INFOS.save(self.storage, key, info)?;
        Ok(())
    }

    fn save_asset(&mut self, denom: &str, detail: &DenomDetail) -> HubResult<()> {
        let key = (detail.chain_name.as_str(), denom);
        if !DENOM_DETAILS.has(self.storage, key) {
            increment(self.storage, &ASSET_COUNT)?;
        }
        DENOM_DETAILS.save(self.storage, key, detail)?;
        Ok(())
    }

    fn save_brand(&mut self, brand: &str, denom: &str) -> HubResult<()> {
        BRAND_DENOMS.save(self.storage, brand, &denom.to_string())?;
        Ok(())
    }

    fn remove_brand(&mut self, brand: &str) -> HubResult<()> {
        BRAND_DENOMS.remove(self.storage, brand);
        Ok(())
    }
}
