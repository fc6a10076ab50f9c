use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, error};

use crate::address;
use crate::bootstrap::{self, RegistrationFailure};
use crate::config::HubConfig;
use crate::connection::{connection_key, denormalize_connection, normalize_connection};
use crate::error::{HubError, HubResult};
use crate::registry::{self, ensure_bare_name};
use crate::route;
use crate::store::{ChainAlias, HubStore, HubView};
use crate::types::{
    AccountIdArg, ChainAddress, ChainIdArg, ChainInfo, DenomAmount, DenomDetail, ForwardOpts,
    IbcConnectionInfo, TransferRoute,
};

/// External name-resolution source consulted for chains and connections not
/// registered locally.
#[async_trait]
pub trait ChainInfoSource: Send + Sync {
    async fn lookup_chain(&self, chain_name: &str) -> HubResult<ChainInfo>;

    /// The connection published under `key` (see
    /// [`connection_key`](crate::connection::connection_key)), oriented from the
    /// lesser chain id.
    async fn lookup_connection(&self, key: &str) -> HubResult<IbcConnectionInfo>;
}

/// A fixed table of chain infos and connections.
#[derive(Clone, Debug, Default)]
pub struct StaticChainSource {
    chains: BTreeMap<String, ChainInfo>,
    connections: BTreeMap<String, IbcConnectionInfo>,
}

impl StaticChainSource {
    pub fn new(chains: BTreeMap<String, ChainInfo>) -> Self {
        Self {
            chains,
            connections: BTreeMap::new(),
        }
    }

    /// Add the connection between two chains, given from `primary`'s side.
    pub fn with_connection(
        mut self,
        primary: &str,
        counterparty: &str,
        info: IbcConnectionInfo,
    ) -> Self {
        let (key, normalized) = normalize_connection(primary, counterparty, info);
        self.connections.insert(key, normalized);
        self
    }
}

#[async_trait]
impl ChainInfoSource for StaticChainSource {
    async fn lookup_chain(&self, chain_name: &str) -> HubResult<ChainInfo> {
        self.chains
            .get(chain_name)
            .cloned()
            .ok_or_else(|| HubError::ChainNotFound {
                chain_name: chain_name.to_string(),
            })
    }

    async fn lookup_connection(&self, key: &str) -> HubResult<IbcConnectionInfo> {
        self.connections
            .get(key)
            .cloned()
            .ok_or_else(|| HubError::Storage {
                msg: format!("no connection under {key}"),
            })
    }
}

/// In-process registries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    chains: BTreeMap<String, ChainInfo>,
    chain_id_names: BTreeMap<String, String>,
    prefix_names: BTreeMap<String, String>,
    connections: BTreeMap<String, IbcConnectionInfo>,
    // (holding chain, denom)
    assets: BTreeMap<(String, String), DenomDetail>,
    brands: BTreeMap<String, String>,
}

impl MemoryStore {
    fn aliases(&self, alias: ChainAlias<'_>) -> (&BTreeMap<String, String>, String) {
        match alias {
            ChainAlias::ChainId(id) => (&self.chain_id_names, id.to_string()),
            ChainAlias::Bech32Prefix(prefix) => (&self.prefix_names, prefix.to_string()),
        }
    }

    fn aliases_mut(&mut self, alias: ChainAlias<'_>) -> (&mut BTreeMap<String, String>, String) {
        match alias {
            ChainAlias::ChainId(id) => (&mut self.chain_id_names, id.to_string()),
            ChainAlias::Bech32Prefix(prefix) => (&mut self.prefix_names, prefix.to_string()),
        }
    }

    pub fn chain_named(&self, name: &str) -> Option<&ChainInfo> {
        self.chains.get(name)
    }

    pub fn asset_detail(&self, denom: &str, chain_name: &str) -> Option<&DenomDetail> {
        self.assets.get(&(chain_name.to_string(), denom.to_string()))
    }

    pub fn brand_denom(&self, brand: &str) -> Option<&String> {
        self.brands.get(brand)
    }

    pub fn stored_connection(&self, key: &str) -> Option<&IbcConnectionInfo> {
        self.connections.get(key)
    }
}

impl HubView for MemoryStore {
    fn chain(&self, name: &str) -> HubResult<Option<ChainInfo>> {
        Ok(self.chain_named(name).cloned())
    }

    fn chain_name(&self, alias: ChainAlias<'_>) -> HubResult<Option<String>> {
        let (names, key) = self.aliases(alias);
        Ok(names.get(&key).cloned())
    }

    fn connection(&self, key: &str) -> HubResult<Option<IbcConnectionInfo>> {
        Ok(self.stored_connection(key).cloned())
    }

    fn asset(&self, denom: &str, chain_name: &str) -> HubResult<Option<DenomDetail>> {
        Ok(self.asset_detail(denom, chain_name).cloned())
    }

    fn denom_for_brand(&self, brand: &str) -> HubResult<Option<String>> {
        Ok(self.brand_denom(brand).cloned())
    }
}

impl HubStore for MemoryStore {
    fn save_chain(&mut self, name: &str, info: &ChainInfo) -> HubResult<()> {
        self.chains.insert(name.to_string(), info.clone());
        Ok(())
    }

    fn save_chain_alias(&mut self, alias: ChainAlias<'_>, name: &str) -> HubResult<()> {
        let (names, key) = self.aliases_mut(alias);
        names.insert(key, name.to_string());
        Ok(())
    }

    fn remove_chain_alias(&mut self, alias: ChainAlias<'_>) -> HubResult<()> {
        let (names, key) = self.aliases_mut(alias);
        names.remove(&key);
        Ok(())
    }

    fn save_connection(&mut self, key: &str, info: &IbcConnectionInfo) -> HubResult<()> {
        self.connections.insert(key.to_string(), info.clone());
        Ok(())
    }

    fn save_asset(&mut self, denom: &str, detail: &DenomDetail) -> HubResult<()> {
        self.assets.insert(
            (detail.chain_name.clone(), denom.to_string()),
            detail.clone(),
        );
        Ok(())
    }

    fn save_brand(&mut self, brand: &str, denom: &str) -> HubResult<()> {
        self.brands.insert(brand.to_string(), denom.to_string());
        Ok(())
    }

    fn remove_brand(&mut self, brand: &str) -> HubResult<()> {
        self.brands.remove(brand);
        Ok(())
    }
}

type Lookup<T> = Shared<BoxFuture<'static, HubResult<T>>>;

struct PendingLookup<T> {
    id: u64,
    future: Lookup<T>,
}

/// Lookups in flight, by chain name or connection key.
struct PendingLookups<T> {
    in_flight: Mutex<HashMap<String, PendingLookup<T>>>,
    next_id: AtomicU64,
}

impl<T> PendingLookups<T> {
    fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PendingLookup<T>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, key: &str, id: u64) {
        let mut in_flight = self.lock();
        if in_flight.get(key).map(|p| p.id) == Some(id) {
            in_flight.remove(key);
        }
    }
}

/// Join the lookup in flight for `key`, or start one with `fetch`. The entry is
/// dropped once the lookup settles, so a failed key can be looked up again.
fn join_or_start<T>(
    lookups: &Arc<PendingLookups<T>>,
    in_flight: &mut HashMap<String, PendingLookup<T>>,
    key: &str,
    fetch: impl FnOnce() -> BoxFuture<'static, HubResult<T>>,
) -> Lookup<T>
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(pending) = in_flight.get(key) {
        return pending.future.clone();
    }

    let id = lookups.next_id.fetch_add(1, Ordering::Relaxed);
    let settle = Arc::clone(lookups);
    let owned_key = key.to_string();
    let fetch = fetch();
    let future = async move {
        let outcome = fetch.await;
        settle.finish(&owned_key, id);
        outcome
    }
    .boxed()
    .shared();

    in_flight.insert(
        key.to_string(),
        PendingLookup {
            id,
            future: future.clone(),
        },
    );
    future
}

/// Registry of chains, connections and assets with lazily populated chain and
/// connection infos.
///
/// A chain name moves from unresolved, to pending (one shared lookup through the
/// [`ChainInfoSource`]), to resolved (held in the store). Every caller asking for a
/// pending name awaits the same lookup. A failed lookup leaves the name unresolved.
/// Connections follow the same path, keyed by their connection key.
pub struct ChainHub {
    store: Arc<RwLock<MemoryStore>>,
    chain_lookups: Arc<PendingLookups<ChainInfo>>,
    connection_lookups: Arc<PendingLookups<IbcConnectionInfo>>,
    source: Arc<dyn ChainInfoSource>,
    config: HubConfig,
}

impl ChainHub {
    pub fn new(source: Arc<dyn ChainInfoSource>, config: HubConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::default())),
            chain_lookups: Arc::new(PendingLookups::new()),
            connection_lookups: Arc::new(PendingLookups::new()),
            source,
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_chain(&self, name: &str, info: ChainInfo) -> HubResult<()> {
        registry::register_chain(&mut *self.write(), name, info)
    }

    pub fn update_chain(&self, name: &str, info: ChainInfo) -> HubResult<()> {
        registry::update_chain(&mut *self.write(), name, info)
    }

    /// Chain info by name, looked up from the source the first time it is needed.
    pub async fn get_chain_info(&self, chain_name: &str) -> HubResult<ChainInfo> {
        ensure_bare_name(chain_name)?;
        if let Some(info) = self.read().chain_named(chain_name) {
            return Ok(info.clone());
        }

        let lookup = {
            let mut in_flight = self.chain_lookups.lock();
            // a lookup may have landed between the read above and taking the lock
            if let Some(info) = self.read().chain_named(chain_name) {
                return Ok(info.clone());
            }
            join_or_start(&self.chain_lookups, &mut *in_flight, chain_name, || {
                self.fetch_chain(chain_name)
            })
        };
        lookup.await
    }

    fn fetch_chain(&self, chain_name: &str) -> BoxFuture<'static, HubResult<ChainInfo>> {
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let chain_name = chain_name.to_string();

        async move {
            debug!(chain_name = chain_name.as_str(), "looking up chain info");
            let info = match source.lookup_chain(&chain_name).await {
                Ok(info) => info,
                Err(err) => {
                    error!(chain_name = chain_name.as_str(), %err, "chain info lookup failed");
                    return Err(HubError::ChainNotFound { chain_name });
                }
            };

            let mut store = store.write().unwrap_or_else(PoisonError::into_inner);
            // registered directly while the lookup was in flight
            if let Some(existing) = store.chain_named(&chain_name) {
                return Ok(existing.clone());
            }
            match registry::register_chain(&mut *store, &chain_name, info.clone()) {
                Ok(()) => Ok(info),
                Err(err) => {
                    error!(chain_name = chain_name.as_str(), %err, "looked up chain not registered");
                    Err(err)
                }
            }
        }
        .boxed()
    }

    pub fn get_chain_info_by_chain_id(&self, chain_id: &str) -> HubResult<ChainInfo> {
        registry::chain_by_chain_id(&*self.read(), chain_id)
    }

    pub fn register_connection(
        &self,
        primary_chain_id: &str,
        counterparty_chain_id: &str,
        info: IbcConnectionInfo,
    ) -> HubResult<()> {
        registry::register_connection(
            &mut *self.write(),
            primary_chain_id,
            counterparty_chain_id,
            info,
        )
    }

    pub fn update_connection(
        &self,
        primary_chain_id: &str,
        counterparty_chain_id: &str,
        info: IbcConnectionInfo,
    ) -> HubResult<()> {
        registry::update_connection(
            &mut *self.write(),
            primary_chain_id,
            counterparty_chain_id,
            info,
        )
    }

    /// Connection from `primary` to `counterparty`, looked up from the source the
    /// first time it is needed.
    pub async fn get_connection_info(
        &self,
        primary: impl Into<ChainIdArg>,
        counterparty: impl Into<ChainIdArg>,
    ) -> HubResult<IbcConnectionInfo> {
        let primary = primary.into();
        let counterparty = counterparty.into();
        let (primary_id, counter_id) = (primary.chain_id(), counterparty.chain_id());
        let key = connection_key(primary_id, counter_id);

        let lookup = {
            let mut in_flight = self.connection_lookups.lock();
            if let Some(stored) = self.read().stored_connection(&key) {
                return Ok(denormalize_connection(primary_id, counter_id, stored.clone()));
            }
            join_or_start(&self.connection_lookups, &mut *in_flight, &key, || {
                self.fetch_connection(&key)
            })
        };

        let normalized = lookup.await.map_err(|_| HubError::ConnectionNotFound {
            primary: primary_id.to_string(),
            counterparty: counter_id.to_string(),
        })?;
        Ok(denormalize_connection(primary_id, counter_id, normalized))
    }

    fn fetch_connection(&self, key: &str) -> BoxFuture<'static, HubResult<IbcConnectionInfo>> {
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let key = key.to_string();

        async move {
            debug!(key = key.as_str(), "looking up connection info");
            let info = source.lookup_connection(&key).await.map_err(|err| {
                error!(key = key.as_str(), %err, "connection info lookup failed");
                err
            })?;

            let mut store = store.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = store.stored_connection(&key) {
                return Ok(existing.clone());
            }
            store.save_connection(&key, &info)?;
            Ok(info)
        }
        .boxed()
    }

    /// Both chains' infos and the connection between them.
    pub async fn get_chains_and_connection(
        &self,
        primary_name: &str,
        counter_name: &str,
    ) -> HubResult<(ChainInfo, ChainInfo, IbcConnectionInfo)> {
        let (primary, counter) = futures::try_join!(
            self.get_chain_info(primary_name),
            self.get_chain_info(counter_name)
        )?;
        let connection = self.get_connection_info(&primary, &counter).await?;
        Ok((primary, counter, connection))
    }

    pub fn register_asset(&self, denom: &str, detail: DenomDetail) -> HubResult<()> {
        registry::register_asset(&mut *self.write(), denom, detail)
    }

    pub fn update_asset(&self, denom: &str, detail: DenomDetail) -> HubResult<()> {
        registry::update_asset(&mut *self.write(), denom, detail)
    }

    pub fn get_asset(&self, denom: &str, chain_name: &str) -> Option<DenomDetail> {
        self.read().asset_detail(denom, chain_name).cloned()
    }

    pub fn get_denom(&self, brand: &str) -> Option<String> {
        self.read().brand_denom(brand).cloned()
    }

    pub fn make_chain_address(&self, partial_id: &str) -> HubResult<ChainAddress> {
        address::make_chain_address(&*self.read(), partial_id)
    }

    pub fn coerce_cosmos_address(&self, arg: impl Into<AccountIdArg>) -> HubResult<ChainAddress> {
        address::coerce_cosmos_address(&*self.read(), arg.into())
    }

    pub fn resolve_account_id(&self, partial_id: &str) -> HubResult<String> {
        address::resolve_account_id(&*self.read(), partial_id)
    }

    pub fn make_transfer_route(
        &self,
        destination: impl Into<AccountIdArg>,
        amount: &DenomAmount,
        holding_chain: &str,
        forward_opts: Option<&ForwardOpts>,
    ) -> HubResult<TransferRoute> {
        let store = self.read();
        let destination = address::coerce_cosmos_address(&*store, destination.into())?;
        route::make_transfer_route(
            &*store,
            &self.config.forward,
            &destination,
            amount,
            holding_chain,
            forward_opts,
        )
    }

    /// Batch registration, applying the capability table to each chain first.
    pub fn register_chains_and_assets(
        &self,
        chains: &BTreeMap<String, ChainInfo>,
        assets: &[(String, DenomDetail)],
    ) -> Vec<RegistrationFailure> {
        let chains: BTreeMap<String, ChainInfo> = chains
            .iter()
            .map(|(name, info)| (name.clone(), self.config.with_capabilities(name, info.clone())))
            .collect();
        bootstrap::register_chains_and_assets(&mut *self.write(), &chains, assets)
    }
}
