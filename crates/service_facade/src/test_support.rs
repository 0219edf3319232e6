//! Mock providers shared by the facade test modules.

use service_api::keystone::{self, Keystone, Meta, Node};
use service_api::{conduit, flume, PlayerId, ProviderError, WorldId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ============================================================================
// Keystone
// ============================================================================

#[derive(Clone, Default)]
struct MockUserData {
    primary: String,
    nodes: Vec<Node>,
    permissions: HashSet<String>,
    meta: Meta,
}

struct MockUser {
    data: MockUserData,
}

impl keystone::User for MockUser {
    fn primary_group(&self) -> String {
        self.data.primary.clone()
    }

    fn nodes(&self) -> Vec<Node> {
        self.data.nodes.clone()
    }

    fn has_permission(&self, key: &str) -> bool {
        self.data.permissions.contains(key)
    }

    fn meta(&self) -> Meta {
        self.data.meta.clone()
    }
}

struct MockGroup {
    name: String,
    meta: Meta,
}

impl keystone::Group for MockGroup {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn meta(&self) -> Meta {
        self.meta.clone()
    }
}

/// Builder-style in-memory Keystone engine.
#[derive(Default)]
pub(crate) struct MockKeystone {
    users: HashMap<PlayerId, MockUserData>,
    groups: HashMap<String, Meta>,
}

impl MockKeystone {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(mut self, player: PlayerId, primary: &str, nodes: Vec<Node>) -> Self {
        let entry = self.users.entry(player).or_default();
        entry.primary = primary.to_string();
        entry.nodes = nodes;
        self
    }

    pub(crate) fn with_user_meta(
        mut self,
        player: PlayerId,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) -> Self {
        let entry = self.users.entry(player).or_default();
        entry.meta = Meta {
            prefix: prefix.map(str::to_string),
            suffix: suffix.map(str::to_string),
        };
        self
    }

    pub(crate) fn grant(mut self, player: PlayerId, permission: &str) -> Self {
        self.users
            .entry(player)
            .or_default()
            .permissions
            .insert(permission.to_string());
        self
    }

    pub(crate) fn with_group(
        mut self,
        name: &str,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) -> Self {
        self.groups.insert(
            name.to_string(),
            Meta {
                prefix: prefix.map(str::to_string),
                suffix: suffix.map(str::to_string),
            },
        );
        self
    }
}

impl Keystone for MockKeystone {
    fn user(&self, player: PlayerId) -> Option<Arc<dyn keystone::User>> {
        self.users
            .get(&player)
            .map(|data| Arc::new(MockUser { data: data.clone() }) as Arc<dyn keystone::User>)
    }

    fn group(&self, name: &str) -> Option<Arc<dyn keystone::Group>> {
        self.groups.get(name).map(|meta| {
            Arc::new(MockGroup {
                name: name.to_string(),
                meta: meta.clone(),
            }) as Arc<dyn keystone::Group>
        })
    }

    fn loaded_groups(&self) -> Vec<Arc<dyn keystone::Group>> {
        self.groups
            .iter()
            .map(|(name, meta)| {
                Arc::new(MockGroup {
                    name: name.clone(),
                    meta: meta.clone(),
                }) as Arc<dyn keystone::Group>
            })
            .collect()
    }
}

// ============================================================================
// Conduit Chat
// ============================================================================

/// In-memory Conduit chat service backed by a named plugin.
pub(crate) struct MockConduitChat {
    name: String,
    player_prefixes: HashMap<PlayerId, String>,
    group_prefixes: HashMap<(Option<String>, String), String>,
}

impl MockConduitChat {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            player_prefixes: HashMap::new(),
            group_prefixes: HashMap::new(),
        }
    }

    pub(crate) fn with_player_prefix(mut self, player: PlayerId, prefix: &str) -> Self {
        self.player_prefixes.insert(player, prefix.to_string());
        self
    }

    pub(crate) fn with_group_prefix(mut self, world: Option<&str>, group: &str, prefix: &str) -> Self {
        self.group_prefixes.insert(
            (world.map(str::to_string), group.to_string()),
            prefix.to_string(),
        );
        self
    }
}

impl conduit::Chat for MockConduitChat {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn enabled(&self) -> bool {
        true
    }

    fn primary_group(&self, _player: PlayerId) -> Option<String> {
        None
    }

    fn player_in_group(&self, _player: PlayerId, _group: &str) -> bool {
        false
    }

    fn player_groups(&self, _player: PlayerId) -> Vec<String> {
        Vec::new()
    }

    fn player_prefix(&self, player: PlayerId) -> Option<String> {
        self.player_prefixes.get(&player).cloned()
    }

    fn player_suffix(&self, _player: PlayerId) -> Option<String> {
        None
    }

    fn group_prefix(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        let key = (world.map(|w| w.as_str().to_string()), group.to_string());
        self.group_prefixes.get(&key).cloned()
    }

    fn group_suffix(&self, _world: Option<&WorldId>, _group: &str) -> Option<String> {
        None
    }

    fn groups(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// Flume Chat
// ============================================================================

/// Minimal Flume chat service; enough for selection-order tests.
pub(crate) struct MockFlumeChat {
    name: String,
}

impl MockFlumeChat {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl flume::Chat for MockFlumeChat {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn enabled(&self) -> bool {
        true
    }

    fn primary_group(&self, _scope: &str, _player: PlayerId) -> Option<String> {
        None
    }

    fn player_in_group(&self, _scope: &str, _player: PlayerId, _group: &str) -> bool {
        false
    }

    fn player_groups(&self, _scope: &str, _player: PlayerId) -> Vec<String> {
        Vec::new()
    }

    fn player_prefix(&self, _scope: &str, _player: PlayerId) -> Option<String> {
        None
    }

    fn player_suffix(&self, _scope: &str, _player: PlayerId) -> Option<String> {
        None
    }

    fn group_prefix(&self, _scope: &str, _world: Option<&WorldId>, _group: &str) -> Option<String> {
        None
    }

    fn group_suffix(&self, _scope: &str, _world: Option<&WorldId>, _group: &str) -> Option<String> {
        None
    }

    fn groups(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// Conduit Economy
// ============================================================================

/// In-memory Conduit economy ledger with mutation-call counting.
pub(crate) struct MockConduitEconomy {
    name: String,
    balances: Mutex<HashMap<PlayerId, f64>>,
    mutation_calls: Arc<AtomicUsize>,
}

impl MockConduitEconomy {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            balances: Mutex::new(HashMap::new()),
            mutation_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_balance(self, player: PlayerId, balance: f64) -> Self {
        self.balances.lock().unwrap().insert(player, balance);
        self
    }

    /// Counter of withdraw/deposit calls that reached this provider.
    pub(crate) fn mutation_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.mutation_calls)
    }
}

impl conduit::Economy for MockConduitEconomy {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn enabled(&self) -> bool {
        true
    }

    fn balance(&self, player: PlayerId) -> Result<f64, ProviderError> {
        Ok(*self.balances.lock().unwrap().get(&player).unwrap_or(&0.0))
    }

    fn withdraw(
        &self,
        player: PlayerId,
        amount: f64,
    ) -> Result<conduit::EconomyResponse, ProviderError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(player).or_insert(0.0);
        if *balance < amount {
            return Ok(conduit::EconomyResponse::failure("insufficient funds"));
        }
        *balance -= amount;
        Ok(conduit::EconomyResponse::success(amount, *balance))
    }

    fn deposit(
        &self,
        player: PlayerId,
        amount: f64,
    ) -> Result<conduit::EconomyResponse, ProviderError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(player).or_insert(0.0);
        *balance += amount;
        Ok(conduit::EconomyResponse::success(amount, *balance))
    }
}

/// Conduit economy whose every operation fails at the provider level.
pub(crate) struct FailingEconomy;

impl conduit::Economy for FailingEconomy {
    fn name(&self) -> String {
        "Broken".to_string()
    }

    fn enabled(&self) -> bool {
        true
    }

    fn balance(&self, _player: PlayerId) -> Result<f64, ProviderError> {
        Err(ProviderError::Backend("ledger unavailable".to_string()))
    }

    fn withdraw(
        &self,
        _player: PlayerId,
        _amount: f64,
    ) -> Result<conduit::EconomyResponse, ProviderError> {
        Err(ProviderError::Backend("ledger unavailable".to_string()))
    }

    fn deposit(
        &self,
        _player: PlayerId,
        _amount: f64,
    ) -> Result<conduit::EconomyResponse, ProviderError> {
        Err(ProviderError::Backend("ledger unavailable".to_string()))
    }
}

// ============================================================================
// Flume Economy
// ============================================================================

/// In-memory Flume economy ledger recording the scope of every call.
pub(crate) struct MockFlumeEconomy {
    name: String,
    balances: Mutex<HashMap<Uuid, f64>>,
    seen_scopes: Arc<Mutex<Vec<String>>>,
}

impl MockFlumeEconomy {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            balances: Mutex::new(HashMap::new()),
            seen_scopes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_balance(self, account: Uuid, balance: f64) -> Self {
        self.balances.lock().unwrap().insert(account, balance);
        self
    }

    /// Every scope string this provider has been called with.
    pub(crate) fn seen_scopes(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.seen_scopes)
    }

    fn record_scope(&self, scope: &str) {
        self.seen_scopes.lock().unwrap().push(scope.to_string());
    }
}

impl flume::Economy for MockFlumeEconomy {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn enabled(&self) -> bool {
        true
    }

    fn balance(&self, scope: &str, account: Uuid) -> Result<f64, ProviderError> {
        self.record_scope(scope);
        Ok(*self.balances.lock().unwrap().get(&account).unwrap_or(&0.0))
    }

    fn withdraw(
        &self,
        scope: &str,
        account: Uuid,
        amount: f64,
    ) -> Result<flume::EconomyResponse, ProviderError> {
        self.record_scope(scope);
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(account).or_insert(0.0);
        if *balance < amount {
            return Ok(flume::EconomyResponse::failure("insufficient funds"));
        }
        *balance -= amount;
        Ok(flume::EconomyResponse::success(amount, *balance))
    }

    fn deposit(
        &self,
        scope: &str,
        account: Uuid,
        amount: f64,
    ) -> Result<flume::EconomyResponse, ProviderError> {
        self.record_scope(scope);
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(account).or_insert(0.0);
        *balance += amount;
        Ok(flume::EconomyResponse::success(amount, *balance))
    }
}
