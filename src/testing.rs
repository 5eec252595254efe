//! Shared test fixtures

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;

use crate::cache::{Clock, MemoryCache};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::items::ItemId;
use crate::resolver::ItemResolver;
use crate::source::ItemSource;

pub const RENDER_URL: &str = "https://render.example.com";
pub const SIGIL_ID: ItemId = 24554;

/// Clock that only moves when told to
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Source with canned responses that records every fetch
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<ItemId, Result<Vec<u8>, String>>>,
    calls: Mutex<Vec<ItemId>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, id: ItemId, body: impl Into<Vec<u8>>) {
        self.responses.lock().insert(id, Ok(body.into()));
    }

    pub fn fail(&self, id: ItemId, reason: &str) {
        self.responses.lock().insert(id, Err(reason.to_string()));
    }

    pub fn calls_for(&self, id: ItemId) -> usize {
        self.calls.lock().iter().filter(|&&c| c == id).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }
}

impl ItemSource for ScriptedSource {
    fn fetch(&self, id: ItemId) -> Result<Vec<u8>, ResolveError> {
        self.calls.lock().push(id);
        match self.responses.lock().get(&id) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(ResolveError::Transport(reason.clone())),
            None => Err(ResolveError::Transport("HTTP 404".to_string())),
        }
    }
}

pub fn test_config() -> ResolverConfig {
    ResolverConfig {
        api_url: "https://api.example.com".to_string(),
        render_url: RENDER_URL.to_string(),
        ..ResolverConfig::default()
    }
}

/// Resolver over a scripted source and a memory cache driven by a manual clock
pub struct Harness {
    pub resolver: ItemResolver,
    pub source: Arc<ScriptedSource>,
    pub cache: Arc<MemoryCache>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let source = Arc::new(ScriptedSource::new());
        let cache = Arc::new(MemoryCache::with_clock(clock.clone()));
        let resolver = ItemResolver::new(test_config(), source.clone(), cache.clone());
        Self {
            resolver,
            source,
            cache,
            clock,
        }
    }
}

/// A v1-style weapon payload with strings for numbers
pub fn weapon_json(id: ItemId, suffix: Option<ItemId>) -> String {
    json!({
        "item_id": id.to_string(),
        "name": "Zojja's Blade",
        "description": "",
        "type": "Weapon",
        "level": "80",
        "rarity": "Exotic",
        "vendor_value": "264",
        "icon_file_id": "61000",
        "icon_file_signature": "ABCDEF0123",
        "game_types": ["Activity", "Dungeon", "Pve", "Wvw"],
        "flags": ["SoulBindOnUse", "NoSell"],
        "restrictions": [],
        "weapon": {
            "type": "Sword",
            "damage_type": "Physical",
            "min_power": "1045",
            "max_power": "1155",
            "infusion_slots": [{"flags": ["Offense"], "item_id": null}],
            "infix_upgrade": {
                "attributes": [{"attribute": "Power", "modifier": "62"}]
            },
            "suffix_item_id": suffix.map(|s| s.to_string()).unwrap_or_default()
        }
    })
    .to_string()
}

/// Minimal record of any type carrying a buff description and no attributes
pub fn record_json(id: ItemId, type_tag: &str, buff: &str) -> String {
    json!({
        "item_id": id,
        "name": format!("Item {}", id),
        "type": type_tag,
        "level": 0,
        "rarity": "Fine",
        "vendor_value": 10,
        "icon_file_id": "100",
        "icon_file_signature": "SIG",
        "flags": [],
        "infix_upgrade": {
            "attributes": [],
            "buff": {"skill_id": "9001", "description": buff}
        }
    })
    .to_string()
}

/// Upgrade component pointing at another suffix item
pub fn linked_json(id: ItemId, suffix: ItemId) -> String {
    json!({
        "item_id": id,
        "name": format!("Sigil {}", id),
        "type": "UpgradeComponent",
        "rarity": "Rare",
        "upgrade_component": {
            "type": "Sigil",
            "suffix_item_id": suffix.to_string()
        }
    })
    .to_string()
}
