//! Best-wave record
//!
//! Read once when a simulation is created and written once per cleared wave.
//! Both directions are fire-and-forget: a broken store is logged and the run
//! carries on with whatever value it already has.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Persisted form of the best wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestWaveRecord {
    /// Highest wave ever cleared in this scope
    pub wave: u32,
}

impl BestWaveRecord {
    /// Decode a stored value. Accepts the JSON record or a bare integer.
    pub fn decode(raw: &str) -> Option<Self> {
        if let Ok(record) = serde_json::from_str::<BestWaveRecord>(raw) {
            return Some(record);
        }
        raw.trim().parse::<u32>().ok().map(|wave| Self { wave })
    }

    pub fn encode(&self) -> String {
        // Serializing a struct of one integer cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"wave\":{}}}", self.wave))
    }
}

/// Load the best wave for `scope`, falling back to 0
pub fn load(store: &dyn KeyValueStore, scope: &str) -> u32 {
    match store.get(scope) {
        Ok(Some(raw)) => match BestWaveRecord::decode(&raw) {
            Some(record) => {
                log::info!("Loaded best wave {} for `{}`", record.wave, scope);
                record.wave
            }
            None => {
                log::warn!("Ignoring unreadable best wave for `{}`: {:?}", scope, raw);
                0
            }
        },
        Ok(None) => {
            log::info!("No best wave stored for `{}`, starting fresh", scope);
            0
        }
        Err(e) => {
            log::warn!("Best wave load failed for `{}`: {}", scope, e);
            0
        }
    }
}

/// Store `wave` as the best wave for `scope`
pub fn save(store: &mut dyn KeyValueStore, scope: &str, wave: u32) {
    let record = BestWaveRecord { wave };
    match store.set(scope, &record.encode()) {
        Ok(()) => log::info!("Best wave {} saved", wave),
        Err(e) => log::warn!("Best wave save failed for `{}`: {}", scope, e),
    }
}
