// ── Profile persistence seam ──
//
// The controller reads and replaces the profile through `ProfileStore`.
// Implementations swap whole values, so a reader sees either the old
// profile or the new one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::CoreError;
use crate::profile::ConnectionProfile;

pub trait ProfileStore: Send + Sync {
    /// Current profile. Missing values resolve to defaults; never fails.
    fn load(&self) -> ConnectionProfile;

    /// Replace the whole profile.
    fn save(&self, profile: &ConnectionProfile) -> Result<(), CoreError>;
}

/// Non-durable store holding the profile in memory.
pub struct MemoryProfileStore {
    current: ArcSwap<ConnectionProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::with_profile(ConnectionProfile::default())
    }

    pub fn with_profile(profile: ConnectionProfile) -> Self {
        Self {
            current: ArcSwap::from_pointee(profile),
        }
    }

    /// Cheap shared snapshot of the current profile.
    pub fn snapshot(&self) -> Arc<ConnectionProfile> {
        self.current.load_full()
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> ConnectionProfile {
        ConnectionProfile::clone(&self.current.load())
    }

    fn save(&self, profile: &ConnectionProfile) -> Result<(), CoreError> {
        self.current.store(Arc::new(profile.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;
    use crate::profile::PlaybackMode;

    #[test]
    fn load_without_save_returns_defaults() {
        let store = MemoryProfileStore::new();
        assert_eq!(store.load(), ConnectionProfile::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryProfileStore::new();
        let profile = ConnectionProfile {
            address: "10.0.0.2".into(),
            control_port: 9000,
            http_port: 9001,
            password: SecretString::from("secret".to_string()),
            album_art_enabled: false,
            message_compression_enabled: false,
            software_volume: true,
            ssl_enabled: true,
            playback_mode: PlaybackMode::Streaming,
        };
        store.save(&profile).expect("memory save");
        assert_eq!(store.load(), profile);
        assert_eq!(*store.snapshot(), profile);
    }

    #[test]
    fn snapshots_are_not_affected_by_later_saves() {
        let store = MemoryProfileStore::new();
        let before = store.snapshot();
        let changed = ConnectionProfile {
            address: "elsewhere".into(),
            ..ConnectionProfile::default()
        };
        store.save(&changed).expect("memory save");
        assert_eq!(*before, ConnectionProfile::default());
        assert_eq!(store.load(), changed);
    }

    #[test]
    fn shared_store_sees_saves() {
        let store = Arc::new(MemoryProfileStore::new());
        let shared: Arc<dyn ProfileStore> = store.clone();
        let changed = ConnectionProfile {
            http_port: 0,
            ..ConnectionProfile::default()
        };
        shared.save(&changed).expect("memory save");
        assert_eq!(store.load().http_port, 0);
    }

    #[test]
    fn concurrent_readers_only_see_whole_profiles() {
        let first = ConnectionProfile {
            address: "first.lan".into(),
            control_port: 1111,
            password: SecretString::from("one".to_string()),
            ..ConnectionProfile::default()
        };
        let second = ConnectionProfile {
            address: "second.lan".into(),
            control_port: 2222,
            http_port: 0,
            password: SecretString::from("two".to_string()),
            ssl_enabled: true,
            playback_mode: PlaybackMode::Streaming,
            ..ConnectionProfile::default()
        };
        let store = Arc::new(MemoryProfileStore::with_profile(first.clone()));

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                for i in 0..500 {
                    let next = if i % 2 == 0 { &second } else { &first };
                    store.save(next).expect("memory save");
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        let seen = store.load();
                        assert!(
                            seen == first || seen == second,
                            "torn profile: {seen:?}"
                        );
                    }
                });
            }

            writer.join().expect("writer thread");
        });
    }
}
