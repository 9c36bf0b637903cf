// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Per-session replay windows.
//!
//! Every session owns an independent [`ReplayWindow`], created lazily in the
//! uninitialised state the first time the session is referenced.

use crate::config::WindowConfig;
use crate::decision::Decision;
use crate::error::ReplayWindowError;
use crate::window::ReplayWindow;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Session identifier used when the caller has no key type of its own.
pub type SessionId = u64;

/// Keyed collection of replay windows for single-threaded owners.
#[derive(Debug, Clone)]
pub struct SessionTable<K = SessionId> {
    // validated and never mutated: every new session starts as a copy of it
    template: ReplayWindow,
    windows: HashMap<K, ReplayWindow>,
}

impl<K> SessionTable<K>
where
    K: Hash + Eq + Debug,
{
    pub fn new(config: &WindowConfig) -> Result<Self, ReplayWindowError> {
        Ok(SessionTable {
            template: ReplayWindow::from_config(config)?,
            windows: HashMap::new(),
        })
    }

    /// Get the window of the given session, creating a fresh one on first use.
    pub fn get_or_create(&mut self, session: K) -> &mut ReplayWindow {
        let template = &self.template;
        self.windows.entry(session).or_insert_with_key(|session| {
            debug!("creating replay window for session {session:?}");
            template.clone()
        })
    }

    pub fn get(&self, session: &K) -> Option<&ReplayWindow> {
        self.windows.get(session)
    }

    pub fn check_and_record(&mut self, session: K, seq: u64) -> Decision {
        self.get_or_create(session).check_and_record(seq)
    }

    /// Discard the window of the given session. Removing an unknown session is a no-op.
    pub fn remove(&mut self, session: &K) -> Option<ReplayWindow> {
        let removed = self.windows.remove(session);
        if removed.is_some() {
            debug!("removed replay window of session {session:?}");
        }
        removed
    }

    pub fn contains(&self, session: &K) -> bool {
        self.windows.contains_key(session)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn session_ids(&self) -> impl Iterator<Item = &K> {
        self.windows.keys()
    }
}

/// Replay windows shared between threads.
///
/// Each window lives inside a [`DashMap`] entry whose write guard is held for the
/// whole duration of `check_and_record`, so calls for the same session are
/// serialised while different sessions only contend on shard boundaries.
#[derive(Debug, Clone)]
pub struct SharedSessionTable<K = SessionId>
where
    K: Hash + Eq,
{
    template: Arc<ReplayWindow>,
    windows: Arc<DashMap<K, ReplayWindow>>,
}

impl<K> SharedSessionTable<K>
where
    K: Hash + Eq + Clone + Debug,
{
    pub fn new(config: &WindowConfig) -> Result<Self, ReplayWindowError> {
        Ok(SharedSessionTable {
            template: Arc::new(ReplayWindow::from_config(config)?),
            windows: Arc::new(DashMap::new()),
        })
    }

    pub fn check_and_record(&self, session: K, seq: u64) -> Decision {
        let mut window = self.windows.entry(session).or_insert_with(|| {
            debug!("creating shared replay window");
            self.template.as_ref().clone()
        });
        window.check_and_record(seq)
    }

    /// Discard the window of the given session. Returns whether the session existed.
    pub fn remove(&self, session: &K) -> bool {
        let removed = self.windows.remove(session).is_some();
        if removed {
            debug!("removed shared replay window of session {session:?}");
        }
        removed
    }

    pub fn highest_seen(&self, session: &K) -> Option<u64> {
        self.windows
            .get(session)
            .map(|window| window.highest_seen())
    }

    pub fn contains(&self, session: &K) -> bool {
        self.windows.contains_key(session)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DropReason;
    use crate::window::WindowState;
    use std::thread;

    #[test]
    fn sessions_are_created_on_first_use() {
        let mut table = SessionTable::new(&WindowConfig::new(8)).unwrap();
        assert!(table.is_empty());

        let window = table.get_or_create(7);
        assert_eq!(window.state(), WindowState::Uninitialized);
        assert_eq!(window.window_size(), 8);
        assert_eq!(table.len(), 1);
        assert!(table.contains(&7));
    }

    #[test]
    fn sessions_are_independent() {
        let mut table = SessionTable::new(&WindowConfig::new(8)).unwrap();

        assert_eq!(table.check_and_record(1, 100), Decision::Accept);
        assert_eq!(table.check_and_record(2, 100), Decision::Accept);
        assert_eq!(table.check_and_record(2, 5), Decision::Accept);
        assert_eq!(
            table.check_and_record(1, 5),
            Decision::Drop(DropReason::TooOld)
        );
        assert_eq!(
            table.check_and_record(1, 100),
            Decision::Drop(DropReason::Duplicate)
        );

        assert_eq!(table.get(&1).map(|w| w.highest_seen()), Some(100));
        assert_eq!(table.get(&2).map(|w| w.highest_seen()), Some(100));
        assert!(table.get(&3).is_none());

        let mut ids: Vec<_> = table.session_ids().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn removal_starts_fresh() {
        let mut table = SessionTable::new(&WindowConfig::new(8)).unwrap();
        table.check_and_record(42, 10);

        let removed = table.remove(&42).unwrap();
        assert_eq!(removed.highest_seen(), 10);
        assert!(table.remove(&42).is_none());
        assert!(table.remove(&1234).is_none());

        assert_eq!(table.check_and_record(42, 10), Decision::Accept);
        assert_eq!(table.check_and_record(42, 3), Decision::Accept);
    }

    #[test]
    fn invalid_config_is_rejected_upfront() {
        assert!(SessionTable::<u32>::new(&WindowConfig::new(0)).is_err());
        assert!(SharedSessionTable::<u32>::new(&WindowConfig::blocked(3, 8)).is_err());
    }

    #[test]
    fn string_keys() {
        let mut table = SessionTable::new(&WindowConfig::default()).unwrap();
        assert!(table.check_and_record("alice".to_string(), 1).is_accept());
        assert!(table.check_and_record("alice".to_string(), 1).is_drop());
        assert!(table.check_and_record("bob".to_string(), 1).is_accept());
    }

    #[test]
    fn shared_table_basic_operations() {
        let table = SharedSessionTable::new(&WindowConfig::new(16)).unwrap();
        assert!(table.is_empty());

        assert!(table.check_and_record(1, 20).is_accept());
        assert!(table.check_and_record(1, 20).is_drop());
        assert_eq!(table.highest_seen(&1), Some(20));
        assert_eq!(table.highest_seen(&2), None);

        assert!(table.remove(&1));
        assert!(!table.remove(&1));
        assert!(!table.contains(&1));
        assert!(table.check_and_record(1, 20).is_accept());
    }

    #[test]
    fn concurrent_sessions_accept_each_sequence_exactly_once() {
        let table = SharedSessionTable::new(&WindowConfig::blocked(16, 64)).unwrap();
        let sessions = 8u64;
        let threads_per_session = 4;
        let seqs = 2000u64;

        let mut handles = Vec::new();
        for session in 0..sessions {
            for _ in 0..threads_per_session {
                let table = table.clone();
                handles.push(thread::spawn(move || {
                    (1..=seqs)
                        .filter(|&seq| table.check_and_record(session, seq).is_accept())
                        .count()
                }));
            }
        }

        // every thread presents the same in-order sequence, so exactly one of the
        // competing threads gets to accept each sequence number
        let total_accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_accepted as u64, sessions * seqs);
        assert_eq!(table.len() as u64, sessions);
        for session in 0..sessions {
            assert_eq!(table.highest_seen(&session), Some(seqs));
        }
    }
}
