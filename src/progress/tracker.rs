// src/progress/tracker.rs

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::store::ProgressStore;
use crate::config::{CREDITED_KEYS_STORAGE_KEY, GLOSSARY_VIEW_XP, XP_STORAGE_KEY};

/// Identifies one creditable event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionKey(String);

impl InteractionKey {
    /// Key for opening a glossary term inside one lesson of one course.
    pub fn glossary_view(term_id: i64, course_id: i64, lesson_index: i64) -> Self {
        Self(format!("{}_{}_{}", term_id, course_id, lesson_index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InteractionKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InteractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Glossary XP ledger of one learner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub xp: u64,
    pub credited_keys: BTreeSet<InteractionKey>,
}

impl ProgressState {
    pub fn has_credited(&self, key: &InteractionKey) -> bool {
        self.credited_keys.contains(key)
    }
}

/// Outcome of a credit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credit {
    pub state: ProgressState,
    pub awarded: bool,
}

/// Awards glossary XP at most once per interaction key and keeps the
/// persisted copy in step.
///
/// Storage problems never reach the caller. After the first failed read or
/// write the tracker stops touching storage and carries on in memory.
pub struct ProgressTracker<S> {
    store: S,
    state: ProgressState,
    persistent: bool,
}

fn parse_xp(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(xp) => xp,
        Err(e) => {
            tracing::warn!("Ignoring unreadable persisted XP {:?}: {}", raw, e);
            0
        }
    }
}

fn parse_keys(raw: &str) -> BTreeSet<InteractionKey> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keys) => keys.into_iter().map(InteractionKey::from).collect(),
        Err(e) => {
            tracing::warn!("Ignoring malformed credited keys: {}", e);
            BTreeSet::new()
        }
    }
}

impl<S: ProgressStore> ProgressTracker<S> {
    /// Reads the persisted ledger. Missing or corrupt values fall back to
    /// zero XP and no credited keys.
    pub async fn load(store: S) -> Self {
        let mut tracker = Self {
            store,
            state: ProgressState::default(),
            persistent: true,
        };

        match tracker.store.load(XP_STORAGE_KEY).await {
            Ok(Some(raw)) => tracker.state.xp = parse_xp(&raw),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Could not load XP, continuing in memory: {}", e);
                tracker.persistent = false;
                return tracker;
            }
        }

        match tracker.store.load(CREDITED_KEYS_STORAGE_KEY).await {
            Ok(Some(raw)) => tracker.state.credited_keys = parse_keys(&raw),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Could not load credited keys, continuing in memory: {}", e);
                tracker.state = ProgressState::default();
                tracker.persistent = false;
            }
        }

        tracker
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn into_state(self) -> ProgressState {
        self.state
    }

    /// False once storage has failed and the tracker runs in memory only.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub async fn credit_glossary_view(
        &mut self,
        term_id: i64,
        course_id: i64,
        lesson_index: i64,
    ) -> Credit {
        self.credit(InteractionKey::glossary_view(term_id, course_id, lesson_index))
            .await
    }

    /// Adds `key` and `GLOSSARY_VIEW_XP` unless the key was credited before.
    pub async fn credit(&mut self, key: InteractionKey) -> Credit {
        if self.state.has_credited(&key) {
            return Credit {
                state: self.state.clone(),
                awarded: false,
            };
        }

        tracing::debug!("Crediting {} with {} XP", key, GLOSSARY_VIEW_XP);
        self.state.credited_keys.insert(key);
        self.state.xp = self.state.xp.saturating_add(GLOSSARY_VIEW_XP);
        self.persist().await;

        Credit {
            state: self.state.clone(),
            awarded: true,
        }
    }

    async fn persist(&mut self) {
        if !self.persistent {
            return;
        }

        let keys: Vec<&str> = self
            .state
            .credited_keys
            .iter()
            .map(InteractionKey::as_str)
            .collect();
        let encoded = match serde_json::to_string(&keys) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Could not encode credited keys: {}", e);
                self.persistent = false;
                return;
            }
        };

        if let Err(e) = self.store.save(CREDITED_KEYS_STORAGE_KEY, &encoded).await {
            tracing::warn!("Could not save credited keys, continuing in memory: {}", e);
            self.persistent = false;
            return;
        }

        let xp = self.state.xp.to_string();
        if let Err(e) = self.store.save(XP_STORAGE_KEY, &xp).await {
            tracing::warn!("Could not save XP, continuing in memory: {}", e);
            self.persistent = false;
        }
    }
}
