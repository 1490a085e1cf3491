//! Level catalog and vocabulary store resolved from configuration.
//!
//! Both are built once at startup and never mutated; the engine resolves
//! every `start_level` call against them.

use std::collections::BTreeMap;

use crate::config::QuizConfig;
use crate::model::{LevelConfig, VocabEntry, VocabSet};

/// Static table of playable levels.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: BTreeMap<u32, LevelConfig>,
    default_questions: usize,
}

impl LevelCatalog {
    pub fn from_config(config: &QuizConfig) -> Self {
        let levels = config
            .levels
            .iter()
            .map(|level| (level.id, level.clone()))
            .collect();
        Self {
            levels,
            default_questions: config.questions_per_level,
        }
    }

    /// Look up a level by id.
    pub fn level(&self, id: u32) -> Option<&LevelConfig> {
        self.levels.get(&id)
    }

    /// The paired level's id, if the pairing resolves to a real level.
    pub fn paired_level(&self, id: u32) -> Option<u32> {
        let paired = self.levels.get(&id)?.paired?;
        self.levels.contains_key(&paired).then_some(paired)
    }

    /// Round count for a level: its own override or the global default.
    pub fn questions_for(&self, level: &LevelConfig) -> usize {
        level.questions.unwrap_or(self.default_questions)
    }

    /// Levels in id order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.values()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Immutable, loaded-once collection of vocabulary sets.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    sets: BTreeMap<String, VocabSet>,
}

impl VocabularyStore {
    pub fn from_config(config: &QuizConfig) -> Self {
        let sets = config
            .sets
            .iter()
            .map(|(name, entries)| {
                (
                    name.clone(),
                    VocabSet {
                        name: name.clone(),
                        entries: entries.clone(),
                    },
                )
            })
            .collect();
        Self { sets }
    }

    /// Look up a set by name.
    pub fn set(&self, name: &str) -> Option<&VocabSet> {
        self.sets.get(name)
    }

    /// Every entry across every set, in set-name order. This is the
    /// escalation pool for distractor generation.
    pub fn all_entries(&self) -> Vec<&VocabEntry> {
        self.sets
            .values()
            .flat_map(|set| set.entries.iter())
            .collect()
    }

    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
