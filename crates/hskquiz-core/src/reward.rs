//! Anti-repeat reward asset selection.
//!
//! The candidate list comes from an external asset resolver; this module
//! only decides which path to show, remembering the last pick per folder so
//! consecutive sessions never see the same image twice (unless a folder has
//! only one image to offer).

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

/// Last shown asset per folder.
///
/// Owned by the engine — the session context — rather than being process
/// global, so two engines in the same process cannot cross-contaminate
/// each other's anti-repeat state. Keys are folder names, which keeps the
/// pass and encourage tiers independent.
#[derive(Debug, Default)]
pub struct RewardHistory {
    last_shown: HashMap<String, String>,
}

impl RewardHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The path most recently selected for a folder.
    pub fn last_shown(&self, folder: &str) -> Option<&str> {
        self.last_shown.get(folder).map(String::as_str)
    }

    fn record(&mut self, folder: &str, path: &str) {
        self.last_shown.insert(folder.to_string(), path.to_string());
    }
}

/// Pick a reward asset for a folder, avoiding the previous pick.
///
/// - no candidates → `None` (a missing reward is a valid outcome)
/// - one candidate → that candidate, history notwithstanding
/// - otherwise → uniform pick from everything except the last-shown path
pub fn select<R: Rng + ?Sized>(
    rng: &mut R,
    history: &mut RewardHistory,
    folder: &str,
    candidates: &[String],
) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.len() == 1 {
        let only = candidates[0].clone();
        history.record(folder, &only);
        return Some(only);
    }

    let last = history.last_shown(folder).map(str::to_string);
    let available: Vec<&String> = candidates
        .iter()
        .filter(|c| Some(c.as_str()) != last.as_deref())
        .collect();

    // len >= 2 and the filter removes at most one entry
    let picked = (*available.choose(rng)?).clone();
    history.record(folder, &picked);
    Some(picked)
}
