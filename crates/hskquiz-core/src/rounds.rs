//! Per-round question drawing and answer-choice construction.
//!
//! Both operations take an injectable random source so tests can force
//! deterministic orderings, and both degrade instead of failing: a short
//! set yields fewer questions, and a choice set that cannot find enough
//! unique distractors escalates to the whole store and finally pads with
//! placeholders. Every degradation is reported through the diagnostic sink.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::model::{ChoiceSet, VocabEntry, VocabSet};

/// Options presented per round.
pub const CHOICES_PER_ROUND: usize = 4;
/// Incorrect options per round.
pub const DISTRACTORS_PER_ROUND: usize = CHOICES_PER_ROUND - 1;

/// Draw `count` distinct entries from a set, uniformly without replacement.
///
/// If the set is smaller than `count`, every entry is returned (still
/// shuffled, still no duplicates) and a `QuestionShortfall` is recorded.
pub fn draw_questions<R: Rng + ?Sized>(
    set: &VocabSet,
    count: usize,
    rng: &mut R,
    sink: &dyn DiagnosticSink,
) -> Vec<VocabEntry> {
    if set.entries.len() < count {
        tracing::warn!(
            set = %set.name,
            requested = count,
            available = set.entries.len(),
            "vocabulary set cannot fill the requested round count"
        );
        sink.record(DiagnosticEvent::QuestionShortfall {
            set: set.name.clone(),
            requested: count,
            available: set.entries.len(),
        });
    }

    let mut entries = set.entries.clone();
    entries.shuffle(rng);
    entries.truncate(count);
    entries
}

/// Build the four answer candidates for one round.
///
/// `set_pool` is the level's own vocabulary; `escalation_pool` is the whole
/// store, consulted only when the set cannot supply three unique distractor
/// glosses. The call never fails: in the worst case the remaining slots are
/// positional placeholders.
pub fn build_choice_set<R: Rng + ?Sized>(
    correct: &VocabEntry,
    set_pool: &[&VocabEntry],
    escalation_pool: &[&VocabEntry],
    rng: &mut R,
    sink: &dyn DiagnosticSink,
) -> ChoiceSet {
    let mut distractors: Vec<String> = Vec::with_capacity(DISTRACTORS_PER_ROUND);

    pick_distractors(&correct.japanese, set_pool, &mut distractors, rng);

    if distractors.len() < DISTRACTORS_PER_ROUND {
        tracing::warn!(
            correct = %correct.japanese,
            found = distractors.len(),
            "level set short on unique distractors, escalating to all sets"
        );
        sink.record(DiagnosticEvent::DistractorShortfall {
            needed: DISTRACTORS_PER_ROUND,
            found: distractors.len(),
        });
        pick_distractors(&correct.japanese, escalation_pool, &mut distractors, rng);
    }

    if distractors.len() < DISTRACTORS_PER_ROUND {
        let placeholders = DISTRACTORS_PER_ROUND - distractors.len();
        tracing::warn!(
            correct = %correct.japanese,
            placeholders,
            "padding choice set with placeholders; vocabulary data is too small"
        );
        sink.record(DiagnosticEvent::ChoicePadding { placeholders });
        while distractors.len() < DISTRACTORS_PER_ROUND {
            // Label by the slot's position in the final four-option list,
            // where slot 1 is the correct answer.
            distractors.push(format!("Option {}", distractors.len() + 2));
        }
    }

    // Distractors arrive in random pick order; a uniformly random insertion
    // point for the correct answer makes the whole layout uniform.
    let correct_index = rng.gen_range(0..CHOICES_PER_ROUND);
    let mut options = distractors;
    options.insert(correct_index, correct.japanese.clone());

    ChoiceSet {
        options,
        correct_index,
    }
}

/// Greedily pick unique distractor glosses from a shuffled pool.
///
/// Bounded by `2 × pool-size` attempts so heavily duplicated glosses cannot
/// loop forever. Glosses equal to the correct answer, already chosen, or
/// empty are skipped.
fn pick_distractors<R: Rng + ?Sized>(
    correct_gloss: &str,
    pool: &[&VocabEntry],
    chosen: &mut Vec<String>,
    rng: &mut R,
) {
    let mut candidates: Vec<&VocabEntry> = pool
        .iter()
        .copied()
        .filter(|entry| !entry.japanese.is_empty() && entry.japanese != correct_gloss)
        .collect();
    candidates.shuffle(rng);

    let max_attempts = candidates.len() * 2;
    let mut attempts = 0;

    for entry in &candidates {
        if chosen.len() >= DISTRACTORS_PER_ROUND || attempts >= max_attempts {
            break;
        }
        attempts += 1;

        if !chosen.iter().any(|gloss| gloss == &entry.japanese) {
            chosen.push(entry.japanese.clone());
        }
    }
}
