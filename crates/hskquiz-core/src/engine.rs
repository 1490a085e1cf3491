//! Central quiz-session engine.
//!
//! Owns the single active session and reacts to discrete front-end calls:
//! start a level, submit an answer, handle a timer expiry, jump to the
//! paired level. All randomness flows through one injectable source, and
//! all file/audio I/O goes through collaborator traits, so the engine never
//! blocks its caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::catalog::{LevelCatalog, VocabularyStore};
use crate::config::QuizConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, NoopSink};
use crate::error::QuizError;
use crate::model::{ChoiceSet, LevelConfig, QuestionKind, ScoreResult, ScoreTier, VocabEntry};
use crate::reward::{self, RewardHistory};
use crate::rounds;
use crate::scoring;
use crate::timers::{TimerFire, TimerKind, TimerSet};
use crate::traits::{AssetResolver, AudioPlayer};

/// Delay before an audio round speaks its prompt.
const AUTO_PLAY_DELAY: Duration = Duration::from_millis(500);
/// Delay between revealing correctness and presenting the next round.
const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(2000);

/// Externally visible session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    Completed,
}

/// Progress counters shown alongside every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Rounds already answered.
    pub current: usize,
    /// Rounds in the session.
    pub total: usize,
    /// Correct answers so far.
    pub correct: usize,
}

/// How the front-end should present a round's prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoundPrompt {
    /// Show the characters and their pinyin.
    Text { chinese: String, pinyin: String },
    /// Trigger audio playback; the characters stay hidden.
    Audio,
}

/// Everything the front-end needs to present one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub level: u32,
    pub level_name: String,
    pub prompt: RoundPrompt,
    /// The four choice strings in display order.
    pub choices: Vec<String>,
    pub progress: Progress,
}

/// Result of one accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Where the right answer sits, for highlighting.
    pub correct_index: usize,
    pub progress: Progress,
    /// True when this answer completed the session.
    pub finished: bool,
}

/// What a fresh timer fire asked the front-end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Present this round now.
    NextRound(RoundView),
    /// Audio playback for the current round was started.
    AudioStarted,
}

/// Final outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub score: ScoreResult,
    /// Resolved reward image, or `None` when the folder had nothing to show.
    pub reward_asset: Option<String>,
    /// Shortcut target for the "same words, other modality" button.
    pub paired_level: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

struct Session {
    id: Uuid,
    level: LevelConfig,
    questions: Vec<VocabEntry>,
    current: usize,
    correct: usize,
    choices: ChoiceSet,
}

struct FinishedSession {
    level: u32,
    score: ScoreResult,
    completed_at: DateTime<Utc>,
}

enum SessionState {
    Idle,
    Active(Session),
    Completed(FinishedSession),
}

/// The quiz-session engine.
pub struct QuizEngine {
    catalog: LevelCatalog,
    store: VocabularyStore,
    config: QuizConfig,
    assets: Arc<dyn AssetResolver>,
    audio: Arc<dyn AudioPlayer>,
    sink: Arc<dyn DiagnosticSink>,
    rng: Box<dyn RngCore + Send>,
    history: RewardHistory,
    timers: TimerSet,
    state: SessionState,
}

impl QuizEngine {
    /// Engine with entropy-seeded randomness and no diagnostic sink.
    pub fn new(
        config: QuizConfig,
        assets: Arc<dyn AssetResolver>,
        audio: Arc<dyn AudioPlayer>,
    ) -> (Self, UnboundedReceiver<TimerFire>) {
        Self::with_parts(
            config,
            assets,
            audio,
            Arc::new(NoopSink),
            Box::new(StdRng::from_entropy()),
        )
    }

    /// Fully injectable constructor for tests and reproducible sessions.
    pub fn with_parts(
        config: QuizConfig,
        assets: Arc<dyn AssetResolver>,
        audio: Arc<dyn AudioPlayer>,
        sink: Arc<dyn DiagnosticSink>,
        rng: Box<dyn RngCore + Send>,
    ) -> (Self, UnboundedReceiver<TimerFire>) {
        let (timers, fires) = TimerSet::new();
        let engine = Self {
            catalog: LevelCatalog::from_config(&config),
            store: VocabularyStore::from_config(&config),
            config,
            assets,
            audio,
            sink,
            rng,
            history: RewardHistory::new(),
            timers,
            state: SessionState::Idle,
        };
        (engine, fires)
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Active(_) => SessionPhase::Active,
            SessionState::Completed(_) => SessionPhase::Completed,
        }
    }

    /// Start a session on the given level.
    ///
    /// On any error the previous session state is left untouched.
    pub fn start_level(&mut self, level_id: u32) -> Result<RoundView, QuizError> {
        let level = self
            .catalog
            .level(level_id)
            .cloned()
            .ok_or(QuizError::UnknownLevel(level_id))?;
        let set = self
            .store
            .set(&level.set)
            .ok_or_else(|| QuizError::UnknownSet(level.set.clone()))?;
        if set.entries.is_empty() {
            return Err(QuizError::EmptySet(level.set.clone()));
        }

        let count = self.catalog.questions_for(&level);
        let questions = rounds::draw_questions(set, count, &mut *self.rng, self.sink.as_ref());
        let Some(first) = questions.first() else {
            return Err(QuizError::EmptySet(level.set.clone()));
        };

        let choices = next_choice_set(
            &self.store,
            &level.set,
            first,
            &mut *self.rng,
            self.sink.as_ref(),
        );

        self.timers.cancel_all();
        let session = Session {
            id: Uuid::new_v4(),
            level,
            questions,
            current: 0,
            correct: 0,
            choices,
        };
        if session.level.kind == QuestionKind::Audio {
            self.timers
                .schedule(TimerKind::AutoPlay, AUTO_PLAY_DELAY, session.id, 0);
        }

        tracing::info!(level = level_id, rounds = session.questions.len(), "session started");
        let view = view_of(&session);
        self.state = SessionState::Active(session);
        Ok(view)
    }

    /// Submit the player's answer for the current round.
    ///
    /// Returns `None` — a deliberate no-op, not an error — outside an active
    /// session or for an out-of-range index, so duplicate or late UI events
    /// can never corrupt the score.
    pub fn submit_answer(&mut self, choice: usize) -> Option<AnswerFeedback> {
        if choice >= rounds::CHOICES_PER_ROUND {
            tracing::debug!(choice, "out-of-range answer ignored");
            return None;
        }
        let SessionState::Active(session) = &mut self.state else {
            tracing::debug!("answer submitted outside an active session, ignored");
            return None;
        };

        self.timers.cancel_all();

        let correct_index = session.choices.correct_index;
        let correct = choice == correct_index;
        if correct {
            session.correct += 1;
        }
        session.current += 1;

        let progress = Progress {
            current: session.current,
            total: session.questions.len(),
            correct: session.correct,
        };

        if session.current >= session.questions.len() {
            let score = scoring::evaluate(
                session.correct,
                session.questions.len(),
                self.config.pass_threshold,
                &self.config.praises,
                &self.config.encouragement,
                &mut *self.rng,
            );
            let level_id = session.level.id;
            tracing::info!(
                level = level_id,
                percentage = score.percentage,
                tier = %score.tier,
                "session completed"
            );
            self.state = SessionState::Completed(FinishedSession {
                level: level_id,
                score,
                completed_at: Utc::now(),
            });
            return Some(AnswerFeedback {
                correct,
                correct_index,
                progress,
                finished: true,
            });
        }

        // Build the next round's choices now; the front-end reveals them
        // when the auto-advance timer fires.
        session.choices = next_choice_set(
            &self.store,
            &session.level.set,
            &session.questions[session.current],
            &mut *self.rng,
            self.sink.as_ref(),
        );
        let (session_id, round) = (session.id, session.current);
        self.timers
            .schedule(TimerKind::AutoAdvance, AUTO_ADVANCE_DELAY, session_id, round);

        Some(AnswerFeedback {
            correct,
            correct_index,
            progress,
            finished: false,
        })
    }

    /// React to a timer expiry delivered by the front-end.
    ///
    /// Fires carrying a session id or round index that no longer matches the
    /// engine's state are dropped: they belong to a superseded session.
    pub fn handle_timer(&mut self, fire: TimerFire) -> Option<TimerAction> {
        let SessionState::Active(session) = &mut self.state else {
            tracing::debug!(?fire, "timer fired with no active session, ignored");
            return None;
        };
        if fire.session != session.id || fire.round != session.current {
            tracing::debug!(?fire, "stale timer fire ignored");
            return None;
        }

        match fire.kind {
            TimerKind::AutoPlay => {
                let text = session.questions[session.current].chinese.clone();
                self.spawn_audio(text);
                Some(TimerAction::AudioStarted)
            }
            TimerKind::AutoAdvance => {
                let view = view_of(session);
                let (id, round, kind) = (session.id, session.current, session.level.kind);
                if kind == QuestionKind::Audio {
                    self.timers
                        .schedule(TimerKind::AutoPlay, AUTO_PLAY_DELAY, id, round);
                }
                Some(TimerAction::NextRound(view))
            }
        }
    }

    /// Replay the current audio round's prompt on demand.
    pub fn play_prompt_audio(&self) {
        if let SessionState::Active(session) = &self.state {
            if session.level.kind == QuestionKind::Audio {
                self.spawn_audio(session.questions[session.current].chinese.clone());
            }
        }
    }

    /// The round currently awaiting an answer.
    pub fn current_round(&self) -> Option<RoundView> {
        match &self.state {
            SessionState::Active(session) => Some(view_of(session)),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        match &self.state {
            SessionState::Active(session) => Some(Progress {
                current: session.current,
                total: session.questions.len(),
                correct: session.correct,
            }),
            _ => None,
        }
    }

    /// The level the engine is playing or just finished.
    pub fn current_level(&self) -> Option<u32> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Active(session) => Some(session.level.id),
            SessionState::Completed(finished) => Some(finished.level),
        }
    }

    /// The current level's paired companion, if configured.
    pub fn paired_level(&self) -> Option<u32> {
        self.catalog.paired_level(self.current_level()?)
    }

    /// Restart the current level from scratch.
    pub fn retry_level(&mut self) -> Option<RoundView> {
        let level = self.current_level()?;
        // The level came out of the catalog, so this cannot fail.
        self.start_level(level).ok()
    }

    /// Jump to the paired level (same words, other modality).
    pub fn start_paired_level(&mut self) -> Option<RoundView> {
        let paired = self.paired_level()?;
        self.start_level(paired).ok()
    }

    /// Abandon the session and return to level selection.
    pub fn return_to_selection(&mut self) {
        self.timers.cancel_all();
        self.state = SessionState::Idle;
    }

    /// The completed session's score, reward image, and paired-level
    /// shortcut. `None` unless the session is in the Completed phase.
    pub async fn final_result(&mut self) -> Option<SessionOutcome> {
        let SessionState::Completed(finished) = &self.state else {
            return None;
        };
        let score = finished.score.clone();
        let level = finished.level;
        let completed_at = finished.completed_at;

        let folder = match score.tier {
            ScoreTier::Pass => self.config.rewards.pass.clone(),
            ScoreTier::Encourage => self.config.rewards.encourage.clone(),
        };
        let candidates = match self.assets.list_assets(&folder).await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(folder = %folder, "asset enumeration failed: {e:#}");
                self.sink.record(DiagnosticEvent::AssetResolutionFailed {
                    folder: folder.clone(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };
        let reward_asset = reward::select(&mut *self.rng, &mut self.history, &folder, &candidates);

        Some(SessionOutcome {
            score,
            reward_asset,
            paired_level: self.catalog.paired_level(level),
            completed_at,
        })
    }

    fn spawn_audio(&self, text: String) {
        let audio = Arc::clone(&self.audio);
        tokio::spawn(async move {
            if let Err(e) = audio.speak(&text).await {
                tracing::warn!("audio playback failed: {e:#}");
            }
        });
    }
}

fn view_of(session: &Session) -> RoundView {
    let question = &session.questions[session.current];
    let prompt = match session.level.kind {
        QuestionKind::Text => RoundPrompt::Text {
            chinese: question.chinese.clone(),
            pinyin: question.pinyin.clone(),
        },
        QuestionKind::Audio => RoundPrompt::Audio,
    };
    RoundView {
        level: session.level.id,
        level_name: session.level.name.clone(),
        prompt,
        choices: session.choices.options.clone(),
        progress: Progress {
            current: session.current,
            total: session.questions.len(),
            correct: session.correct,
        },
    }
}

fn next_choice_set(
    store: &VocabularyStore,
    set_name: &str,
    correct: &VocabEntry,
    rng: &mut (dyn RngCore + Send),
    sink: &dyn DiagnosticSink,
) -> ChoiceSet {
    let set_pool: Vec<&VocabEntry> = store
        .set(set_name)
        .map(|set| set.entries.iter().collect())
        .unwrap_or_default();
    let escalation_pool = store.all_entries();
    rounds::build_choice_set(correct, &set_pool, &escalation_pool, rng, sink)
}
