//! The `hskquiz play` command — an interactive terminal session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use hskquiz_core::config::load_config_from;
use hskquiz_core::diagnostics::NoopSink;
use hskquiz_core::engine::{
    QuizEngine, RoundPrompt, RoundView, SessionOutcome, SessionPhase, TimerAction,
};
use hskquiz_core::traits::{AssetResolver, AudioPlayer};
use hskquiz_media::{CommandAudioPlayer, DirAssetResolver, NullAudioPlayer};

pub async fn execute(
    level: Option<u32>,
    config_path: Option<PathBuf>,
    assets: PathBuf,
    seed: Option<u64>,
    no_audio: bool,
    tts: Option<String>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let resolver: Arc<dyn AssetResolver> = Arc::new(DirAssetResolver::new(assets));
    let audio: Arc<dyn AudioPlayer> = if no_audio {
        Arc::new(NullAudioPlayer)
    } else if let Some(command) = tts {
        Arc::new(CommandAudioPlayer::new(command, vec![]))
    } else if cfg!(target_os = "macos") {
        Arc::new(CommandAudioPlayer::macos_say())
    } else {
        Arc::new(CommandAudioPlayer::espeak())
    };
    let rng: Box<dyn RngCore + Send> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    };

    println!("{}", config.title);

    let (mut engine, mut fires) =
        QuizEngine::with_parts(config, resolver, audio, Arc::new(NoopSink), rng);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let level = match level {
        Some(level) => level,
        None => prompt_for_level(&engine, &mut lines).await?,
    };

    let view = engine.start_level(level)?;
    let mut current_choices = view.choices.clone();
    present_round(&view);

    loop {
        tokio::select! {
            Some(fire) = fires.recv() => {
                match engine.handle_timer(fire) {
                    Some(TimerAction::NextRound(view)) => {
                        current_choices = view.choices.clone();
                        present_round(&view);
                    }
                    Some(TimerAction::AudioStarted) | None => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    // stdin closed
                    break;
                };
                match line.trim() {
                    "q" => {
                        engine.return_to_selection();
                        break;
                    }
                    "p" => engine.play_prompt_audio(),
                    input => {
                        if let Ok(number) = input.parse::<usize>() {
                            if let Some(feedback) =
                                engine.submit_answer(number.wrapping_sub(1))
                            {
                                if feedback.correct {
                                    println!("正解！");
                                } else {
                                    println!(
                                        "残念... 正解は「{}」",
                                        current_choices[feedback.correct_index]
                                    );
                                }
                            }
                        }
                    }
                }
                if engine.phase() == SessionPhase::Completed {
                    break;
                }
            }
        }
    }

    if engine.phase() == SessionPhase::Completed {
        let outcome = engine
            .final_result()
            .await
            .context("completed session has a result")?;
        present_outcome(&outcome);
    }

    Ok(())
}

async fn prompt_for_level(
    engine: &QuizEngine,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<u32> {
    for level in engine.catalog().iter() {
        println!("  {}: {}", level.id, level.name);
    }
    println!("レベルを選んでください:");

    let line = lines
        .next_line()
        .await
        .context("failed to read input")?
        .context("no level was chosen")?;
    line.trim()
        .parse()
        .with_context(|| format!("not a level number: {line}"))
}

fn present_round(view: &RoundView) {
    println!();
    println!(
        "{} — 問題 {}/{} (正解 {})",
        view.level_name,
        view.progress.current + 1,
        view.progress.total,
        view.progress.correct
    );
    match &view.prompt {
        RoundPrompt::Text { chinese, pinyin } => println!("  {chinese}  [{pinyin}]"),
        RoundPrompt::Audio => println!("  音声を聞いて答えてね (p でもう一度)"),
    }
    for (i, choice) in view.choices.iter().enumerate() {
        println!("  {}) {}", i + 1, choice);
    }
}

fn present_outcome(outcome: &SessionOutcome) {
    println!();
    println!(
        "最終結果: {}% ({}/{})",
        outcome.score.percentage, outcome.score.correct, outcome.score.total
    );
    println!(
        "{} ({}) — {}",
        outcome.score.message.chinese, outcome.score.message.pinyin, outcome.score.message.japanese
    );
    match &outcome.reward_asset {
        Some(path) => println!("ごほうび画像: {path}"),
        None => println!("ごほうび画像: なし"),
    }
    if let Some(paired) = outcome.paired_level {
        println!("ペアレベルに挑戦: hskquiz play --level {paired}");
    }
}
