//! Score-tier evaluation and result-message selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Phrase, ScoreResult, ScoreTier};

/// Evaluate a finished session.
///
/// Pass tier picks a praise phrase uniformly at random — variety is the
/// reward for clearing the threshold. Encourage tier always uses the one
/// fixed phrase. The asymmetry is deliberate; do not "fix" it.
pub fn evaluate<R: Rng + ?Sized>(
    correct: usize,
    total: usize,
    threshold: u32,
    praises: &[Phrase],
    encouragement: &Phrase,
    rng: &mut R,
) -> ScoreResult {
    let percentage = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    };

    let tier = if percentage >= threshold {
        ScoreTier::Pass
    } else {
        ScoreTier::Encourage
    };

    let message = match tier {
        ScoreTier::Pass => praises
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| encouragement.clone()),
        ScoreTier::Encourage => encouragement.clone(),
    };

    ScoreResult {
        correct,
        total,
        percentage,
        tier,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn praises() -> Vec<Phrase> {
        ["太好了！", "很棒！", "最棒！"]
            .iter()
            .map(|c| Phrase {
                chinese: (*c).into(),
                pinyin: String::new(),
                japanese: String::new(),
            })
            .collect()
    }

    fn encouragement() -> Phrase {
        Phrase {
            chinese: "加油！".into(),
            pinyin: "jiā yóu!".into(),
            japanese: "頑張って！".into(),
        }
    }

    #[test]
    fn perfect_score_passes() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate(5, 5, 80, &praises(), &encouragement(), &mut rng);
        assert_eq!(result.percentage, 100);
        assert_eq!(result.tier, ScoreTier::Pass);
    }

    #[test]
    fn three_of_five_encourages() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate(3, 5, 80, &praises(), &encouragement(), &mut rng);
        assert_eq!(result.percentage, 60);
        assert_eq!(result.tier, ScoreTier::Encourage);
        assert_eq!(result.message.chinese, "加油！");
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate(4, 5, 80, &praises(), &encouragement(), &mut rng);
        assert_eq!(result.percentage, 80);
        assert_eq!(result.tier, ScoreTier::Pass);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            evaluate(1, 3, 80, &praises(), &encouragement(), &mut rng).percentage,
            33
        );
        assert_eq!(
            evaluate(2, 3, 80, &praises(), &encouragement(), &mut rng).percentage,
            67
        );
    }

    #[test]
    fn pass_message_comes_from_the_pool() {
        let pool = praises();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = evaluate(5, 5, 80, &pool, &encouragement(), &mut rng);
            assert!(pool.contains(&result.message));
        }
    }

    #[test]
    fn encourage_message_is_fixed_regardless_of_seed() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = evaluate(0, 5, 80, &praises(), &encouragement(), &mut rng);
            assert_eq!(result.message, encouragement());
        }
    }

    #[test]
    fn empty_praise_pool_falls_back_to_encouragement() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate(5, 5, 80, &[], &encouragement(), &mut rng);
        assert_eq!(result.tier, ScoreTier::Pass);
        assert_eq!(result.message, encouragement());
    }

    #[test]
    fn zero_total_is_degenerate_not_a_panic() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate(0, 0, 80, &praises(), &encouragement(), &mut rng);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.tier, ScoreTier::Encourage);
    }
}
