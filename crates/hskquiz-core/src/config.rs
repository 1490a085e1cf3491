//! Quiz configuration: loading, defaults, and validation.
//!
//! Everything the engine consumes — level table, vocabulary sets, praise
//! pool, threshold, reward folders — is immutable data loaded once at
//! startup, either from a TOML file or from the built-in default scheme.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{LevelConfig, Phrase, QuestionKind, VocabEntry};

/// File name searched in the current directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "hskquiz.toml";

/// Reward image folder per score tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardFolders {
    #[serde(default = "default_pass_folder")]
    pub pass: String,
    #[serde(default = "default_encourage_folder")]
    pub encourage: String,
}

impl Default for RewardFolders {
    fn default() -> Self {
        Self {
            pass: default_pass_folder(),
            encourage: default_encourage_folder(),
        }
    }
}

/// Top-level quiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Game title shown by front-ends.
    #[serde(default = "default_title")]
    pub title: String,
    /// Rounds per session unless a level overrides it.
    #[serde(default = "default_questions")]
    pub questions_per_level: usize,
    /// Percentage at or above which a session lands in the pass tier.
    #[serde(default = "default_threshold")]
    pub pass_threshold: u32,
    /// Reward folders keyed by tier.
    #[serde(default)]
    pub rewards: RewardFolders,
    /// The single fixed phrase for the encourage tier.
    #[serde(default = "default_encouragement")]
    pub encouragement: Phrase,
    /// Praise pool the pass tier picks from at random.
    #[serde(default)]
    pub praises: Vec<Phrase>,
    /// The level table.
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
    /// Vocabulary sets keyed by name.
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<VocabEntry>>,
}

fn default_title() -> String {
    "推しと学ぶ中国語".to_string()
}
fn default_questions() -> usize {
    5
}
fn default_threshold() -> u32 {
    80
}
fn default_pass_folder() -> String {
    "gohoubi_images".to_string()
}
fn default_encourage_folder() -> String {
    "zannen_images".to_string()
}
fn default_encouragement() -> Phrase {
    Phrase {
        chinese: "加油！".into(),
        pinyin: "jiā yóu!".into(),
        japanese: "頑張って！".into(),
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        builtin_config()
    }
}

/// The built-in configuration: six levels over the HSK1–3 starter sets,
/// paired text/audio per set.
pub fn builtin_config() -> QuizConfig {
    // The embedded TOML is covered by a test; a parse failure here is a
    // build defect, not a runtime condition.
    toml::from_str(BUILTIN_CONFIG).expect("built-in config is valid TOML")
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `hskquiz.toml` in the current directory
/// 2. the built-in default scheme
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(DEFAULT_CONFIG_PATH);
        if local.exists() { Some(local) } else { None }
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content, &path)
        }
        None => Ok(builtin_config()),
    }
}

/// Parse a TOML string into a `QuizConfig` (useful for testing).
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<QuizConfig> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))
}

/// A warning from configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The level or set the warning refers to (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a configuration for issues that would degrade quiz quality.
///
/// None of these stop the engine — degraded sessions recover at runtime —
/// but an operator fixing them restores full-quality play.
pub fn validate_config(config: &QuizConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |subject: Option<String>, message: String| {
        warnings.push(ValidationWarning { subject, message });
    };

    if config.levels.is_empty() {
        warn(None, "no levels configured".into());
    }

    // Duplicate level ids
    let mut seen_ids = HashSet::new();
    for level in &config.levels {
        if !seen_ids.insert(level.id) {
            warn(
                Some(format!("level {}", level.id)),
                format!("duplicate level id: {}", level.id),
            );
        }
    }

    // Set references and sizes
    for level in &config.levels {
        let subject = Some(format!("level {}", level.id));
        match config.sets.get(&level.set) {
            None => warn(
                subject,
                format!("references unknown vocabulary set '{}'", level.set),
            ),
            Some(entries) => {
                let count = level.questions.unwrap_or(config.questions_per_level);
                if entries.is_empty() {
                    warn(subject, format!("vocabulary set '{}' is empty", level.set));
                } else if entries.len() < count {
                    warn(
                        subject,
                        format!(
                            "set '{}' has {} entries but {} rounds are requested",
                            level.set,
                            entries.len(),
                            count
                        ),
                    );
                }
            }
        }
    }

    // Pairing must be symmetric and cross-modality over the same set
    for level in &config.levels {
        let Some(paired_id) = level.paired else { continue };
        let subject = Some(format!("level {}", level.id));
        match config.levels.iter().find(|l| l.id == paired_id) {
            None => warn(
                subject,
                format!("paired level {paired_id} does not exist"),
            ),
            Some(paired) => {
                if paired.paired != Some(level.id) {
                    warn(
                        subject.clone(),
                        format!("pairing with level {paired_id} is not symmetric"),
                    );
                }
                if paired.set != level.set {
                    warn(
                        subject.clone(),
                        format!("paired level {paired_id} uses a different set"),
                    );
                }
                if paired.kind == level.kind {
                    warn(
                        subject,
                        format!("paired level {paired_id} uses the same modality"),
                    );
                }
            }
        }
    }

    // Entries every choice set depends on
    let mut glosses = HashSet::new();
    for (set_name, entries) in &config.sets {
        for entry in entries {
            if entry.japanese.is_empty() {
                warn(
                    Some(format!("set {set_name}")),
                    format!("entry '{}' has an empty gloss", entry.id),
                );
            } else {
                glosses.insert(entry.japanese.as_str());
            }
        }
    }
    if glosses.len() < 4 {
        warn(
            None,
            format!(
                "only {} distinct glosses across all sets; choice sets will need placeholders",
                glosses.len()
            ),
        );
    }

    if config.praises.is_empty() {
        warn(
            None,
            "praise pool is empty; pass results will fall back to the encouragement phrase".into(),
        );
    }

    warnings
}

/// The canonical 6-level HSK1–3 scheme with starter vocabulary.
pub const BUILTIN_CONFIG: &str = r#"title = "推しと学ぶ中国語"
questions_per_level = 5
pass_threshold = 80

[rewards]
pass = "gohoubi_images"
encourage = "zannen_images"

[encouragement]
chinese = "加油！"
pinyin = "jiā yóu!"
japanese = "頑張って！"

[[praises]]
chinese = "太好了！"
pinyin = "tài hǎo le!"
japanese = "素晴らしい！"

[[praises]]
chinese = "很棒！"
pinyin = "hěn bàng!"
japanese = "いいね！"

[[praises]]
chinese = "最棒！"
pinyin = "zuì bàng!"
japanese = "最高！"

[[praises]]
chinese = "厉害！"
pinyin = "lì hài!"
japanese = "すごい！"

[[praises]]
chinese = "完美！"
pinyin = "wán měi!"
japanese = "完璧！"

[[levels]]
id = 1
name = "HSK1級-文字"
kind = "text"
set = "hsk1"
paired = 2

[[levels]]
id = 2
name = "HSK1級-音声"
kind = "audio"
set = "hsk1"
paired = 1

[[levels]]
id = 3
name = "HSK2級-文字"
kind = "text"
set = "hsk2"
paired = 4

[[levels]]
id = 4
name = "HSK2級-音声"
kind = "audio"
set = "hsk2"
paired = 3

[[levels]]
id = 5
name = "HSK3級-文字"
kind = "text"
set = "hsk3"
paired = 6

[[levels]]
id = 6
name = "HSK3級-音声"
kind = "audio"
set = "hsk3"
paired = 5

[sets]
hsk1 = [
    { id = "jia", chinese = "家", pinyin = "jiā", japanese = "家", category = "基本" },
    { id = "ren", chinese = "人", pinyin = "rén", japanese = "人", category = "基本" },
    { id = "shui", chinese = "水", pinyin = "shuǐ", japanese = "水", category = "基本" },
    { id = "huo", chinese = "火", pinyin = "huǒ", japanese = "火", category = "基本" },
    { id = "shan", chinese = "山", pinyin = "shān", japanese = "山", category = "基本" },
    { id = "che", chinese = "车", pinyin = "chē", japanese = "車", category = "基本" },
    { id = "shu", chinese = "书", pinyin = "shū", japanese = "本", category = "基本" },
    { id = "dianhua", chinese = "电话", pinyin = "diàn huà", japanese = "電話", category = "基本" },
    { id = "yiyuan", chinese = "医院", pinyin = "yī yuàn", japanese = "病院", category = "基本" },
    { id = "xuexiao", chinese = "学校", pinyin = "xué xiào", japanese = "学校", category = "基本" },
]
hsk2 = [
    { id = "hong", chinese = "红色", pinyin = "hóng sè", japanese = "赤", category = "色" },
    { id = "lan", chinese = "蓝色", pinyin = "lán sè", japanese = "青", category = "色" },
    { id = "huang", chinese = "黄色", pinyin = "huáng sè", japanese = "黄色", category = "色" },
    { id = "lv", chinese = "绿色", pinyin = "lǜ sè", japanese = "緑", category = "色" },
    { id = "bai", chinese = "白色", pinyin = "bái sè", japanese = "白", category = "色" },
    { id = "yi", chinese = "一", pinyin = "yī", japanese = "一", category = "数字" },
    { id = "er", chinese = "二", pinyin = "èr", japanese = "二", category = "数字" },
    { id = "san", chinese = "三", pinyin = "sān", japanese = "三", category = "数字" },
    { id = "si", chinese = "四", pinyin = "sì", japanese = "四", category = "数字" },
    { id = "wu", chinese = "五", pinyin = "wǔ", japanese = "五", category = "数字" },
]
hsk3 = [
    { id = "gou", chinese = "狗", pinyin = "gǒu", japanese = "犬", category = "動物" },
    { id = "mao", chinese = "猫", pinyin = "māo", japanese = "猫", category = "動物" },
    { id = "niao", chinese = "鸟", pinyin = "niǎo", japanese = "鳥", category = "動物" },
    { id = "yu", chinese = "鱼", pinyin = "yú", japanese = "魚", category = "動物" },
    { id = "ma", chinese = "马", pinyin = "mǎ", japanese = "馬", category = "動物" },
    { id = "nihao", chinese = "你好", pinyin = "nǐ hǎo", japanese = "こんにちは", category = "挨拶" },
    { id = "xiexie", chinese = "谢谢", pinyin = "xiè xiè", japanese = "ありがとう", category = "挨拶" },
    { id = "zaijian", chinese = "再见", pinyin = "zài jiàn", japanese = "さようなら", category = "挨拶" },
    { id = "zaoshang", chinese = "早上好", pinyin = "zǎo shàng hǎo", japanese = "おはよう", category = "挨拶" },
    { id = "wanshang", chinese = "晚上好", pinyin = "wǎn shàng hǎo", japanese = "こんばんは", category = "挨拶" },
]
"#;
