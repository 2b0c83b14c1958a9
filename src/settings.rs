//! Engine configuration.
//!
//! Layered like the command line tools: an optional config file, then
//! `SCRABBLE_*` environment variables, then whatever the caller sets on top
//! before deserializing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::evaluator::Weights;
use crate::score_rules::{LetterValues, ScoreRules};
use crate::solver::SearchConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The words that are allowed to be played.
    ///
    /// Either a `.txt` file with one word per line, or a `.fst` file generated
    /// with `make_fst`. Without it the built-in list is used.
    pub dictionary: Option<PathBuf>,

    /// Words tried per anchor and direction
    pub candidate_cap: usize,

    /// Bonus for playing the seven tiles of the rack
    pub bingo_bonus: u32,

    /// Score existing tiles and crossing words too, instead of the new tiles alone
    pub standard_scoring: bool,

    /// How long a caller waits for a decision before passing
    pub decision_budget_ms: u64,

    /// Letter values that differ from the English ones
    pub letter_values: Option<HashMap<char, u32>>,

    pub weights: Weights,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary: None,
            candidate_cap: SearchConfig::default().candidate_cap,
            bingo_bonus: ScoreRules::default().bingo_bonus,
            standard_scoring: false,
            decision_budget_ms: 20_000,
            letter_values: None,
            weights: Weights::default(),
        }
    }
}

impl Settings {
    /// The file and environment layers, open for more overrides
    pub fn layered(config_file: Option<&str>) -> Result<Config, ConfigError> {
        let mut s = Config::new();

        if let Some(f) = config_file {
            s.merge(File::with_name(f))?;
        }

        s.merge(Environment::with_prefix("SCRABBLE").separator("__"))?;
        Ok(s)
    }

    pub fn load(config_file: Option<&str>) -> Result<Settings, ConfigError> {
        Self::from_config(Self::layered(config_file)?)
    }

    pub fn from_config(s: Config) -> Result<Settings, ConfigError> {
        s.try_into()
    }

    pub fn score_rules(&self) -> ScoreRules {
        let values = match &self.letter_values {
            Some(overrides) => LetterValues::with_overrides(overrides),
            None => LetterValues::english(),
        };
        ScoreRules {
            values,
            bingo_bonus: self.bingo_bonus,
            standard_scoring: self.standard_scoring,
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            candidate_cap: self.candidate_cap,
            score_rules: self.score_rules(),
        }
    }

    pub fn decision_budget(&self) -> Duration {
        Duration::from_millis(self.decision_budget_ms)
    }
}

#[cfg(test)]
fn from_toml(text: &str) -> Settings {
    let mut s = Config::new();
    s.merge(File::from_str(text, config::FileFormat::Toml)).unwrap();
    Settings::from_config(s).unwrap()
}

#[test]
fn defaults() {
    let settings = from_toml("");
    assert_eq!(settings.candidate_cap, 50);
    assert_eq!(settings.bingo_bonus, 50);
    assert_eq!(settings.decision_budget(), Duration::from_secs(20));
    assert!(settings.dictionary.is_none());
    assert_eq!(settings.weights, Weights::default());
    assert_eq!(settings.score_rules().values, LetterValues::english());
    assert!(!settings.score_rules().standard_scoring);
}

#[test]
fn file_overrides() {
    let settings = from_toml(
        r#"
        candidate_cap = 10
        bingo_bonus = 35
        standard_scoring = true
        dictionary = "words.fst"

        [letter_values]
        e = 2

        [weights]
        keep_s = 4.0
        "#,
    );
    assert_eq!(settings.candidate_cap, 10);
    assert_eq!(settings.dictionary, Some(PathBuf::from("words.fst")));

    let search = settings.search_config();
    assert_eq!(search.candidate_cap, 10);
    assert_eq!(search.score_rules.bingo_bonus, 35);
    assert!(search.score_rules.standard_scoring);
    assert_eq!(search.score_rules.values.value(crate::Letter(b'e')), 2);
    assert_eq!(search.score_rules.values.value(crate::Letter(b'q')), 10);

    assert_eq!(settings.weights.keep_s, 4.0);
    assert_eq!(settings.weights.keep_blank, Weights::default().keep_blank);
}
