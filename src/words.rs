use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TypemasterError};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Corpus used when nothing else is requested.
pub const DEFAULT_CORPUS: &str = "english";

/// Appended to every generated word when punctuation is enabled.
pub const PUNCTUATION_SUFFIX: char = ',';

/// Preset session lengths offered on the home screen
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn word_target(&self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 25,
            Difficulty::Hard => 50,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Normal => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Normal,
        }
    }
}

/// Static list of lowercase words to sample from.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub words: Vec<String>,
}

impl Corpus {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Result<Self> {
        let name = name.into();
        if words.is_empty() {
            return Err(TypemasterError::EmptyCorpus(name));
        }
        Ok(Self { name, words })
    }

    /// Load a corpus embedded at build time from `src/lang/<name>.json`.
    pub fn load(name: &str) -> Result<Self> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| TypemasterError::UnknownCorpus(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| TypemasterError::UnknownCorpus(name.to_string()))?;
        Self::from_json(name, contents)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let corpus: Corpus =
            serde_json::from_str(json).map_err(|source| TypemasterError::CorpusFormat {
                name: name.to_string(),
                source,
            })?;
        Self::new(corpus.name, corpus.words)
    }

    pub fn english() -> Result<Self> {
        Self::load(DEFAULT_CORPUS)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Builds the target word list for a session
#[derive(Debug, Clone)]
pub struct WordGenerator {
    corpus: Corpus,
    punctuation: bool,
}

impl WordGenerator {
    pub fn new(corpus: Corpus, punctuation: bool) -> Self {
        Self {
            corpus,
            punctuation,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn punctuation(&self) -> bool {
        self.punctuation
    }

    pub fn generate(&self, count: usize) -> Vec<String> {
        self.generate_with(count, &mut rand::thread_rng())
    }

    /// Uniform sampling with replacement, so words may repeat.
    pub fn generate_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        let words: Vec<String> = (0..count)
            .filter_map(|_| self.corpus.words.choose(&mut *rng))
            .map(|word| {
                if self.punctuation {
                    format!("{word}{PUNCTUATION_SUFFIX}")
                } else {
                    word.clone()
                }
            })
            .collect();

        debug!(
            corpus = %self.corpus.name,
            count = words.len(),
            punctuation = self.punctuation,
            "generated word list"
        );
        words
    }
}
