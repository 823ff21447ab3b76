/*!
 * Dictionary-backed word validation.
 *
 * A sorted wordlist per language, merged with the user's corrected words,
 * answers membership queries in logarithmic time. The result only feeds the
 * UI's invalid-word highlighting; an unknown word is never an error.
 */

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::model::TranscriptModel;

// One trailing punctuation mark is ignored during lookup
const PUNCTUATION: &[char] = &[',', '.', '!', ';', ':'];

/// Outcome of marking a word as correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The word was inserted into the dictionary and the corrected set
    Added,
    /// The word was already known
    AlreadyCorrect,
}

/// Sorted-wordlist membership test for the active language, plus the
/// user-corrected words merged into it.
#[derive(Debug, Default)]
pub struct DictionaryValidator {
    words: Vec<String>,
    corrected: BTreeSet<String>,
    language: String,
    corrected_words_dir: PathBuf,
}

impl DictionaryValidator {
    /// Load the wordlist for `language` from `dictionary_dir` and merge the
    /// corrected-words file from `corrected_words_dir`. Both files are
    /// optional; a missing file yields an empty list.
    pub fn load(dictionary_dir: &Path, corrected_words_dir: &Path, language: &str) -> Self {
        let words = list_from_file(&dictionary_dir.join(format!("{}.txt", language)));

        let mut validator = DictionaryValidator {
            words,
            corrected: BTreeSet::new(),
            language: language.to_string(),
            corrected_words_dir: corrected_words_dir.to_path_buf(),
        };

        let corrected = list_from_file(&validator.corrected_words_path());
        for word in corrected {
            if let Err(pos) = validator.words.binary_search(&word) {
                validator.words.insert(pos, word.clone());
            }
            validator.corrected.insert(word);
        }

        info!(
            "Loaded dictionary for language {} ({} words, {} corrected)",
            language,
            validator.words.len(),
            validator.corrected.len()
        );
        validator
    }

    /// The active language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Lower-case and strip at most one trailing punctuation mark.
    fn lookup_key(word: &str) -> String {
        let mut key = word.to_lowercase();
        if key.ends_with(PUNCTUATION) {
            key.pop();
        }
        key
    }

    /// Membership test: case-folded, one trailing punctuation mark ignored.
    pub fn is_valid(&self, word: &str) -> bool {
        self.words.binary_search(&Self::lookup_key(word)).is_ok()
    }

    /// Insert the lower-cased word into the dictionary and the corrected set,
    /// then rewrite the corrected-words file in full. Returns
    /// [`MarkOutcome::AlreadyCorrect`] without touching anything when the
    /// word is already known.
    pub fn mark_correct(&mut self, word: &str) -> Result<MarkOutcome> {
        let normalized = word.to_lowercase();
        if normalized.trim().is_empty() {
            return Ok(MarkOutcome::AlreadyCorrect);
        }

        match self.words.binary_search(&normalized) {
            Ok(_) => Ok(MarkOutcome::AlreadyCorrect),
            Err(pos) => {
                self.words.insert(pos, normalized.clone());
                self.corrected.insert(normalized.clone());
                self.write_corrected_words()?;

                info!("[Mark As Correct] text: {}", normalized);
                Ok(MarkOutcome::Added)
            }
        }
    }

    fn corrected_words_path(&self) -> PathBuf {
        self.corrected_words_dir
            .join(format!("corrected_words_{}.txt", self.language))
    }

    fn write_corrected_words(&self) -> Result<()> {
        let path = self.corrected_words_path();
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create corrected words file: {}", path.display()))?;
        for word in &self.corrected {
            writeln!(file, "{}", word)?;
        }
        Ok(())
    }

    /// Full sweep of the model: blocks without a timestamp are invalid as a
    /// whole; for the rest, every word missing from the dictionary is
    /// reported as `(block index, word index)`.
    pub fn sweep(&self, model: &TranscriptModel) -> ValiditySweep {
        let mut invalid_blocks = Vec::new();
        let mut invalid_words = Vec::new();

        for (i, block) in model.blocks.iter().enumerate() {
            if block.timestamp.is_none() {
                invalid_blocks.push(i);
                continue;
            }
            for (j, word) in block.words.iter().enumerate() {
                if !self.is_valid(&word.text) {
                    invalid_words.push((i, j));
                }
            }
        }

        ValiditySweep {
            invalid_blocks,
            invalid_words,
        }
    }
}

/// Result of a whole-model validity sweep, consumed by the highlighting UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValiditySweep {
    /// Blocks with no timestamp
    pub invalid_blocks: Vec<usize>,
    /// Out-of-dictionary words as (block index, word index)
    pub invalid_words: Vec<(usize, usize)>,
}

/// Read a plain one-word-per-line file, skipping blank lines. Missing or
/// unreadable files yield an empty list.
pub fn list_from_file(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("Couldn't read word list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
