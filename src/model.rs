/*!
 * Core transcript data model.
 *
 * A transcript is an ordered sequence of blocks (one spoken line each), and
 * every block carries an ordered sequence of words. Both levels hold an
 * optional playback timestamp; words and blocks without one are editable but
 * flagged invalid for the UI layer.
 */

use chrono::NaiveTime;

/// Smallest timestamp-addressable unit of a block's text.
#[derive(Debug, Clone, Default)]
pub struct Word {
    /// Playback position this word was spoken at, if known
    pub timestamp: Option<NaiveTime>,

    /// The word text, exactly as it appears in the flat buffer
    pub text: String,

    /// Free-form tags attached to the word
    pub tags: Vec<String>,
}

impl Word {
    /// Build a word from its parts.
    pub fn new(timestamp: Option<NaiveTime>, text: impl Into<String>, tags: Vec<String>) -> Self {
        Word {
            timestamp,
            text: text.into(),
            tags,
        }
    }

    /// A word with only text: no timestamp, no tags.
    pub fn plain(text: impl Into<String>) -> Self {
        Word::new(None, text, Vec::new())
    }
}

// Tags are deliberately excluded from word equality.
impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.text == other.text
    }
}

/// One line/utterance of transcript text.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Playback position the line starts at, if known
    pub timestamp: Option<NaiveTime>,

    /// Space-joined text of all words in the block
    pub text: String,

    /// Speaker label, empty when unattributed
    pub speaker: String,

    /// Free-form tags attached to the block
    pub tags: Vec<String>,

    /// Ordered word sequence backing `text`
    pub words: Vec<Word>,
}

// Block tags are excluded from equality, consistent with word equality.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.text == other.text
            && self.speaker == other.speaker
            && self.words == other.words
    }
}

impl Block {
    /// Rebuild `text` from the word sequence. The result is the space-joined,
    /// trimmed concatenation of every word's text.
    pub fn joined_word_text(&self) -> String {
        let joined = self
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        joined.trim().to_string()
    }
}

/// The single source of structured truth: every block of the open transcript,
/// in document order. All mutation goes through an exclusive reference held
/// for the duration of one reconciliation or structural operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptModel {
    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl TranscriptModel {
    /// Create an empty model.
    pub fn new() -> Self {
        TranscriptModel { blocks: Vec::new() }
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True when no transcript content has been loaded or typed yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop every block. Used on transcript close before a wholesale rebuild.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

/// Format an optional timestamp the way the transcript format stores it:
/// `hh:mm:ss.zzz`, or the empty string when absent.
pub fn format_timestamp(timestamp: Option<NaiveTime>) -> String {
    match timestamp {
        Some(t) => t.format("%H:%M:%S%.3f").to_string(),
        None => String::new(),
    }
}
