/*!
 * Editing session orchestration.
 *
 * An [`EditorSession`] owns the transcript model, the flat line buffer the
 * UI edits, the dictionary, and the playback tracker, and routes every
 * notification between them: buffer edits run through reconciliation,
 * playback updates through the tracker, and structural operations rewrite
 * the buffer from the model under a re-entrancy guard so the rewrite is not
 * itself reconciled. Everything the excluded UI layer needs to hear is
 * queued as an [`EditorEvent`] for the caller to drain.
 */

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use log::info;

use crate::app_config::Config;
use crate::dictionary::{DictionaryValidator, MarkOutcome, ValiditySweep};
use crate::errors::EditorError;
use crate::line_parser::parse_line;
use crate::model::TranscriptModel;
use crate::playback::{nearest_timestamp_before, ActivePosition, PlaybackTracker};
use crate::reconcile::{self, BufferChange};
use crate::structural;
use crate::transliterate::{SuggestionReply, TransliterationClient};

/// Signal queued for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Human-readable status text
    Message(String),
    /// The media player should seek to this position
    JumpToPlayer(NaiveTime),
    /// The tag list of the block under the cursor changed
    RefreshTagList(Vec<String>),
    /// The playback-active block and/or word changed
    ActiveChanged {
        block: Option<usize>,
        word: Option<usize>,
    },
    /// Transliteration candidates arrived
    SuggestionsReady(Vec<String>),
    /// The transliteration lookup timed out
    SuggestionsTimedOut,
}

/// Direction of a block-level jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDirection {
    Up,
    Down,
}

/// Direction of a word-level jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
}

/// One transcript editing session.
pub struct EditorSession {
    config: Config,
    model: TranscriptModel,
    buffer: Vec<String>,
    transcript_path: Option<PathBuf>,
    language: String,
    dictionary: DictionaryValidator,
    tracker: PlaybackTracker,
    transliteration: TransliterationClient,
    validity: ValiditySweep,
    setting_content: bool,
    events: Vec<EditorEvent>,
}

impl EditorSession {
    /// Start an empty session: one empty line, the configured language's
    /// dictionary loaded.
    pub fn new(config: Config) -> Self {
        let language = config.transcript_language.clone();
        let dictionary =
            DictionaryValidator::load(&config.dictionary_dir, &config.corrected_words_dir, &language);
        let transliteration = TransliterationClient::new(config.reply_timeout_ms);

        let mut session = EditorSession {
            config,
            model: TranscriptModel::new(),
            buffer: vec![String::new()],
            transcript_path: None,
            language,
            dictionary,
            tracker: PlaybackTracker::new(),
            transliteration,
            validity: ValiditySweep::default(),
            setting_content: false,
            events: Vec::new(),
        };
        session.model.blocks.push(parse_line(""));
        session
    }

    /// The structured model.
    pub fn model(&self) -> &TranscriptModel {
        &self.model
    }

    /// The flat buffer, one entry per line.
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    /// Last published playback position.
    pub fn active_position(&self) -> ActivePosition {
        self.tracker.position()
    }

    /// Latest invalid-block/invalid-word sweep.
    pub fn validity(&self) -> &ValiditySweep {
        &self.validity
    }

    /// Active transcript language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Path of the open transcript, if any.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript_path.as_deref()
    }

    /// Drain the queued UI events.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    // ---- transcript lifecycle -------------------------------------------

    /// Open a transcript file. On any failure the previous model, buffer and
    /// language are retained.
    pub fn open(&mut self, path: &Path) -> Result<(), EditorError> {
        let xml = match fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(e) => {
                self.emit(EditorEvent::Message(e.to_string()));
                return Err(EditorError::Io(e));
            }
        };

        let (model, language) = match crate::xml_codec::decode(&xml) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.emit(EditorEvent::Message(e.to_string()));
                return Err(e);
            }
        };

        self.model = model;
        self.transcript_path = Some(path.to_path_buf());
        self.language = if language.is_empty() {
            self.config.transcript_language.clone()
        } else {
            language
        };
        self.reload_dictionary();
        self.tracker.reset();
        self.set_content();

        self.emit(EditorEvent::Message(format!(
            "Opened transcript {} Language: {}",
            path.display(),
            self.language
        )));
        Ok(())
    }

    /// Save to the currently open path.
    pub fn save(&mut self) -> Result<(), EditorError> {
        let Some(path) = self.transcript_path.clone() else {
            self.emit(EditorEvent::Message("No file open".to_string()));
            return Err(EditorError::Validation("No file open".to_string()));
        };
        self.save_as(&path)
    }

    /// Save to `path` and adopt it as the session's transcript path.
    pub fn save_as(&mut self, path: &Path) -> Result<(), EditorError> {
        let xml = crate::xml_codec::encode(&self.model, &self.language)?;
        if let Err(e) = fs::write(path, xml) {
            self.emit(EditorEvent::Message(e.to_string()));
            return Err(EditorError::Io(e));
        }
        self.transcript_path = Some(path.to_path_buf());
        self.emit(EditorEvent::Message(format!("File Saved {}", path.display())));
        Ok(())
    }

    /// Close the open transcript and reset to an empty session.
    pub fn close(&mut self) {
        let Some(path) = self.transcript_path.take() else {
            self.emit(EditorEvent::Message("No file open".to_string()));
            return;
        };
        self.emit(EditorEvent::Message(format!(
            "Closing file {}",
            path.display()
        )));

        self.model.clear();
        self.buffer = vec![String::new()];
        self.language = self.config.transcript_language.clone();
        self.reload_dictionary();
        self.tracker.reset();
        self.validity = ValiditySweep::default();
    }

    fn reload_dictionary(&mut self) {
        self.dictionary = DictionaryValidator::load(
            &self.config.dictionary_dir,
            &self.config.corrected_words_dir,
            &self.language,
        );
        self.validity = self.dictionary.sweep(&self.model);
    }

    /// Switch the transcript language and reload the dictionary.
    pub fn change_language(&mut self, language: &str) {
        self.language = language.to_lowercase();
        self.reload_dictionary();
    }

    // ---- buffer reconciliation ------------------------------------------

    /// Rewrite the flat buffer from the model. Reconciliation is suppressed
    /// for the duration; the buffer is programmatic output, not an edit.
    pub fn set_content(&mut self) {
        if self.setting_content {
            return;
        }
        self.setting_content = true;
        self.buffer = structural::render_content(&self.model);
        self.validity = self.dictionary.sweep(&self.model);
        self.setting_content = false;
    }

    /// Entry point for "buffer changed" notifications from the editing
    /// surface. `new_text` is the whole buffer after the edit.
    pub fn content_changed(&mut self, new_text: &str, cursor_block: usize, change: BufferChange) {
        if self.setting_content {
            return;
        }
        self.buffer = new_text.split('\n').map(str::to_string).collect();
        reconcile::apply_change(&mut self.model, &self.buffer, cursor_block, &change);
        self.validity = self.dictionary.sweep(&self.model);
    }

    /// Cursor moved to another block; republish that block's tag list.
    pub fn cursor_moved(&mut self, cursor_block: usize) {
        if let Some(block) = self.model.blocks.get(cursor_block) {
            let tags = block.tags.clone();
            self.emit(EditorEvent::RefreshTagList(tags));
        }
    }

    // ---- playback --------------------------------------------------------

    /// Playback clock update. Publishes an [`EditorEvent::ActiveChanged`]
    /// only when the active block or word index actually changed.
    pub fn elapsed_time_changed(&mut self, elapsed: NaiveTime) {
        if let Some(position) = self.tracker.update(&self.model, elapsed) {
            self.emit(EditorEvent::ActiveChanged {
                block: position.block,
                word: position.word,
            });
        }
    }

    // ---- structural operations ------------------------------------------

    /// Split the cursor's block at `position_in_block`, stamping the left
    /// half with the playback clock. Requires the cursor to be on the
    /// playback-active block; otherwise a silent no-op.
    pub fn split_line(&mut self, cursor_block: usize, position_in_block: usize, elapsed: NaiveTime) {
        if self.tracker.position().block != Some(cursor_block) {
            return;
        }
        if structural::split_line(&mut self.model, cursor_block, position_in_block, Some(elapsed)) {
            self.set_content();
        }
    }

    /// Merge the cursor's block into the previous one (same speaker only).
    pub fn merge_up(&mut self, cursor_block: usize) {
        if structural::merge_up(&mut self.model, cursor_block) {
            self.set_content();
        }
    }

    /// Merge the cursor's block into the next one (same speaker only).
    pub fn merge_down(&mut self, cursor_block: usize) {
        if structural::merge_down(&mut self.model, cursor_block) {
            self.set_content();
        }
    }

    /// Shift timestamps over a 1-based inclusive block range.
    pub fn propagate_time(
        &mut self,
        delta: Option<NaiveTime>,
        start: usize,
        end: usize,
        negate: bool,
    ) -> Result<(), EditorError> {
        match structural::propagate_time(&mut self.model, delta, start, end, negate) {
            Ok(()) => {
                self.set_content();
                Ok(())
            }
            Err(e) => {
                self.emit(EditorEvent::Message(e.to_string()));
                Err(e)
            }
        }
    }

    /// Stamp the cursor's block with the playback clock.
    pub fn insert_timestamp(&mut self, cursor_block: usize, elapsed: NaiveTime) {
        if structural::insert_timestamp(&mut self.model, cursor_block, elapsed) {
            self.set_content();
        }
    }

    /// Change the speaker of the cursor's block, or of all blocks sharing it.
    pub fn change_speaker(&mut self, cursor_block: usize, new_speaker: &str, replace_all: bool) {
        if structural::change_speaker(&mut self.model, cursor_block, new_speaker, replace_all) {
            self.set_content();
        }
    }

    /// Replace the cursor block's tag list.
    pub fn select_tags(&mut self, cursor_block: usize, tags: Vec<String>) {
        if structural::select_tags(&mut self.model, cursor_block, tags.clone()) {
            self.emit(EditorEvent::RefreshTagList(tags));
        }
    }

    // ---- dictionary ------------------------------------------------------

    /// Add the word at (block, word) to the dictionary and the
    /// corrected-words file.
    pub fn mark_word_as_correct(&mut self, block_idx: usize, word_idx: usize) {
        let Some(text) = self
            .model
            .blocks
            .get(block_idx)
            .and_then(|b| b.words.get(word_idx))
            .map(|w| w.text.clone())
        else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }

        match self.dictionary.mark_correct(&text) {
            Ok(MarkOutcome::AlreadyCorrect) => {
                self.emit(EditorEvent::Message("Word is already correct.".to_string()));
            }
            Ok(MarkOutcome::Added) => {
                self.validity = self.dictionary.sweep(&self.model);
            }
            Err(_) => {
                self.emit(EditorEvent::Message(
                    "Couldn't write corrected words to file.".to_string(),
                ));
            }
        }
    }

    // ---- navigation ------------------------------------------------------

    /// Jump the player to the word under the cursor: the nearest earlier
    /// timestamped word in the block, falling back to the nearest earlier
    /// timestamped block. No-op when the cursor's block has no timestamp.
    pub fn jump_to_player(&mut self, cursor_block: usize, position_in_block: usize) {
        let Some(block) = self.model.blocks.get(cursor_block).cloned() else {
            return;
        };
        if block.timestamp.is_none() {
            return;
        }

        let line = self.buffer.get(cursor_block).cloned().unwrap_or_default();
        let position = position_in_block.min(line.len());
        let before = if line.is_char_boundary(position) {
            &line[..position]
        } else {
            ""
        };

        let mut word_number = before.matches(' ').count() as isize;
        if !block.speaker.is_empty() || line.contains("[]:") {
            word_number -= 1;
        }

        let time_to_jump = nearest_timestamp_before(&self.model, cursor_block);

        if word_number >= 0 && (word_number as usize) < block.words.len() {
            let word_number = word_number as usize;
            if block.words[word_number].timestamp.is_some() {
                for word in block.words[..word_number].iter().rev() {
                    if let Some(t) = word.timestamp {
                        self.emit(EditorEvent::JumpToPlayer(t));
                        return;
                    }
                }
            }
        }

        self.emit(EditorEvent::JumpToPlayer(time_to_jump));
    }

    /// Jump to the nearest block, above or below the active one, with the
    /// same speaker.
    pub fn speaker_wise_jump(&mut self, direction: VerticalDirection) {
        // The tracker's index can be stale after a structural edit
        let position = self.tracker.position().block;
        let Some((active, block)) = position.and_then(|i| self.model.blocks.get(i).map(|b| (i, b)))
        else {
            self.emit(EditorEvent::Message("Highlighted block not present".to_string()));
            return;
        };

        let speaker = &block.speaker;
        let target = match direction {
            VerticalDirection::Up => self.model.blocks[..active]
                .iter()
                .rposition(|b| &b.speaker == speaker),
            VerticalDirection::Down => self.model.blocks[active + 1..]
                .iter()
                .position(|b| &b.speaker == speaker)
                .map(|i| active + 1 + i),
        };

        let Some(target) = target else {
            self.emit(EditorEvent::Message("Couldn't find a block to jump".to_string()));
            return;
        };

        let time = nearest_timestamp_before(&self.model, target);
        self.emit(EditorEvent::JumpToPlayer(time));
    }

    /// Jump one word left or right of the active word.
    pub fn word_wise_jump(&mut self, direction: HorizontalDirection) {
        let position = self.tracker.position();
        let block = position
            .block
            .and_then(|i| self.model.blocks.get(i).map(|b| (i, b)));
        let (Some((active_block, block)), Some(active_word)) = (block, position.word) else {
            self.emit(EditorEvent::Message(
                "Highlighted block or word not present".to_string(),
            ));
            return;
        };

        let words = &block.words;
        let target = match direction {
            HorizontalDirection::Left => active_word.checked_sub(1),
            HorizontalDirection::Right => Some(active_word + 1),
        };
        let Some(target) = target.filter(|t| *t < words.len()) else {
            self.emit(EditorEvent::Message("Can't jump, end of block reached!".to_string()));
            return;
        };

        let time_to_jump = match direction {
            HorizontalDirection::Left => {
                if target == 0 {
                    Some(nearest_timestamp_before(&self.model, active_block))
                } else {
                    words[..target].iter().rev().find_map(|w| w.timestamp)
                }
            }
            HorizontalDirection::Right => words[target - 1].timestamp,
        };

        match time_to_jump {
            Some(t) => self.emit(EditorEvent::JumpToPlayer(t)),
            None => self.emit(EditorEvent::Message(
                "Couldn't find a word to jump to".to_string(),
            )),
        }
    }

    /// Jump one block above or below the active block.
    pub fn block_wise_jump(&mut self, direction: VerticalDirection) {
        let Some(active) = self.tracker.position().block else {
            return;
        };

        let time = match direction {
            VerticalDirection::Up => {
                let Some(target) = active.checked_sub(1) else {
                    return;
                };
                nearest_timestamp_before(&self.model, target)
            }
            VerticalDirection::Down => {
                if active + 1 >= self.model.block_count() {
                    return;
                }
                match self.model.blocks[active].timestamp {
                    Some(t) => t,
                    None => return,
                }
            }
        };
        self.emit(EditorEvent::JumpToPlayer(time));
    }

    // ---- transliteration -------------------------------------------------

    /// Fetch transliteration suggestions for the word being typed. Degrades
    /// to an empty candidate list with a timeout event when the service does
    /// not answer in time.
    pub async fn lookup_suggestions(&mut self, input: &str) -> Vec<String> {
        let lang = self.config.transliteration_language.clone();
        match self.transliteration.lookup(input, &lang).await {
            Ok(SuggestionReply::Suggestions(candidates)) => {
                info!("{} suggestion(s) for {:?}", candidates.len(), input);
                self.emit(EditorEvent::SuggestionsReady(candidates.clone()));
                candidates
            }
            Ok(SuggestionReply::TimedOut) => {
                self.emit(EditorEvent::Message(
                    "Reply Timeout, Network Connection is slow or inaccessible".to_string(),
                ));
                self.emit(EditorEvent::SuggestionsTimedOut);
                Vec::new()
            }
            Err(e) => {
                self.emit(EditorEvent::Message(e.to_string()));
                Vec::new()
            }
        }
    }
}
