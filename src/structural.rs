/*!
 * Structural transcript operations: line split, block merges, bulk time
 * propagation, and the small direct mutations (timestamp insertion, speaker
 * change, tag selection).
 *
 * These operate on the model directly and afterwards the session rewrites
 * the whole flat buffer from the model, with reconciliation suppressed.
 */

use chrono::{Duration, NaiveTime, Timelike};
use log::info;

use crate::errors::EditorError;
use crate::model::{format_timestamp, Block, TranscriptModel, Word};

/// Render one block back into its flat-buffer form:
/// `[speaker]: text [timestamp]`. Both bracket tokens are always present,
/// empty when the field is absent.
pub fn render_block_line(block: &Block) -> String {
    format!(
        "[{}]: {} [{}]",
        block.speaker,
        block.text,
        format_timestamp(block.timestamp)
    )
}

/// Render the whole model into flat buffer lines.
pub fn render_content(model: &TranscriptModel) -> Vec<String> {
    let content = model
        .blocks
        .iter()
        .map(render_block_line)
        .collect::<Vec<_>>()
        .join("\n");
    content.trim().split('\n').map(str::to_string).collect()
}

/// Split the block at `block_idx` at byte position `position_in_block` of
/// its rendered line. The word under the cursor may be cut in two: the left
/// fragment stays (restamped with `cut_timestamp`), the right fragment opens
/// the new block inserted immediately after. Words after the cursor move to
/// the new block with their timestamps. The new block inherits timestamp,
/// speaker and tags from the original; the original's timestamp becomes
/// `cut_timestamp`.
///
/// Returns false (and mutates nothing) when the cursor is not inside a valid
/// word range.
pub fn split_line(
    model: &mut TranscriptModel,
    block_idx: usize,
    position_in_block: usize,
    cut_timestamp: Option<NaiveTime>,
) -> bool {
    let Some(block) = model.blocks.get(block_idx) else {
        return false;
    };

    let line = render_block_line(block);
    if position_in_block > line.len() || !line.is_char_boundary(position_in_block) {
        return false;
    }
    let before = &line[..position_in_block];
    let after = &line[position_in_block..];

    let cut_word_left = before.split(' ').next_back().unwrap_or("").to_string();
    let cut_word_right = after.split(' ').next().unwrap_or("").to_string();

    let mut word_number = before.matches(' ').count() as isize;
    if !block.speaker.is_empty() || line.contains("[]:") {
        word_number -= 1;
    }
    if word_number < 0 || word_number as usize >= block.words.len() {
        return false;
    }
    let word_number = word_number as usize;

    // Drop the speaker prefix and the timestamp suffix from the fragments
    let before_text = match before.rfind("]:") {
        Some(idx) => &before[idx + 2..],
        None => before,
    };
    let after_text = match after.find('[') {
        Some(idx) => &after[..idx],
        None => after,
    };

    let block = &mut model.blocks[block_idx];
    let cut_word = &block.words[word_number];
    let (cut_ts, cut_tags) = (cut_word.timestamp, cut_word.tags.clone());

    let mut moved_words = Vec::new();
    if !cut_word_right.is_empty() {
        moved_words.push(Word::new(cut_ts, cut_word_right.clone(), cut_tags));
    }
    moved_words.extend(block.words.drain(word_number + 1..));

    if cut_word_left.is_empty() {
        block.words.remove(word_number);
    } else {
        block.words[word_number].text = cut_word_left.clone();
        block.words[word_number].timestamp = cut_timestamp;
    }

    let new_block = Block {
        timestamp: block.timestamp,
        text: after_text.trim().to_string(),
        speaker: block.speaker.clone(),
        tags: block.tags.clone(),
        words: moved_words,
    };

    block.text = before_text.trim().to_string();
    block.timestamp = cut_timestamp;
    model.blocks.insert(block_idx + 1, new_block);

    info!(
        "[Line Split] line number: {} word number: {}, {}",
        block_idx + 1,
        word_number + 1,
        format!("{}{}", cut_word_left, cut_word_right)
    );
    true
}

/// Merge the block at `block_idx` into the one above it. No-op unless both
/// share a speaker. The merged block keeps the lower block's timestamp (the
/// chronologically later one in document order).
pub fn merge_up(model: &mut TranscriptModel, block_idx: usize) -> bool {
    if model.is_empty()
        || block_idx == 0
        || block_idx >= model.block_count()
        || model.blocks[block_idx].speaker != model.blocks[block_idx - 1].speaker
    {
        return false;
    }

    let current = model.blocks.remove(block_idx);
    let previous = &mut model.blocks[block_idx - 1];
    previous.words.extend(current.words);
    previous.timestamp = current.timestamp;
    previous.text.push(' ');
    previous.text.push_str(&current.text);

    info!(
        "[Merge Up] line number: {}, {} final line: {}, {}",
        block_idx,
        block_idx + 1,
        block_idx,
        model.blocks[block_idx - 1].text
    );
    true
}

/// Merge the block at `block_idx` into the one below it. No-op unless both
/// share a speaker. The surviving block keeps its own (later) timestamp.
pub fn merge_down(model: &mut TranscriptModel, block_idx: usize) -> bool {
    if model.is_empty()
        || block_idx + 1 >= model.block_count()
        || model.blocks[block_idx].speaker != model.blocks[block_idx + 1].speaker
    {
        return false;
    }

    let current = model.blocks.remove(block_idx);
    let next = &mut model.blocks[block_idx];

    let mut words = current.words;
    words.append(&mut next.words);
    next.words = words;

    let mut text = current.text;
    text.push(' ');
    text.push_str(&next.text);
    next.text = text;

    info!(
        "[Merge Down] line number: {}, {} final line: {}, {}",
        block_idx + 1,
        block_idx + 2,
        block_idx + 1,
        model.blocks[block_idx].text
    );
    true
}

/// Shift the timestamps of every block in the 1-based inclusive range
/// `start..=end` by `delta`, sign-flipped when `negate` is set. A block
/// without a timestamp is first normalized to midnight. Millisecond and
/// whole-second components are applied independently, each wrapping within
/// the 24-hour clock.
pub fn propagate_time(
    model: &mut TranscriptModel,
    delta: Option<NaiveTime>,
    start: usize,
    end: usize,
    negate: bool,
) -> Result<(), EditorError> {
    let delta = delta.ok_or_else(|| EditorError::Validation("Invalid Time Selected".to_string()))?;
    if start < 1 || end > model.block_count() || start > end {
        return Err(EditorError::Validation(
            "Invalid Block Range Selected".to_string(),
        ));
    }

    let mut seconds = (delta.hour() * 3600 + delta.minute() * 60 + delta.second()) as i64;
    let mut milliseconds = (delta.nanosecond() / 1_000_000) as i64;
    if negate {
        seconds = -seconds;
        milliseconds = -milliseconds;
    }

    for block in &mut model.blocks[start - 1..end] {
        let current = block
            .timestamp
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let shifted = current
            .overflowing_add_signed(Duration::milliseconds(milliseconds))
            .0
            .overflowing_add_signed(Duration::seconds(seconds))
            .0;
        block.timestamp = Some(shifted);
    }

    info!(
        "[Time propagated] block range: {} - {} time: {} {}",
        start,
        end,
        if negate { "-" } else { "+" },
        format_timestamp(Some(delta))
    );
    Ok(())
}

/// Stamp the block at `block_idx` with the playback clock's elapsed time.
pub fn insert_timestamp(
    model: &mut TranscriptModel,
    block_idx: usize,
    elapsed: NaiveTime,
) -> bool {
    let Some(block) = model.blocks.get_mut(block_idx) else {
        return false;
    };
    block.timestamp = Some(elapsed);

    info!(
        "[Inserted TimeStamp from Player] line number: {}, timestamp: {}",
        block_idx,
        format_timestamp(Some(elapsed))
    );
    true
}

/// Change the speaker of the block at `block_idx`, or of every block that
/// currently shares its speaker when `replace_all` is set.
pub fn change_speaker(
    model: &mut TranscriptModel,
    block_idx: usize,
    new_speaker: &str,
    replace_all: bool,
) -> bool {
    let Some(block) = model.blocks.get(block_idx) else {
        return false;
    };
    let old_speaker = block.speaker.clone();

    if replace_all {
        for block in &mut model.blocks {
            if block.speaker == old_speaker {
                block.speaker = new_speaker.to_string();
            }
        }
    } else {
        model.blocks[block_idx].speaker = new_speaker.to_string();
    }

    info!(
        "[Speaker Changed] line number: {} initial: {} final: {}",
        block_idx + 1,
        old_speaker,
        new_speaker
    );
    true
}

/// Replace the tag list of the block at `block_idx`.
pub fn select_tags(model: &mut TranscriptModel, block_idx: usize, tags: Vec<String>) -> bool {
    let Some(block) = model.blocks.get_mut(block_idx) else {
        return false;
    };
    info!("[Tags Selected] new tags: {:?}", tags);
    block.tags = tags;
    true
}
