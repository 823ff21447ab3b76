/*!
 * Buffer-change reconciliation.
 *
 * The flat text buffer is the editing surface; the transcript model is the
 * structured truth. Every buffer change lands here as "cursor block N,
 * R chars removed, A chars added" plus the new buffer lines, and the model
 * is re-aligned in place: block insertions/deletions are detected from the
 * line-count delta, and the edited block's words go through a
 * timestamp-preserving diff so that an edit only loses the timestamps of the
 * words it actually destroyed.
 */

use log::info;

use crate::line_parser::parse_line;
use crate::model::{format_timestamp, TranscriptModel, Word};

/// One buffer-change notification from the editing surface.
#[derive(Debug, Clone, Copy)]
pub struct BufferChange {
    /// Character position of the change
    pub position: usize,
    /// Number of characters removed
    pub chars_removed: usize,
    /// Number of characters added
    pub chars_added: usize,
}

impl BufferChange {
    /// True when the notification carries no actual change.
    pub fn is_noop(&self) -> bool {
        self.chars_removed == 0 && self.chars_added == 0
    }
}

/// Re-align the model with the buffer after one edit.
///
/// `lines` is the full buffer after the change, one entry per line;
/// `cursor_block` is the line index the cursor ended up on. Programmatic
/// whole-buffer rewrites must not reach this function; the session guards
/// them with its re-entrancy flag.
pub fn apply_change(
    model: &mut TranscriptModel,
    lines: &[String],
    cursor_block: usize,
    change: &BufferChange,
) {
    if change.is_noop() {
        return;
    }

    // First content ever typed: populate the model wholesale.
    if model.is_empty() {
        for line in lines {
            model.blocks.push(parse_line(line));
        }
        return;
    }

    let block_delta = model.block_count() as isize - lines.len() as isize;
    if block_delta > 0 {
        info!("[Lines Deleted] {} lines deleted", block_delta);
        for _ in 0..block_delta {
            if cursor_block + 1 < model.block_count() {
                model.blocks.remove(cursor_block + 1);
            }
        }
    } else if block_delta < 0 {
        info!("[Lines Inserted] {} lines inserted", -block_delta);
        insert_new_blocks(model, lines, cursor_block, -block_delta as usize);
    }

    if cursor_block >= model.block_count() || cursor_block >= lines.len() {
        return;
    }

    let parsed = parse_line(&lines[cursor_block]);
    let current = &mut model.blocks[cursor_block];

    if current.speaker != parsed.speaker {
        info!(
            "[Speaker Changed] line number: {} initial: {} final: {}",
            cursor_block + 1,
            current.speaker,
            parsed.speaker
        );
        current.speaker = parsed.speaker.clone();
    }

    if current.timestamp != parsed.timestamp {
        info!(
            "[TimeStamp Changed] line number: {}, {}",
            cursor_block + 1,
            format_timestamp(parsed.timestamp)
        );
        current.timestamp = parsed.timestamp;
    }

    if current.text != parsed.text {
        info!(
            "[Text Changed] line number: {} initial: {} final: {}",
            cursor_block + 1,
            current.text,
            parsed.text
        );
        // Block tags survive a text edit unconditionally; word tags do not.
        let tags = std::mem::take(&mut current.tags);
        let mut replacement = parsed;
        replacement.words = reconcile_words(&current.words, replacement.words);
        replacement.tags = tags;
        *current = replacement;
    }
}

/// Insert `count` freshly parsed blocks around the cursor. Whether a new
/// block lands before or after the cursor block depends on whether the line
/// immediately preceding the cursor is now blank: a blank line there means
/// the break was opened above the line the cursor was on.
fn insert_new_blocks(
    model: &mut TranscriptModel,
    lines: &[String],
    cursor_block: usize,
    count: usize,
) {
    let anchor = cursor_block as isize - count as isize;
    for i in 1..=count as isize {
        let inserted_above = lines
            .get(anchor as usize)
            .is_some_and(|line| line.trim().is_empty());

        let (at, source) = if inserted_above {
            (anchor, cursor_block as isize - i)
        } else {
            (anchor + 1, cursor_block as isize - i + 1)
        };
        if at < 0 || at > model.block_count() as isize {
            continue;
        }
        let parsed = match usize::try_from(source).ok().and_then(|s| lines.get(s)) {
            Some(line) => parse_line(line),
            None => parse_line(""),
        };
        model.blocks.insert(at as usize, parsed);
    }
}

/// Timestamp-preserving word diff.
///
/// Best-effort two-pointer alignment, not a general sequence alignment:
/// a forward scan finds the first index where the texts diverge, everything
/// before it keeps its timestamp, and an equal-length edit is assumed to be
/// a contiguous in-place replacement so everything after the divergence
/// keeps its timestamp too. When words were inserted or removed, a backward
/// walk from both ends copies timestamps across matching texts until it
/// reaches the divergence point. A genuinely new word in the middle ends up
/// with no timestamp. Ties and duplicate words near the edit can mis-align;
/// that behavior is intentional and load-bearing for the editing feel.
pub fn reconcile_words(old: &[Word], mut new: Vec<Word>) -> Vec<Word> {
    let words_delta = new.len() as isize - old.len() as isize;

    let mut diff_start: isize = -1;
    for i in 0..new.len().min(old.len()) {
        if new[i].text != old[i].text {
            diff_start = i as isize;
            break;
        }
    }
    if diff_start == -1 {
        diff_start = new.len() as isize - 1;
    }

    for i in 0..diff_start.max(0) as usize {
        if i < old.len() {
            new[i].timestamp = old[i].timestamp;
        }
    }

    if words_delta == 0 {
        for i in (diff_start + 1).max(0) as usize..new.len() {
            new[i].timestamp = old[i].timestamp;
        }
    } else {
        let mut i = new.len() as isize - 1;
        let mut j = old.len() as isize - 1;
        while i > diff_start && j >= 0 {
            if new[i as usize].text == old[j as usize].text {
                new[i as usize].timestamp = old[j as usize].timestamp;
            }
            i -= 1;
            j -= 1;
        }
    }

    new
}
