/*!
 * Playback position tracking.
 *
 * The media player feeds an elapsed-time value; the tracker turns it into an
 * "active block / active word" pair by a monotonic forward scan: the first
 * block (then word) whose timestamp is strictly greater than the elapsed
 * time. Timestamps are not required to be monotonic, so an out-of-order
 * timestamp makes the scan stop early rather than find the true nearest one;
 * that quirk is part of the observable behavior and is kept.
 */

use chrono::NaiveTime;

use crate::model::TranscriptModel;

/// The block/word the playback clock currently points at. `None` means the
/// clock is past every timestamp (or the model is empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePosition {
    /// Index of the active block, in document order
    pub block: Option<usize>,
    /// Index of the active word within the active block
    pub word: Option<usize>,
}

/// Edge-triggered state machine over the playback scan: consumers are only
/// notified when either index actually changes.
#[derive(Debug, Default)]
pub struct PlaybackTracker {
    current: ActivePosition,
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last published position.
    pub fn position(&self) -> ActivePosition {
        self.current
    }

    /// Forget the current position, e.g. when the transcript is replaced.
    pub fn reset(&mut self) {
        self.current = ActivePosition::default();
    }

    /// Pure scan of the model for a given elapsed time.
    pub fn scan(model: &TranscriptModel, elapsed: NaiveTime) -> ActivePosition {
        let block = model
            .blocks
            .iter()
            .position(|b| b.timestamp.is_some_and(|t| t > elapsed));

        let word = block.and_then(|b| {
            model.blocks[b]
                .words
                .iter()
                .position(|w| w.timestamp.is_some_and(|t| t > elapsed))
        });

        ActivePosition { block, word }
    }

    /// Recompute the active position for a playback update. Returns the new
    /// position only when it differs from the previous one.
    pub fn update(&mut self, model: &TranscriptModel, elapsed: NaiveTime) -> Option<ActivePosition> {
        let next = Self::scan(model, elapsed);
        if next != self.current {
            self.current = next;
            Some(next)
        } else {
            None
        }
    }
}

/// The nearest timestamp of any block strictly before `block_idx`, walking
/// backwards through the document and defaulting to midnight. Used by the
/// jump operations to find where playback should resume.
pub fn nearest_timestamp_before(model: &TranscriptModel, block_idx: usize) -> NaiveTime {
    for block in model.blocks[..block_idx.min(model.block_count())].iter().rev() {
        if let Some(t) = block.timestamp {
            return t;
        }
    }
    NaiveTime::from_hms_opt(0, 0, 0).unwrap()
}
