/*!
 * Tests for structural operations: rendering, line split, merges and time
 * propagation
 */

use tscribe::errors::EditorError;
use tscribe::structural::{
    change_speaker, insert_timestamp, merge_down, merge_up, propagate_time, render_block_line,
    render_content, select_tags, split_line,
};

use crate::common::{block_with_words, model_from_blocks, t, timed_word};

fn two_word_block() -> tscribe::Block {
    block_with_words(
        "s",
        Some(t(0, 0, 20)),
        vec![
            timed_word("hello", Some(t(0, 0, 5))),
            timed_word("world", Some(t(0, 0, 10))),
        ],
    )
}

/// Rendered lines always carry both bracket tokens, even when empty
#[test]
fn test_renderBlockLine_withAllFields_shouldFormatSpeakerTextTimestamp() {
    let block = two_word_block();
    assert_eq!(render_block_line(&block), "[s]: hello world [00:00:20.000]");

    let empty = block_with_words("", None, vec![timed_word("hi", None)]);
    assert_eq!(render_block_line(&empty), "[]: hi []");
}

/// Rendering the whole model joins blocks with newlines and trims the ends
#[test]
fn test_renderContent_withTwoBlocks_shouldYieldOneLinePerBlock() {
    let model = model_from_blocks(vec![
        two_word_block(),
        block_with_words("s", None, vec![timed_word("bye", None)]),
    ]);

    let lines = render_content(&model);

    assert_eq!(
        lines,
        vec![
            "[s]: hello world [00:00:20.000]".to_string(),
            "[s]: bye []".to_string(),
        ]
    );
}

/// Splitting on a word boundary moves the word and its tail to a new block;
/// the original is restamped with the cut timestamp
#[test]
fn test_splitLine_atWordBoundary_shouldMoveTailToNewBlock() {
    let mut model = model_from_blocks(vec![two_word_block()]);

    // "[s]: hello world [...]" -- byte 11 is the start of "world"
    let ok = split_line(&mut model, 0, 11, Some(t(0, 0, 7)));

    assert!(ok);
    assert_eq!(model.block_count(), 2);

    let first = &model.blocks[0];
    assert_eq!(first.text, "hello");
    assert_eq!(first.timestamp, Some(t(0, 0, 7)));
    assert_eq!(first.words.len(), 1);
    assert_eq!(first.words[0].text, "hello");
    assert_eq!(first.words[0].timestamp, Some(t(0, 0, 5)));

    let second = &model.blocks[1];
    assert_eq!(second.text, "world");
    assert_eq!(second.timestamp, Some(t(0, 0, 20)));
    assert_eq!(second.speaker, "s");
    assert_eq!(second.words.len(), 1);
    assert_eq!(second.words[0].text, "world");
    assert_eq!(second.words[0].timestamp, Some(t(0, 0, 10)));
}

/// Splitting inside a word cuts it in two; the left fragment is restamped,
/// the right fragment keeps the cut word's timestamp
#[test]
fn test_splitLine_insideWord_shouldCutWordInTwo() {
    let mut model = model_from_blocks(vec![two_word_block()]);

    // byte 8 is between "hel" and "lo"
    let ok = split_line(&mut model, 0, 8, Some(t(0, 0, 7)));

    assert!(ok);
    let first = &model.blocks[0];
    assert_eq!(first.text, "hel");
    assert_eq!(first.words[0].text, "hel");
    assert_eq!(first.words[0].timestamp, Some(t(0, 0, 7)));

    let second = &model.blocks[1];
    assert_eq!(second.text, "lo world");
    assert_eq!(second.words[0].text, "lo");
    assert_eq!(second.words[0].timestamp, Some(t(0, 0, 5)));
    assert_eq!(second.words[1].text, "world");
}

/// A cursor inside the speaker token is not a valid split position
#[test]
fn test_splitLine_insideSpeakerToken_shouldReturnFalse() {
    let mut model = model_from_blocks(vec![two_word_block()]);

    let ok = split_line(&mut model, 0, 0, Some(t(0, 0, 7)));

    assert!(!ok);
    assert_eq!(model.block_count(), 1);
}

/// Merging up concatenates words and keeps the lower block's timestamp
#[test]
fn test_mergeUp_withSameSpeaker_shouldKeepLowerTimestamp() {
    let mut model = model_from_blocks(vec![
        block_with_words("s", Some(t(0, 0, 7)), vec![timed_word("hello", Some(t(0, 0, 5)))]),
        block_with_words("s", Some(t(0, 0, 20)), vec![timed_word("world", Some(t(0, 0, 10)))]),
    ]);

    let ok = merge_up(&mut model, 1);

    assert!(ok);
    assert_eq!(model.block_count(), 1);
    let merged = &model.blocks[0];
    assert_eq!(merged.text, "hello world");
    assert_eq!(merged.timestamp, Some(t(0, 0, 20)));
    assert_eq!(merged.words.len(), 2);
}

/// Merging down keeps the surviving block's own timestamp
#[test]
fn test_mergeDown_withSameSpeaker_shouldKeepSurvivorTimestamp() {
    let mut model = model_from_blocks(vec![
        block_with_words("s", Some(t(0, 0, 7)), vec![timed_word("hello", Some(t(0, 0, 5)))]),
        block_with_words("s", Some(t(0, 0, 20)), vec![timed_word("world", Some(t(0, 0, 10)))]),
    ]);

    let ok = merge_down(&mut model, 0);

    assert!(ok);
    assert_eq!(model.block_count(), 1);
    let merged = &model.blocks[0];
    assert_eq!(merged.text, "hello world");
    assert_eq!(merged.timestamp, Some(t(0, 0, 20)));
    assert_eq!(merged.words[0].text, "hello");
    assert_eq!(merged.words[1].text, "world");
}

/// Merges across a speaker change are refused
#[test]
fn test_merge_withDifferentSpeakers_shouldReturnFalse() {
    let mut model = model_from_blocks(vec![
        block_with_words("a", None, vec![timed_word("hello", None)]),
        block_with_words("b", None, vec![timed_word("world", None)]),
    ]);

    assert!(!merge_up(&mut model, 1));
    assert!(!merge_down(&mut model, 0));
    assert_eq!(model.block_count(), 2);
}

/// Propagation adds the delta to every block in the range; a missing
/// timestamp is treated as midnight first
#[test]
fn test_propagateTime_withValidRange_shouldShiftTimestamps() {
    let mut model = model_from_blocks(vec![
        block_with_words("s", Some(t(0, 0, 10)), vec![timed_word("a", None)]),
        block_with_words("s", None, vec![timed_word("b", None)]),
        block_with_words("s", Some(t(0, 0, 30)), vec![timed_word("c", None)]),
    ]);

    propagate_time(&mut model, Some(t(0, 0, 5)), 1, 2, false).unwrap();

    assert_eq!(model.blocks[0].timestamp, Some(t(0, 0, 15)));
    assert_eq!(model.blocks[1].timestamp, Some(t(0, 0, 5)));
    assert_eq!(model.blocks[2].timestamp, Some(t(0, 0, 30)));
}

/// A negated delta that crosses midnight wraps within the 24-hour clock
#[test]
fn test_propagateTime_withNegatedDeltaPastMidnight_shouldWrapAround() {
    let mut model = model_from_blocks(vec![block_with_words(
        "s",
        Some(t(0, 0, 1)),
        vec![timed_word("a", None)],
    )]);

    propagate_time(&mut model, Some(t(0, 0, 2)), 1, 1, true).unwrap();

    assert_eq!(model.blocks[0].timestamp, Some(t(23, 59, 59)));
}

/// An unparsable delta is rejected before anything is touched
#[test]
fn test_propagateTime_withMissingDelta_shouldReturnValidationError() {
    let mut model = model_from_blocks(vec![block_with_words(
        "s",
        Some(t(0, 0, 10)),
        vec![timed_word("a", None)],
    )]);

    let err = propagate_time(&mut model, None, 1, 1, false).unwrap_err();

    assert!(matches!(err, EditorError::Validation(msg) if msg == "Invalid Time Selected"));
    assert_eq!(model.blocks[0].timestamp, Some(t(0, 0, 10)));
}

/// An inverted or out-of-bounds range is rejected and the model untouched
#[test]
fn test_propagateTime_withInvalidRange_shouldReturnValidationError() {
    let mut model = model_from_blocks(vec![block_with_words(
        "s",
        Some(t(0, 0, 10)),
        vec![timed_word("a", None)],
    )]);

    let err = propagate_time(&mut model, Some(t(0, 0, 5)), 2, 1, false).unwrap_err();
    assert!(matches!(err, EditorError::Validation(msg) if msg == "Invalid Block Range Selected"));

    let err = propagate_time(&mut model, Some(t(0, 0, 5)), 1, 5, false).unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));

    assert_eq!(model.blocks[0].timestamp, Some(t(0, 0, 10)));
}

/// Inserting a timestamp stamps only the targeted block
#[test]
fn test_insertTimestamp_withValidIndex_shouldStampBlock() {
    let mut model = model_from_blocks(vec![
        block_with_words("s", None, vec![timed_word("a", None)]),
        block_with_words("s", None, vec![timed_word("b", None)]),
    ]);

    assert!(insert_timestamp(&mut model, 1, t(0, 1, 30)));
    assert_eq!(model.blocks[0].timestamp, None);
    assert_eq!(model.blocks[1].timestamp, Some(t(0, 1, 30)));

    assert!(!insert_timestamp(&mut model, 5, t(0, 1, 30)));
}

/// Replace-all speaker change renames every block sharing the old speaker
#[test]
fn test_changeSpeaker_withReplaceAll_shouldRenameMatchingBlocks() {
    let mut model = model_from_blocks(vec![
        block_with_words("alice", None, vec![timed_word("a", None)]),
        block_with_words("bob", None, vec![timed_word("b", None)]),
        block_with_words("alice", None, vec![timed_word("c", None)]),
    ]);

    assert!(change_speaker(&mut model, 0, "carol", true));

    assert_eq!(model.blocks[0].speaker, "carol");
    assert_eq!(model.blocks[1].speaker, "bob");
    assert_eq!(model.blocks[2].speaker, "carol");
}

/// A single-block speaker change leaves other blocks alone
#[test]
fn test_changeSpeaker_withoutReplaceAll_shouldRenameOneBlock() {
    let mut model = model_from_blocks(vec![
        block_with_words("alice", None, vec![timed_word("a", None)]),
        block_with_words("alice", None, vec![timed_word("b", None)]),
    ]);

    assert!(change_speaker(&mut model, 1, "bob", false));

    assert_eq!(model.blocks[0].speaker, "alice");
    assert_eq!(model.blocks[1].speaker, "bob");
}

/// Tag selection replaces the block's tag list wholesale
#[test]
fn test_selectTags_withValidIndex_shouldReplaceTagList() {
    let mut model = model_from_blocks(vec![block_with_words(
        "s",
        None,
        vec![timed_word("a", None)],
    )]);
    model.blocks[0].tags = vec!["Old".to_string()];

    assert!(select_tags(&mut model, 0, vec!["Intro".to_string(), "Music".to_string()]));
    assert_eq!(model.blocks[0].tags, vec!["Intro", "Music"]);

    assert!(!select_tags(&mut model, 3, Vec::new()));
}
