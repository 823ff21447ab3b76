/*!
 * End-to-end workflow tests: open a transcript, edit it, restructure it,
 * shift its clock, save it and read it back
 */

use tscribe::app_config::Config;
use tscribe::editor::EditorSession;
use tscribe::reconcile::BufferChange;

use crate::common::{create_temp_dir, create_test_file, sample_transcript_xml, t};

/// A full editing pass over a transcript survives a save/reopen round trip
#[test]
fn test_transcriptWorkflow_editSplitMergePropagateSave_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    create_test_file(
        dir.path(),
        "english.txt",
        "good\nhello\nmorning\nthere\nworld\n",
    )
    .unwrap();
    let source = create_test_file(dir.path(), "sample.xml", sample_transcript_xml()).unwrap();

    let mut config = Config::default();
    config.dictionary_dir = dir.path().to_path_buf();
    config.corrected_words_dir = dir.path().to_path_buf();
    let mut session = EditorSession::new(config.clone());

    // open
    session.open(&source).unwrap();
    assert_eq!(session.model().block_count(), 2);
    assert!(session.validity().invalid_blocks.is_empty());
    assert!(session.validity().invalid_words.is_empty());

    // type a word into the middle of the first line
    let edited = format!(
        "[alice]: hello there world [00:00:10.000]\n{}",
        session.buffer()[1]
    );
    session.content_changed(
        &edited,
        0,
        BufferChange {
            position: 15,
            chars_removed: 0,
            chars_added: 6,
        },
    );

    let first = &session.model().blocks[0];
    assert_eq!(first.text, "hello there world");
    assert_eq!(first.words[0].timestamp, Some(t(0, 0, 5)));
    assert_eq!(first.words[1].timestamp, None);
    assert_eq!(first.words[2].timestamp, Some(t(0, 0, 10)));

    // "there" is in the wordlist, so the sweep stays clean
    assert!(session.validity().invalid_words.is_empty());

    // split before "world" (byte 21 of the rendered line), stamping the
    // left half with the playback clock
    session.elapsed_time_changed(t(0, 0, 7));
    assert_eq!(session.active_position().block, Some(0));
    session.split_line(0, 21, t(0, 0, 7));

    assert_eq!(session.model().block_count(), 3);
    assert_eq!(session.model().blocks[0].text, "hello there");
    assert_eq!(session.model().blocks[0].timestamp, Some(t(0, 0, 7)));
    assert_eq!(session.model().blocks[1].text, "world");
    assert_eq!(session.model().blocks[1].timestamp, Some(t(0, 0, 10)));

    // shift every block one second later
    session.propagate_time(Some(t(0, 0, 1)), 1, 3, false).unwrap();
    assert_eq!(session.model().blocks[0].timestamp, Some(t(0, 0, 8)));
    assert_eq!(session.model().blocks[1].timestamp, Some(t(0, 0, 11)));
    assert_eq!(session.model().blocks[2].timestamp, Some(t(0, 0, 21)));

    // merge the split halves back together
    session.merge_up(1);
    assert_eq!(session.model().block_count(), 2);
    let merged = &session.model().blocks[0];
    assert_eq!(merged.text, "hello there world");
    assert_eq!(merged.timestamp, Some(t(0, 0, 11)));
    // word timestamps are untouched by block-level shifts
    assert_eq!(merged.words[0].timestamp, Some(t(0, 0, 5)));
    assert_eq!(merged.words[2].timestamp, Some(t(0, 0, 10)));

    // save to a new file and read it back with a fresh session
    let target = dir.path().join("edited.xml");
    session.save_as(&target).unwrap();

    let mut reopened = EditorSession::new(config);
    reopened.open(&target).unwrap();

    assert_eq!(reopened.model(), session.model());
    assert_eq!(reopened.language(), "english");
    assert_eq!(reopened.model().blocks[1].tags, vec!["Intro".to_string()]);
    assert!(reopened.validity().invalid_blocks.is_empty());
    assert!(reopened.validity().invalid_words.is_empty());
}

/// Typing a transcript from scratch, stamping it and saving it yields a
/// valid document
#[test]
fn test_transcriptWorkflow_typeFromScratch_shouldSaveValidDocument() {
    let dir = create_temp_dir().unwrap();
    create_test_file(dir.path(), "english.txt", "hello\nworld\n").unwrap();

    let mut config = Config::default();
    config.dictionary_dir = dir.path().to_path_buf();
    config.corrected_words_dir = dir.path().to_path_buf();
    let mut session = EditorSession::new(config.clone());

    session.content_changed(
        "hello world",
        0,
        BufferChange {
            position: 0,
            chars_removed: 0,
            chars_added: 11,
        },
    );
    assert_eq!(session.validity().invalid_blocks, vec![0]);

    session.insert_timestamp(0, t(0, 0, 9));
    assert!(session.validity().invalid_blocks.is_empty());
    assert_eq!(session.buffer()[0], "[]: hello world [00:00:09.000]");

    let target = dir.path().join("typed.xml");
    session.save_as(&target).unwrap();

    let mut reopened = EditorSession::new(config);
    reopened.open(&target).unwrap();

    assert_eq!(reopened.model().block_count(), 1);
    let block = &reopened.model().blocks[0];
    assert_eq!(block.text, "hello world");
    assert_eq!(block.speaker, "");
    assert_eq!(block.timestamp, Some(t(0, 0, 9)));
}
