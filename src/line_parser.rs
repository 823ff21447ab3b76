/*!
 * Flat-line parsing.
 *
 * One line of the text buffer is parsed into a transient [`Block`]: an
 * optional trailing `[hh:mm:ss.zzz]` timestamp token, an optional leading
 * `[speaker]:` token, and the remaining body split into words. Parsing never
 * fails; a token that does not parse simply leaves its field empty, which
 * marks the block invalid downstream.
 */

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Block, Word};

// Timestamp token: [hh:mm:ss.zzz] with optional hour and fractional parts
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\d?\d:)?[0-5]?\d:[0-5]?\d(\.\d\d?\d?)?\]").unwrap()
});

// Speaker token: [anything]:
static SPEAKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.*)\]:").unwrap());

/// Parse a clock time in any of the forms `h:m:s.z`, `m:s.z`, `h:m:s`, `m:s`.
/// Fields may be one or two digits; the fractional part is one to three
/// digits and scales to milliseconds (`.5` is 500 ms). Returns `None` for
/// anything malformed.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let (clock, millis) = match text.split_once('.') {
        Some((clock, frac)) => {
            if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let scaled = frac.parse::<u32>().ok()? * 10u32.pow(3 - frac.len() as u32);
            (clock, scaled)
        }
        None => (text, 0),
    };

    let mut parts = clock.split(':');
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let (hours, minutes, seconds) = match third {
        Some(third) => (
            first.parse().ok()?,
            second.parse().ok()?,
            third.parse().ok()?,
        ),
        None => (0, first.parse().ok()?, second.parse().ok()?),
    };

    NaiveTime::from_hms_milli_opt(hours, minutes, seconds, millis)
}

/// Parse one line of the flat buffer into a transient block.
///
/// The timestamp token is accepted only when the first match in the line is
/// followed by nothing but whitespace; a timestamp-looking token in the
/// middle of the body is plain text. The speaker token is accepted only as a
/// prefix. Words start with no timestamp and no tags.
pub fn parse_line(raw: &str) -> Block {
    let mut timestamp = None;
    let mut body = raw;

    if let Some(m) = TIMESTAMP_REGEX.find(raw) {
        if raw[m.end()..].trim().is_empty() {
            // Strip the enclosing brackets before parsing the clock value
            timestamp = parse_clock_time(&raw[m.start() + 1..m.end() - 1]);
            body = &raw[..m.start()];
        }
    }

    let mut speaker = String::new();
    if let Some(m) = SPEAKER_REGEX.find(body) {
        speaker = body[m.start() + 1..m.end() - 2].to_string();
        body = &body[m.end()..];
    }

    let text = body.trim().to_string();

    // Split on single spaces; consecutive spaces produce empty words, which
    // is what the reconciliation diff expects to see mid-edit.
    let words: Vec<Word> = text.split(' ').map(Word::plain).collect();

    Block {
        timestamp,
        text,
        speaker,
        tags: Vec::new(),
        words,
    }
}
