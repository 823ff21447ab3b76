/*!
 * Lossless XML persistence for the transcript model.
 *
 * Wire format:
 *
 * ```xml
 * <transcript lang="LANGCODE">
 *   <line timestamp="hh:mm:ss.zzz" speaker="NAME" tags="Tag1,Tag2">
 *     <word timestamp="hh:mm:ss.zzz" tags="Tag1,Tag2">WORDTEXT</word>
 *   </line>
 * </transcript>
 * ```
 *
 * Decoding fails only when the root element is not `<transcript>`; missing
 * attributes fall back to empty defaults. Encoding skips blocks whose text
 * is empty, and omits `lang`/`tags` attributes when they carry nothing.
 */

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::EditorError;
use crate::line_parser::parse_clock_time;
use crate::model::{format_timestamp, Block, TranscriptModel, Word};

fn attribute_value(element: &BytesStart, name: &str) -> Result<String, EditorError> {
    for attribute in element.attributes().with_checks(false) {
        let attribute = attribute.map_err(|e| EditorError::Xml(e.to_string()))?;
        if attribute.key.as_ref() == name.as_bytes() {
            return Ok(attribute
                .unescape_value()
                .map_err(|e| EditorError::Xml(e.to_string()))?
                .into_owned());
        }
    }
    Ok(String::new())
}

fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(str::to_string).collect()
    }
}

fn block_from_element(element: &BytesStart) -> Result<Block, EditorError> {
    Ok(Block {
        timestamp: parse_clock_time(&attribute_value(element, "timestamp")?),
        text: String::new(),
        speaker: attribute_value(element, "speaker")?,
        tags: split_tags(&attribute_value(element, "tags")?),
        words: Vec::new(),
    })
}

fn word_from_element(element: &BytesStart) -> Result<Word, EditorError> {
    Ok(Word {
        timestamp: parse_clock_time(&attribute_value(element, "timestamp")?),
        text: String::new(),
        tags: split_tags(&attribute_value(element, "tags")?),
    })
}

/// Decode a transcript document. Returns the model and the `lang` attribute
/// (empty when absent).
pub fn decode(xml: &str) -> Result<(TranscriptModel, String), EditorError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut model = TranscriptModel::new();
    let mut language = String::new();
    let mut seen_root = false;
    let mut current_block: Option<Block> = None;
    let mut current_word: Option<Word> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"transcript" if !seen_root => {
                    seen_root = true;
                    language = attribute_value(&element, "lang")?;
                }
                _ if !seen_root => return Err(EditorError::IncorrectFile),
                b"line" => current_block = Some(block_from_element(&element)?),
                b"word" if current_block.is_some() => {
                    current_word = Some(word_from_element(&element)?);
                }
                _ => {}
            },
            Ok(Event::Empty(element)) => match element.name().as_ref() {
                _ if !seen_root => return Err(EditorError::IncorrectFile),
                b"line" => model.blocks.push(block_from_element(&element)?),
                b"word" => {
                    if let Some(block) = current_block.as_mut() {
                        block.words.push(word_from_element(&element)?);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let Some(word) = current_word.as_mut() {
                    word.text = text
                        .unescape()
                        .map_err(|e| EditorError::Xml(e.to_string()))?
                        .into_owned();
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"word" => {
                    if let (Some(block), Some(word)) = (current_block.as_mut(), current_word.take())
                    {
                        block.words.push(word);
                    }
                }
                b"line" => {
                    if let Some(mut block) = current_block.take() {
                        block.text = block.joined_word_text();
                        model.blocks.push(block);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(EditorError::Xml(e.to_string())),
        }
    }

    if !seen_root {
        return Err(EditorError::IncorrectFile);
    }
    Ok((model, language))
}

/// Encode the model to an XML document string. Blocks with empty text are
/// not round-tripped.
pub fn encode(model: &TranscriptModel, language: &str) -> Result<String, EditorError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| EditorError::Xml(e.to_string()))?;

    let mut root = BytesStart::new("transcript");
    if !language.is_empty() {
        root.push_attribute(("lang", language));
    }
    writer
        .write_event(Event::Start(root))
        .map_err(|e| EditorError::Xml(e.to_string()))?;

    for block in &model.blocks {
        if block.text.is_empty() {
            continue;
        }

        let mut line = BytesStart::new("line");
        line.push_attribute(("timestamp", format_timestamp(block.timestamp).as_str()));
        line.push_attribute(("speaker", block.speaker.as_str()));
        if !block.tags.is_empty() {
            line.push_attribute(("tags", block.tags.join(",").as_str()));
        }
        writer
            .write_event(Event::Start(line))
            .map_err(|e| EditorError::Xml(e.to_string()))?;

        for word in &block.words {
            let mut element = BytesStart::new("word");
            element.push_attribute(("timestamp", format_timestamp(word.timestamp).as_str()));
            if !word.tags.is_empty() {
                element.push_attribute(("tags", word.tags.join(",").as_str()));
            }
            writer
                .write_event(Event::Start(element))
                .map_err(|e| EditorError::Xml(e.to_string()))?;
            writer
                .write_event(Event::Text(BytesText::new(&word.text)))
                .map_err(|e| EditorError::Xml(e.to_string()))?;
            writer
                .write_event(Event::End(BytesEnd::new("word")))
                .map_err(|e| EditorError::Xml(e.to_string()))?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("line")))
            .map_err(|e| EditorError::Xml(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("transcript")))
        .map_err(|e| EditorError::Xml(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| EditorError::Xml(e.to_string()))
}
