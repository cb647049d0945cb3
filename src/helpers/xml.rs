//! Event-level XML reading for workbook parts.
//! Wraps `quick_xml::Reader` with the configuration the xlsx parts need and adds
//! attribute and text helpers used by the workbook reader.

use crate::error::AtletError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use std::io::BufRead;
use thiserror::Error;

/// Phonetic runs (furigana) are skipped when collecting cell text
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");
/// Text run holding the visible characters of a string item
const TAG_TEXT: QName = QName(b"t");

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown XML entity '&{0};'")]
    UnknownEntity(String),
}

/// Buffered XML event reader
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(source: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // `<c r="A1"/>` arrives as Start + End so every arm sees both halves
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Next event, `None` at end of document
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, AtletError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }

    /// Collects the text found before the closing `end_tag`.
    ///
    /// With `bare_text` set, character data directly under the element counts (as in
    /// `<v>42</v>`); otherwise only `<t>` runs do, which is how string items and inline
    /// strings store rich text. Phonetic runs never contribute.
    pub(crate) fn read_text(&mut self, end_tag: QName, bare_text: bool) -> Result<String, AtletError> {
        let mut in_phonetic = false;
        let mut in_text = bare_text;
        let mut text = String::new();
        crate::match_xml_events!(self => {
            Event::End(event) if event.name() == end_tag => break,
            Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => in_phonetic = true,
            Event::End(event) if event.name() == TAG_PHONETIC_TEXT => in_phonetic = false,
            Event::Start(event) if !in_phonetic && event.name() == TAG_TEXT => in_text = true,
            Event::End(event) if in_text && event.name() == TAG_TEXT => in_text = bare_text,
            Event::Text(event) if in_text => text.push_str(&event.xml_content()?),
            Event::CData(event) if in_text => text.push_str(&event.xml_content()?),
            Event::GeneralRef(event) if in_text => text.push_reference(&event)?,
        });
        Ok(text)
    }
}

/// Attribute access on start tags
pub(crate) trait XmlNodeHelper {
    /// Unescaped value of the attribute with exactly this qualified name
    fn attribute(&self, name: &str) -> Result<Option<String>, AtletError>;

    /// Unescaped value of the first attribute whose local name matches, ignoring any prefix
    fn local_attribute(&self, local_name: &str) -> Result<Option<String>, AtletError>;
}

impl XmlNodeHelper for BytesStart<'_> {
    fn attribute(&self, name: &str) -> Result<Option<String>, AtletError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }

    fn local_attribute(&self, local_name: &str) -> Result<Option<String>, AtletError> {
        for result in self.attributes() {
            let attribute = result?;
            if attribute.key.local_name().as_ref() == local_name.as_bytes() {
                return Ok(Some(attribute.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }
}

/// Appending entity and character references to collected text
pub(crate) trait XmlTextHelper {
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), AtletError>;
}

impl XmlTextHelper for String {
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), AtletError> {
        let raw = reference.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16)?,
                None => number.parse::<u32>()?,
            };
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::UnknownEntity(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Loops over the events of an `XmlReader`, dispatching to the given match arms.
/// Unmatched events are ignored; `break` inside an arm stops the loop.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next()? {
            match event {
                $($arms)*
                _ => (),
            }
        }
    };
}
