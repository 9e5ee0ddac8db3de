//! FictionBook 2 (FB2) metadata parsing.
//!
//! FB2 is a single-file XML format; everything the catalog needs sits under
//! `description/title-info`, well before the body, so parsing stops at the
//! closing `title-info` tag and never touches the (potentially large) body
//! or embedded binaries.
//!
//! The `.fb2.zip` variant is the same document inside a zip container; the
//! caller unpacks it (see `folio-archive`) and feeds the inner bytes here,
//! keeping the *outer* archive path on the record.

use crate::error::{ErrorKind, Result};
use crate::models::{Language, Name, Record};
use exn::{OptionExt, ResultExt};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::instrument;

/// Parses FB2 document bytes into a [`Record`].
///
/// `path` becomes the record's source path and should be the file the bytes
/// were ultimately read from.
///
/// # Errors
///
/// - [`MalformedXml`](ErrorKind::MalformedXml) if the document is not
///   well-formed
/// - [`MissingField`](ErrorKind::MissingField) if a well-formed document has
///   no title or no usable author
///
/// # Examples
///
/// ```
/// let xml = br#"<?xml version="1.0"?>
/// <FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
///   <description><title-info>
///     <genre>sf</genre>
///     <author><first-name>Jane</first-name><last-name>Doe</last-name></author>
///     <book-title>Test Book</book-title>
///     <lang>en</lang>
///   </title-info></description>
/// </FictionBook>"#;
/// let record = folio_extract::fb2::parse(xml, "/books/test.fb2").unwrap();
/// assert_eq!(record.title, "Test Book");
/// assert_eq!(record.language.as_str(), "en");
/// ```
#[instrument(skip(xml, path), fields(size = xml.len()))]
pub fn parse(xml: &[u8], path: impl Into<PathBuf>) -> Result<Record> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut title: Option<String> = None;
    let mut language: Option<Language> = None;
    let mut authors: Vec<Name> = Vec::new();
    let mut genres: Vec<String> = Vec::new();

    let mut in_title_info = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => match start.name().local_name().as_ref() {
                b"title-info" => in_title_info = true,
                b"book-title" if in_title_info => {
                    let text = read_text(&mut reader, "book-title")?;
                    if title.is_none() && !text.is_empty() {
                        title = Some(text);
                    }
                },
                b"lang" if in_title_info => {
                    let text = read_text(&mut reader, "lang")?;
                    if language.is_none() && !text.is_empty() {
                        language = Some(Language::new(text));
                    }
                },
                b"genre" if in_title_info => {
                    let text = read_text(&mut reader, "genre")?;
                    if !text.is_empty() {
                        genres.push(text);
                    }
                },
                b"author" if in_title_info => authors.push(read_author(&mut reader)?),
                _ => {},
            },
            // Closing title-info means all the metadata we care about has
            // been seen; skip the body entirely.
            Ok(Event::End(end)) if end.name().local_name().as_ref() == b"title-info" => break,
            Ok(Event::Eof) => break,
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }

    let title = title.ok_or_raise(|| ErrorKind::MissingField("book-title"))?;
    if authors.is_empty() {
        exn::bail!(ErrorKind::MissingField("author"));
    }
    Ok(Record {
        title,
        language: language.unwrap_or_default(),
        authors,
        genres,
        path: path.into(),
    })
}

/// Checks that the bytes are a well-formed XML document, without extracting
/// anything.
///
/// Used by the verification sweep, which cares whether a file would survive
/// parsing but not whether its metadata is complete.
pub fn well_formed(xml: &[u8]) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return Ok(()),
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }
}

/// Collects the name parts of one `author` element.
///
/// Unlike the title-level fields, a missing or empty `first-name`/`last-name`
/// here is a content error: an author pair is what the catalog resolves
/// identity on.
fn read_author<R: BufRead>(reader: &mut Reader<R>) -> Result<Name> {
    let mut firstname: Option<String> = None;
    let mut lastname: Option<String> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => match start.name().local_name().as_ref() {
                b"first-name" => {
                    let text = read_text(reader, "first-name")?;
                    if firstname.is_none() && !text.is_empty() {
                        firstname = Some(text);
                    }
                },
                b"last-name" => {
                    let text = read_text(reader, "last-name")?;
                    if lastname.is_none() && !text.is_empty() {
                        lastname = Some(text);
                    }
                },
                _ => {},
            },
            Ok(Event::End(end)) if end.name().local_name().as_ref() == b"author" => break,
            Ok(Event::Eof) => {
                exn::bail!(ErrorKind::MalformedXml("unexpected EOF inside <author>".to_string()))
            },
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }

    let firstname = firstname.ok_or_raise(|| ErrorKind::MissingField("first-name"))?;
    let lastname = lastname.ok_or_raise(|| ErrorKind::MissingField("last-name"))?;
    Ok(Name::new(firstname, lastname))
}

/// Accumulates text content until the closing tag with the given local name.
pub(crate) fn read_text<R: BufRead>(reader: &mut Reader<R>, tag: &'static str) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(chunk)) => {
                let chunk = chunk.unescape().or_raise(|| ErrorKind::InvalidText(tag))?;
                text.push_str(&chunk);
            },
            Ok(Event::End(end)) if end.name().local_name().as_ref() == tag.as_bytes() => break,
            Ok(Event::Eof) => {
                exn::bail!(ErrorKind::MalformedXml(format!("unexpected EOF inside <{tag}>")))
            },
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VALID: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0" xmlns:l="http://www.w3.org/1999/xlink">
  <description>
    <title-info>
      <genre>sf</genre>
      <genre>sf_space</genre>
      <author>
        <first-name>Jane</first-name>
        <last-name>Doe</last-name>
      </author>
      <author>
        <first-name>John</first-name>
        <last-name>Smith</last-name>
      </author>
      <book-title>Test Book</book-title>
      <lang>en</lang>
    </title-info>
    <document-info>
      <author><nickname>scanner42</nickname></author>
    </document-info>
  </description>
  <body><section><p>Once upon a time.</p></section></body>
</FictionBook>"#;

    #[test]
    fn extracts_all_fields() {
        let record = parse(VALID, "/books/test.fb2").unwrap();
        assert_eq!(record.title, "Test Book");
        assert_eq!(record.language.as_str(), "en");
        assert_eq!(record.genres, vec!["sf".to_string(), "sf_space".to_string()]);
        assert_eq!(
            record.authors,
            vec![Name::new("Jane", "Doe"), Name::new("John", "Smith")]
        );
        assert_eq!(record.path, std::path::PathBuf::from("/books/test.fb2"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse(VALID, "/books/test.fb2").unwrap();
        let second = parse(VALID, "/books/test.fb2").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_lang_defaults_to_ru() {
        let xml = br#"<FictionBook><description><title-info>
            <author><first-name>A</first-name><last-name>B</last-name></author>
            <book-title>No Language</book-title>
        </title-info></description></FictionBook>"#;
        let record = parse(xml, "x.fb2").unwrap();
        assert_eq!(record.language.as_str(), "ru");
    }

    #[test]
    fn document_author_is_not_a_book_author() {
        // Only title-info authors count; document-info lists the typist.
        let record = parse(VALID, "x.fb2").unwrap();
        assert_eq!(record.authors.len(), 2);
    }

    #[test]
    fn missing_title_is_a_content_error() {
        let xml = br#"<FictionBook><description><title-info>
            <author><first-name>A</first-name><last-name>B</last-name></author>
        </title-info></description></FictionBook>"#;
        let error = parse(xml, "x.fb2").unwrap_err();
        assert_eq!(*error, ErrorKind::MissingField("book-title"));
    }

    #[test]
    fn missing_authors_is_a_content_error() {
        let xml = br#"<FictionBook><description><title-info>
            <book-title>Orphan</book-title>
        </title-info></description></FictionBook>"#;
        let error = parse(xml, "x.fb2").unwrap_err();
        assert_eq!(*error, ErrorKind::MissingField("author"));
    }

    #[rstest]
    #[case::truncated(&b"<FictionBook><description><title-info><book-title>Oops"[..])]
    #[case::mismatched(&b"<FictionBook><description></title-info></FictionBook>"[..])]
    fn malformed_xml_is_typed(#[case] xml: &[u8]) {
        let error = parse(xml, "x.fb2").unwrap_err();
        assert!(matches!(*error, ErrorKind::MalformedXml(_)));
    }

    #[test]
    fn empty_genres_are_dropped() {
        let xml = br#"<FictionBook><description><title-info>
            <genre></genre>
            <genre>det_classic</genre>
            <author><first-name>A</first-name><last-name>B</last-name></author>
            <book-title>T</book-title>
        </title-info></description></FictionBook>"#;
        let record = parse(xml, "x.fb2").unwrap();
        assert_eq!(record.genres, vec!["det_classic".to_string()]);
    }

    #[test]
    fn namespace_prefixes_are_irrelevant() {
        let xml = br#"<fb:FictionBook xmlns:fb="http://www.gribuser.ru/xml/fictionbook/2.0">
            <fb:description><fb:title-info>
                <fb:author><fb:first-name>A</fb:first-name><fb:last-name>B</fb:last-name></fb:author>
                <fb:book-title>Prefixed</fb:book-title>
            </fb:title-info></fb:description></fb:FictionBook>"#;
        let record = parse(xml, "x.fb2").unwrap();
        assert_eq!(record.title, "Prefixed");
    }
}
