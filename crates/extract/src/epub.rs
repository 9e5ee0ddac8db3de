//! EPUB package-document (OPF) metadata parsing.
//!
//! EPUB metadata is reached through one level of indirection: the fixed
//! `META-INF/container.xml` entry names the real package document somewhere
//! inside the archive, and that OPF document carries the Dublin Core
//! elements. This module parses both documents from bytes; reading them out
//! of the archive is the caller's job.

use crate::error::{ErrorKind, Result};
use crate::fb2::read_text;
use crate::models::{Language, Name, Record};
use exn::{OptionExt, ResultExt};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::PathBuf;
use tracing::instrument;

/// Fixed archive entry that points at the package document.
pub const CONTAINER_ENTRY: &str = "META-INF/container.xml";

/// Extracts the package-document path from `META-INF/container.xml` bytes.
///
/// Returns the `full-path` attribute of the first `rootfile` element, which
/// is the archive-internal path of the OPF document to feed to [`parse`].
///
/// # Examples
///
/// ```
/// let xml = br#"<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
///   <rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles>
/// </container>"#;
/// assert_eq!(folio_extract::epub::rootfile(xml).unwrap(), "OEBPS/content.opf");
/// ```
#[instrument(skip(container), fields(size = container.len()))]
pub fn rootfile(container: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(container);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag) | Event::Empty(tag))
                if tag.name().local_name().as_ref() == b"rootfile" =>
            {
                let path = tag
                    .try_get_attribute("full-path")
                    .or_raise(|| ErrorKind::InvalidText("rootfile"))?
                    .ok_or_raise(|| ErrorKind::MissingField("full-path"))?
                    .unescape_value()
                    .or_raise(|| ErrorKind::InvalidText("full-path"))?
                    .into_owned();
                return Ok(path);
            },
            Ok(Event::Eof) => exn::bail!(ErrorKind::MissingField("rootfile")),
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }
}

/// Parses OPF package-document bytes into a [`Record`].
///
/// `path` should be the outer `.epub` archive, not the OPF entry name.
///
/// Dublin Core fields map as: first `dc:title` → title (required), first
/// `dc:creator` → the single author (required; split by
/// [`Name::from_creator`]), first `dc:language` → language (fallback when
/// absent), every `dc:subject` → a genre.
#[instrument(skip(opf, path), fields(size = opf.len()))]
pub fn parse(opf: &[u8], path: impl Into<PathBuf>) -> Result<Record> {
    let mut reader = Reader::from_reader(opf);
    reader.trim_text(true);

    let mut title: Option<String> = None;
    let mut creator: Option<String> = None;
    let mut language: Option<Language> = None;
    let mut genres: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => match tag.name().local_name().as_ref() {
                b"title" => {
                    let text = read_text(&mut reader, "title")?;
                    if title.is_none() && !text.is_empty() {
                        title = Some(text);
                    }
                },
                b"creator" => {
                    let text = read_text(&mut reader, "creator")?;
                    if creator.is_none() && !text.is_empty() {
                        creator = Some(text);
                    }
                },
                b"language" => {
                    let text = read_text(&mut reader, "language")?;
                    if language.is_none() && !text.is_empty() {
                        language = Some(Language::new(text));
                    }
                },
                b"subject" => {
                    let text = read_text(&mut reader, "subject")?;
                    if !text.is_empty() {
                        genres.push(text);
                    }
                },
                _ => {},
            },
            // The manifest/spine carry no bibliographic data; stop as soon
            // as the metadata section closes.
            Ok(Event::End(end)) if end.name().local_name().as_ref() == b"metadata" => break,
            Ok(Event::Eof) => break,
            Err(error) => exn::bail!(ErrorKind::MalformedXml(error.to_string())),
            Ok(_) => {},
        }
        buf.clear();
    }

    let title = title.ok_or_raise(|| ErrorKind::MissingField("title"))?;
    let creator = creator.ok_or_raise(|| ErrorKind::MissingField("creator"))?;
    Ok(Record {
        title,
        language: language.unwrap_or_default(),
        authors: vec![Name::from_creator(&creator)],
        genres,
        path: path.into(),
    })
}
