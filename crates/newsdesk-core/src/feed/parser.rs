use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use super::models::RawEntry;
use crate::{Error, Result};

/// Entry child elements the aggregator cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Description,
    Link,
    Published,
    DcDate,
    Updated,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"summary" => Some(Self::Summary),
            b"description" => Some(Self::Description),
            b"link" => Some(Self::Link),
            b"pubDate" | b"published" | b"issued" => Some(Self::Published),
            b"date" => Some(Self::DcDate),
            b"updated" | b"modified" => Some(Self::Updated),
            _ => None,
        }
    }
}

/// Element being read inside an entry
struct OpenField {
    field: Field,
    text: String,
}

#[derive(Default)]
struct EntryBuilder {
    title: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    text_link: Option<String>,
    alternate_link: Option<String>,
    other_link: Option<String>,
    published: Option<String>,
    dc_date: Option<String>,
    updated: Option<String>,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Description => &mut self.description,
            Field::Link => &mut self.text_link,
            Field::Published => &mut self.published,
            Field::DcDate => &mut self.dc_date,
            Field::Updated => &mut self.updated,
        };

        // First occurrence wins
        if slot.is_none() {
            *slot = non_empty(text);
        }
    }

    /// Record an Atom style `<link href=".." rel=".."/>`
    fn add_link(&mut self, element: &BytesStart) {
        let mut href = None;
        let mut rel = None;

        for attr in element.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            match attr.key.as_ref() {
                b"href" => href = non_empty(value),
                b"rel" => rel = Some(value),
                _ => {}
            }
        }

        let Some(href) = href else {
            return;
        };

        match rel.as_deref() {
            None | Some("alternate") => {
                if self.alternate_link.is_none() {
                    self.alternate_link = Some(href);
                }
            }
            Some(_) => {
                if self.other_link.is_none() {
                    self.other_link = Some(href);
                }
            }
        }
    }

    fn finish(self) -> RawEntry {
        RawEntry {
            title: self.title,
            summary: self.summary,
            description: self.description,
            link: self.alternate_link.or(self.text_link).or(self.other_link),
            published: self.published.or(self.dc_date),
            updated: self.updated,
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

fn is_entry(name: &[u8]) -> bool {
    name == b"item" || name == b"entry"
}

/// Only unprefixed elements and the Dublin Core / Atom vocabularies are read,
/// so that e.g. `media:title` does not shadow the entry title.
fn is_known_namespace(element: &BytesStart) -> bool {
    match element.name().prefix() {
        None => true,
        Some(prefix) => matches!(prefix.as_ref(), b"dc" | b"atom" | b"dcterms"),
    }
}

fn text_content(text: &BytesText) -> String {
    text.unescape()
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
}

/// Extract the raw entries of an RSS 2.0, RSS 1.0 (RDF) or Atom document.
///
/// Entries are returned in document order. A well-formed document without
/// entries yields an empty list; broken XML is a [`Error::FeedParse`].
pub fn parse_entries(content: &[u8]) -> Result<Vec<RawEntry>> {
    let mut reader = Reader::from_reader(content);

    let mut entries = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    // Open elements below the current entry element
    let mut depth = 0usize;
    let mut field: Option<OpenField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match entry.as_mut() {
                None => {
                    if is_entry(e.local_name().as_ref()) {
                        entry = Some(EntryBuilder::default());
                        depth = 0;
                    }
                }
                Some(builder) => {
                    depth += 1;
                    if depth == 1 && is_known_namespace(&e) {
                        let local_name = e.local_name();
                        if local_name.as_ref() == b"link" {
                            builder.add_link(&e);
                        }
                        field = Field::from_local_name(local_name.as_ref()).map(|field| OpenField {
                            field,
                            text: String::new(),
                        });
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if let Some(builder) = entry.as_mut() {
                    if depth == 0 && e.local_name().as_ref() == b"link" && is_known_namespace(&e) {
                        builder.add_link(&e);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&text_content(&t));
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(_)) if entry.is_some() => {
                if depth == 0 {
                    if let Some(builder) = entry.take() {
                        entries.push(builder.finish());
                    }
                } else {
                    if depth == 1 {
                        if let (Some(open), Some(builder)) = (field.take(), entry.as_mut()) {
                            builder.set(open.field, open.text);
                        }
                    }
                    depth -= 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::FeedParse(format!(
                    "Invalid feed document at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    tracing::debug!("Parsed {} feed entries", entries.len());

    Ok(entries)
}
