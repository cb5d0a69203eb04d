//! A streaming batch parser for [TREE profile](https://treecg.github.io/specification/profile) pages implemented by [`TreeProfileParser`].

use crate::batch::{MemberBatch, MemberBatcher};
use crate::vocab::tree;
use oxrdf::NamedNode;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

/// Number of members per batch used when [`TreeProfileParser::with_batch_size`] is not called.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// A streaming parser for [TREE profile](https://treecg.github.io/specification/profile) pages
/// that groups members into batches of a fixed number of members.
///
/// It relies on the profile layout: a member starts with a `<collection> tree:member <member> .` marker
/// and all the statements until the next marker belong to it.
/// Statements are only counted, they are not parsed.
/// Statements before the first marker, like the hypermedia block, are not counted.
///
/// Lines that are neither a marker nor a statement are skipped.
///
/// ```
/// use oxrdf::NamedNode;
/// use oxtree::TreeProfileParser;
/// use std::num::NonZeroUsize;
///
/// let file = br#"<http://example.com/c> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://w3id.org/tree#Collection> .
/// <http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m1> .
/// <http://example.com/m1> <http://example.com/p> "a" <http://example.com/m1> .
/// <http://example.com/m1> <http://example.com/p> "b" <http://example.com/m1> .
/// <http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m2> .
/// <http://example.com/m2> <http://example.com/p> "c" <http://example.com/m2> ."#;
///
/// let batches = TreeProfileParser::new(NamedNode::new("http://example.com/c")?)
///     .with_batch_size(NonZeroUsize::new(2).unwrap())
///     .parse_read(file.as_ref())?;
/// assert_eq!(batches.len(), 1);
/// assert_eq!(batches[0].members, 2);
/// assert_eq!(batches[0].quads, 3);
/// assert_eq!(batches[0].last_member, "http://example.com/m2");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct TreeProfileParser {
    collection: NamedNode,
    batch_size: NonZeroUsize,
}

impl TreeProfileParser {
    /// Builds a new [`TreeProfileParser`] for the pages of the given collection.
    #[inline]
    pub fn new(collection: impl Into<NamedNode>) -> Self {
        Self {
            collection: collection.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the number of members per batch (100 by default).
    #[inline]
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Parses a page from a [`Read`] implementation.
    ///
    /// Batches are returned as soon as they are complete.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderTreeProfileParser<R> {
        ReaderTreeProfileParser {
            reader: BufReader::new(reader),
            marker: format!("{} {} <", self.collection, tree::MEMBER),
            line: String::new(),
            batcher: MemberBatcher::new(self.batch_size),
            skipped_lines: 0,
            is_ended: false,
        }
    }

    /// Parses a whole page from a [`Read`] implementation and returns all its batches.
    pub fn parse_read(self, reader: impl Read) -> io::Result<Vec<MemberBatch>> {
        self.for_reader(reader).collect()
    }
}

/// Parses a TREE profile page from a [`Read`] implementation. Can be built using [`TreeProfileParser::for_reader`].
#[must_use]
pub struct ReaderTreeProfileParser<R: Read> {
    reader: BufReader<R>,
    marker: String,
    line: String,
    batcher: MemberBatcher,
    skipped_lines: u64,
    is_ended: bool,
}

impl<R: Read> ReaderTreeProfileParser<R> {
    /// The number of lines skipped so far because they were neither a marker nor a statement.
    #[inline]
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }
}

impl<R: Read> Iterator for ReaderTreeProfileParser<R> {
    type Item = io::Result<MemberBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_ended {
            return None;
        }
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.is_ended = true;
                    return self.batcher.finish().map(Ok);
                }
                Ok(_) => (),
                Err(e) => {
                    self.is_ended = true;
                    return Some(Err(e));
                }
            }
            match classify(&self.line, &self.marker) {
                Line::Ignored => (),
                Line::Marker(name) => {
                    if let Some(batch) = self.batcher.start_member(name) {
                        return Some(Ok(batch));
                    }
                }
                Line::Statement => {
                    self.batcher.add_quads(1);
                }
                Line::Malformed => self.skipped_lines += 1,
            }
        }
    }
}

impl<R: Read> FusedIterator for ReaderTreeProfileParser<R> {}

#[derive(Debug, Eq, PartialEq)]
enum Line<'a> {
    Ignored,
    Marker(&'a str),
    Statement,
    Malformed,
}

fn classify<'a>(line: &'a str, marker: &str) -> Line<'a> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Ignored;
    }
    if let Some(rest) = line.strip_prefix(marker) {
        // Only the prefix matters, the member IRI ends at the first '>' or whitespace
        let end = rest
            .find('>')
            .or_else(|| rest.find(char::is_whitespace))
            .unwrap_or(rest.len());
        return Line::Marker(&rest[..end]);
    }
    if (line.starts_with('<') || line.starts_with("_:")) && line.ends_with('.') {
        Line::Statement
    } else {
        Line::Malformed
    }
}
