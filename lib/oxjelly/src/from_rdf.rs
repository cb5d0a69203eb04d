use crate::jelly::rdf::rdf_literal::LiteralKind;
use crate::jelly::rdf::rdf_quad::{Graph, Object, Predicate, Subject};
use crate::jelly::rdf::{
    LogicalStreamType, PhysicalStreamType, RdfDatatypeEntry, RdfDefaultGraph, RdfIri, RdfLiteral,
    RdfNameEntry, RdfPrefixEntry, RdfQuad, RdfStreamFrame, RdfStreamOptions, RdfStreamRow,
};
use crate::lookup_table::{EncoderLookupTable, MAX_TABLE_SIZE};
use crate::PROTOCOL_VERSION;
use oxrdf::vocab::xsd;
use oxrdf::{
    GraphName, GraphNameRef, LiteralRef, NamedNode, NamedNodeRef, NamedOrBlankNode,
    NamedOrBlankNodeRef, QuadRef, Term, TermRef,
};
use protobuf::{EnumOrUnknown, Message};
use std::io::{self, Write};

const MIN_TABLE_SIZE: u32 = 8;

/// A [Jelly](https://w3id.org/jelly) quad stream serializer.
///
/// ```
/// use oxjelly::JellySerializer;
/// use oxrdf::{GraphNameRef, LiteralRef, NamedNodeRef, QuadRef};
///
/// let mut serializer = JellySerializer::new()
///     .with_stream_name("example")
///     .with_frame_size(16)
///     .for_writer(Vec::new());
/// serializer.serialize_quad(QuadRef::new(
///     NamedNodeRef::new("http://example.com/s")?,
///     NamedNodeRef::new("http://example.com/p")?,
///     LiteralRef::new_simple_literal("o"),
///     GraphNameRef::DefaultGraph,
/// ))?;
/// assert!(!serializer.finish()?.is_empty());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct JellySerializer {
    stream_name: String,
    max_name_table_size: u32,
    max_prefix_table_size: u32,
    max_datatype_table_size: u32,
    frame_size: usize,
}

impl Default for JellySerializer {
    fn default() -> Self {
        Self {
            stream_name: String::new(),
            max_name_table_size: 4000,
            max_prefix_table_size: 150,
            max_datatype_table_size: 32,
            frame_size: 256,
        }
    }
}

impl JellySerializer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_stream_name(mut self, stream_name: impl Into<String>) -> Self {
        self.stream_name = stream_name.into();
        self
    }

    /// Sets the size of the IRI name lookup table (4000 by default, at least 8 and at most 2^20).
    #[inline]
    pub fn with_max_name_table_size(mut self, size: u32) -> Self {
        self.max_name_table_size = size.clamp(MIN_TABLE_SIZE, MAX_TABLE_SIZE);
        self
    }

    /// Sets the size of the IRI prefix lookup table (150 by default, at least 8 and at most 2^20).
    #[inline]
    pub fn with_max_prefix_table_size(mut self, size: u32) -> Self {
        self.max_prefix_table_size = size.clamp(MIN_TABLE_SIZE, MAX_TABLE_SIZE);
        self
    }

    /// Sets the size of the datatype lookup table (32 by default, at least 8 and at most 2^20).
    #[inline]
    pub fn with_max_datatype_table_size(mut self, size: u32) -> Self {
        self.max_datatype_table_size = size.clamp(MIN_TABLE_SIZE, MAX_TABLE_SIZE);
        self
    }

    /// Sets the number of rows after which a frame is written (256 by default).
    #[inline]
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size.max(1);
        self
    }

    /// Writes a Jelly stream to a [`Write`] implementation.
    pub fn for_writer<W: Write>(self, writer: W) -> WriterJellySerializer<W> {
        let mut options_row = RdfStreamRow::new();
        options_row.set_options(RdfStreamOptions {
            stream_name: self.stream_name,
            physical_type: EnumOrUnknown::new(PhysicalStreamType::PHYSICAL_STREAM_TYPE_QUADS),
            logical_type: EnumOrUnknown::new(LogicalStreamType::LOGICAL_STREAM_TYPE_FLAT_QUADS),
            max_name_table_size: self.max_name_table_size,
            max_prefix_table_size: self.max_prefix_table_size,
            max_datatype_table_size: self.max_datatype_table_size,
            version: PROTOCOL_VERSION,
            ..Default::default()
        });
        WriterJellySerializer {
            writer,
            frame_size: self.frame_size,
            rows: vec![options_row],
            buffer: Vec::new(),
            prefixes: EncoderLookupTable::new(self.max_prefix_table_size),
            names: EncoderLookupTable::new(self.max_name_table_size),
            datatypes: EncoderLookupTable::new(self.max_datatype_table_size),
            last_prefix_id: 0,
            last_name_id: 0,
            last_subject: None,
            last_predicate: None,
            last_object: None,
            last_graph_name: None,
        }
    }
}

/// Writes a Jelly stream to a [`Write`] implementation. Can be built using [`JellySerializer::for_writer`].
#[must_use]
pub struct WriterJellySerializer<W: Write> {
    writer: W,
    frame_size: usize,
    rows: Vec<RdfStreamRow>,
    buffer: Vec<u8>,
    prefixes: EncoderLookupTable,
    names: EncoderLookupTable,
    datatypes: EncoderLookupTable,
    last_prefix_id: u32,
    last_name_id: u32,
    last_subject: Option<NamedOrBlankNode>,
    last_predicate: Option<NamedNode>,
    last_object: Option<Term>,
    last_graph_name: Option<GraphName>,
}

impl<W: Write> WriterJellySerializer<W> {
    /// Writes an extra quad.
    pub fn serialize_quad<'a>(&mut self, quad: impl Into<QuadRef<'a>>) -> io::Result<()> {
        let quad = quad.into();
        let mut row = RdfQuad::new();

        if self.last_subject.as_ref().map(NamedOrBlankNode::as_ref) != Some(quad.subject) {
            row.subject = Some(match quad.subject {
                NamedOrBlankNodeRef::NamedNode(node) => Subject::SIri(self.encode_iri(node)),
                NamedOrBlankNodeRef::BlankNode(node) => Subject::SBnode(node.as_str().into()),
            });
            self.last_subject = Some(quad.subject.into_owned());
        }

        if self.last_predicate.as_ref().map(NamedNode::as_ref) != Some(quad.predicate) {
            row.predicate = Some(Predicate::PIri(self.encode_iri(quad.predicate)));
            self.last_predicate = Some(quad.predicate.into_owned());
        }

        if self.last_object.as_ref().map(Term::as_ref) != Some(quad.object) {
            row.object = Some(match quad.object {
                TermRef::NamedNode(node) => Object::OIri(self.encode_iri(node)),
                TermRef::BlankNode(node) => Object::OBnode(node.as_str().into()),
                TermRef::Literal(literal) => Object::OLiteral(self.encode_literal(literal)),
                #[expect(unreachable_patterns)]
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Jelly streams without RDF-star can't contain triple terms",
                    ));
                }
            });
            self.last_object = Some(quad.object.into_owned());
        }

        if self.last_graph_name.as_ref().map(GraphName::as_ref) != Some(quad.graph_name) {
            row.graph = Some(match quad.graph_name {
                GraphNameRef::NamedNode(node) => Graph::GIri(self.encode_iri(node)),
                GraphNameRef::BlankNode(node) => Graph::GBnode(node.as_str().into()),
                GraphNameRef::DefaultGraph => Graph::GDefaultGraph(RdfDefaultGraph::new()),
            });
            self.last_graph_name = Some(quad.graph_name.into_owned());
        }

        let mut stream_row = RdfStreamRow::new();
        stream_row.set_quad(row);
        self.rows.push(stream_row);
        if self.rows.len() >= self.frame_size {
            self.flush_frame()?;
        }
        Ok(())
    }

    /// Writes the last frame and returns the underlying [`Write`].
    pub fn finish(mut self) -> io::Result<W> {
        if !self.rows.is_empty() {
            self.flush_frame()?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        let frame = RdfStreamFrame {
            rows: std::mem::take(&mut self.rows),
            ..Default::default()
        };
        self.buffer.clear();
        frame
            .write_length_delimited_to_vec(&mut self.buffer)
            .map_err(io::Error::other)?;
        self.writer.write_all(&self.buffer)
    }

    fn encode_iri(&mut self, iri: NamedNodeRef<'_>) -> RdfIri {
        let iri = iri.as_str();
        let (prefix, name) = iri
            .rfind(['#', '/'])
            .map_or(("", iri), |i| iri.split_at(i + 1));

        let (prefix_id, entry_id) = self.prefixes.get_or_insert(prefix);
        if let Some(id) = entry_id {
            let mut row = RdfStreamRow::new();
            row.set_prefix(RdfPrefixEntry {
                id,
                value: prefix.into(),
                ..Default::default()
            });
            self.rows.push(row);
        }
        let (name_id, entry_id) = self.names.get_or_insert(name);
        if let Some(id) = entry_id {
            let mut row = RdfStreamRow::new();
            row.set_name(RdfNameEntry {
                id,
                value: name.into(),
                ..Default::default()
            });
            self.rows.push(row);
        }

        let encoded = RdfIri {
            prefix_id: if prefix_id == self.last_prefix_id {
                0
            } else {
                prefix_id
            },
            name_id: if name_id == self.last_name_id + 1 {
                0
            } else {
                name_id
            },
            ..Default::default()
        };
        self.last_prefix_id = prefix_id;
        self.last_name_id = name_id;
        encoded
    }

    fn encode_literal(&mut self, literal: LiteralRef<'_>) -> RdfLiteral {
        let kind = if let Some(language) = literal.language() {
            Some(LiteralKind::Langtag(language.into()))
        } else if literal.datatype() == xsd::STRING {
            None
        } else {
            let datatype = literal.datatype().as_str();
            let (id, entry_id) = self.datatypes.get_or_insert(datatype);
            if let Some(entry_id) = entry_id {
                let mut row = RdfStreamRow::new();
                row.set_datatype(RdfDatatypeEntry {
                    id: entry_id,
                    value: datatype.into(),
                    ..Default::default()
                });
                self.rows.push(row);
            }
            Some(LiteralKind::Datatype(id))
        };
        RdfLiteral {
            lex: literal.value().into(),
            literalKind: kind,
            ..Default::default()
        }
    }
}
