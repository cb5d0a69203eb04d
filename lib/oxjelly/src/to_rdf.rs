use crate::jelly::rdf::rdf_literal::LiteralKind;
use crate::jelly::rdf::rdf_quad::{Graph, Object, Predicate, Subject};
use crate::jelly::rdf::rdf_stream_row::Row;
use crate::jelly::rdf::{
    PhysicalStreamType, RdfIri, RdfLiteral, RdfQuad, RdfStreamFrame, RdfStreamOptions,
    RdfStreamRow,
};
use crate::lookup_table::{DecoderLookupTable, MAX_TABLE_SIZE};
use crate::{JellyParseError, JellySyntaxError};
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, NamedOrBlankNode, Quad, Term};
use protobuf::Message;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::vec;

/// A [Jelly](https://w3id.org/jelly) quad stream parser.
///
/// Only physical quad streams without RDF-star or generalized statements are supported.
///
/// ```
/// use oxjelly::{JellyParser, JellySerializer};
/// use oxrdf::{BlankNodeRef, GraphNameRef, Literal, NamedNodeRef, QuadRef};
///
/// let mut serializer = JellySerializer::new().for_writer(Vec::new());
/// serializer.serialize_quad(QuadRef::new(
///     BlankNodeRef::new("b")?,
///     NamedNodeRef::new("http://schema.org/name")?,
///     &Literal::new_language_tagged_literal("Foo", "en")?,
///     GraphNameRef::DefaultGraph,
/// ))?;
/// let file = serializer.finish()?;
///
/// let mut count = 0;
/// for quad in JellyParser::new().for_reader(file.as_slice()) {
///     let quad = quad?;
///     assert!(quad.graph_name.is_default_graph());
///     count += 1;
/// }
/// assert_eq!(1, count);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct JellyParser {
    unchecked: bool,
}

impl JellyParser {
    /// Builds a new [`JellyParser`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assumes the stream is valid to make parsing faster.
    ///
    /// IRIs, blank node identifiers and language tags are not validated.
    #[inline]
    pub fn unchecked(mut self) -> Self {
        self.unchecked = true;
        self
    }

    /// Parses a Jelly stream from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderJellyParser<R> {
        ReaderJellyParser {
            reader: BufReader::new(reader),
            unchecked: self.unchecked,
            buffer: Vec::new(),
            rows: Vec::new().into_iter(),
            options_seen: false,
            prefixes: DecoderLookupTable::default(),
            names: DecoderLookupTable::default(),
            datatypes: DecoderLookupTable::default(),
            last_prefix_id: 0,
            last_name_id: 0,
            last_subject: None,
            last_predicate: None,
            last_object: None,
            last_graph_name: None,
            is_ended: false,
        }
    }
}

/// Parses a Jelly stream from a [`Read`] implementation.
///
/// Can be built using [`JellyParser::for_reader`].
/// The iterator stops after the first error.
#[must_use]
pub struct ReaderJellyParser<R: Read> {
    reader: BufReader<R>,
    unchecked: bool,
    buffer: Vec<u8>,
    rows: vec::IntoIter<RdfStreamRow>,
    options_seen: bool,
    prefixes: DecoderLookupTable,
    names: DecoderLookupTable,
    datatypes: DecoderLookupTable,
    last_prefix_id: u32,
    last_name_id: u32,
    last_subject: Option<NamedOrBlankNode>,
    last_predicate: Option<NamedNode>,
    last_object: Option<Term>,
    last_graph_name: Option<GraphName>,
    is_ended: bool,
}

impl<R: Read> Iterator for ReaderJellyParser<R> {
    type Item = Result<Quad, JellyParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_ended {
            if let Some(row) = self.rows.next() {
                match self.process_row(row.row) {
                    Ok(Some(quad)) => return Some(Ok(quad)),
                    Ok(None) => continue,
                    Err(e) => return Some(Err(self.fail(e.into()))),
                }
            }
            match self.read_frame() {
                Ok(Some(frame)) => self.rows = frame.rows.into_iter(),
                Ok(None) => self.is_ended = true,
                Err(e) => return Some(Err(self.fail(e))),
            }
        }
        None
    }
}

impl<R: Read> FusedIterator for ReaderJellyParser<R> {}

impl<R: Read> ReaderJellyParser<R> {
    fn fail(&mut self, error: JellyParseError) -> JellyParseError {
        self.is_ended = true;
        self.rows = Vec::new().into_iter();
        error
    }

    /// Reads the next length-delimited frame, `None` if the stream is over.
    fn read_frame(&mut self) -> Result<Option<RdfStreamFrame>, JellyParseError> {
        let Some(length) = self.read_frame_length()? else {
            return Ok(None);
        };
        self.buffer.clear();
        let read = (&mut self.reader)
            .take(length)
            .read_to_end(&mut self.buffer)?;
        if u64::try_from(read).ok() != Some(length) {
            return Err(JellySyntaxError::InvalidFrameLength.into());
        }
        Ok(Some(
            RdfStreamFrame::parse_from_bytes(&self.buffer).map_err(JellySyntaxError::from)?,
        ))
    }

    fn read_frame_length(&mut self) -> Result<Option<u64>, JellyParseError> {
        let mut length = 0_u64;
        let mut shift = 0_u32;
        loop {
            let byte = match self.reader.fill_buf() {
                Ok([]) if shift == 0 => return Ok(None),
                Ok([]) => return Err(JellySyntaxError::InvalidFrameLength.into()),
                Ok([byte, ..]) => *byte,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.reader.consume(1);
            if shift >= 64 {
                return Err(JellySyntaxError::InvalidFrameLength.into());
            }
            length |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(Some(length));
            }
            shift += 7;
        }
    }

    fn process_row(&mut self, row: Option<Row>) -> Result<Option<Quad>, JellySyntaxError> {
        match row {
            Some(Row::Options(options)) => {
                self.process_options(&options)?;
                Ok(None)
            }
            None => Ok(None),
            Some(_) if !self.options_seen => Err(JellySyntaxError::MissingOptions),
            Some(Row::Prefix(entry)) => {
                self.prefixes.set(entry.id, entry.value)?;
                Ok(None)
            }
            Some(Row::Name(entry)) => {
                self.names.set(entry.id, entry.value)?;
                Ok(None)
            }
            Some(Row::Datatype(entry)) => {
                self.datatypes.set(entry.id, entry.value)?;
                Ok(None)
            }
            Some(Row::Quad(quad)) => self.decode_quad(quad).map(Some),
        }
    }

    fn process_options(&mut self, options: &RdfStreamOptions) -> Result<(), JellySyntaxError> {
        if options.physical_type.enum_value() != Ok(PhysicalStreamType::PHYSICAL_STREAM_TYPE_QUADS)
        {
            return Err(JellySyntaxError::UnsupportedStream(
                "only physical quad streams are supported",
            ));
        }
        if options.rdf_star {
            return Err(JellySyntaxError::UnsupportedStream(
                "RDF-star streams are not supported",
            ));
        }
        if options.generalized_statements {
            return Err(JellySyntaxError::UnsupportedStream(
                "generalized statements are not supported",
            ));
        }
        for (table, size) in [
            ("prefix", options.max_prefix_table_size),
            ("name", options.max_name_table_size),
            ("datatype", options.max_datatype_table_size),
        ] {
            if size > MAX_TABLE_SIZE {
                return Err(JellySyntaxError::TableTooLarge(table, size));
            }
        }
        if !self.options_seen {
            self.prefixes = DecoderLookupTable::new(options.max_prefix_table_size);
            self.names = DecoderLookupTable::new(options.max_name_table_size);
            self.datatypes = DecoderLookupTable::new(options.max_datatype_table_size);
            self.options_seen = true;
        }
        Ok(())
    }

    fn decode_quad(&mut self, quad: RdfQuad) -> Result<Quad, JellySyntaxError> {
        let subject: NamedOrBlankNode = match quad.subject {
            Some(Subject::SIri(iri)) => self.decode_iri(&iri)?.into(),
            Some(Subject::SBnode(id)) => self.decode_blank_node(id)?.into(),
            Some(Subject::SLiteral(_)) => {
                return Err(JellySyntaxError::UnsupportedTerm("literal subject"));
            }
            None => self
                .last_subject
                .clone()
                .ok_or(JellySyntaxError::NoPreviousSubject)?,
        };
        let predicate = match quad.predicate {
            Some(Predicate::PIri(iri)) => self.decode_iri(&iri)?,
            Some(Predicate::PBnode(_)) => {
                return Err(JellySyntaxError::UnsupportedTerm("blank node predicate"));
            }
            Some(Predicate::PLiteral(_)) => {
                return Err(JellySyntaxError::UnsupportedTerm("literal predicate"));
            }
            None => self
                .last_predicate
                .clone()
                .ok_or(JellySyntaxError::NoPreviousPredicate)?,
        };
        let object: Term = match quad.object {
            Some(Object::OIri(iri)) => self.decode_iri(&iri)?.into(),
            Some(Object::OBnode(id)) => self.decode_blank_node(id)?.into(),
            Some(Object::OLiteral(literal)) => self.decode_literal(literal)?.into(),
            None => self
                .last_object
                .clone()
                .ok_or(JellySyntaxError::NoPreviousObject)?,
        };
        let graph_name: GraphName = match quad.graph {
            Some(Graph::GIri(iri)) => self.decode_iri(&iri)?.into(),
            Some(Graph::GBnode(id)) => self.decode_blank_node(id)?.into(),
            Some(Graph::GDefaultGraph(_)) => GraphName::DefaultGraph,
            Some(Graph::GLiteral(_)) => {
                return Err(JellySyntaxError::UnsupportedTerm("literal graph name"));
            }
            None => self
                .last_graph_name
                .clone()
                .ok_or(JellySyntaxError::NoPreviousGraphName)?,
        };
        self.last_subject = Some(subject.clone());
        self.last_predicate = Some(predicate.clone());
        self.last_object = Some(object.clone());
        self.last_graph_name = Some(graph_name.clone());
        Ok(Quad::new(subject, predicate, object, graph_name))
    }

    fn decode_iri(&mut self, iri: &RdfIri) -> Result<NamedNode, JellySyntaxError> {
        let prefix_id = if iri.prefix_id == 0 {
            self.last_prefix_id
        } else {
            iri.prefix_id
        };
        let name_id = if iri.name_id == 0 {
            self.last_name_id + 1
        } else {
            iri.name_id
        };
        let prefix = self
            .prefixes
            .get(prefix_id)
            .ok_or(JellySyntaxError::PrefixIdNotFound(prefix_id))?;
        let name = self
            .names
            .get(name_id)
            .ok_or(JellySyntaxError::NameIdNotFound(name_id))?;
        let iri = format!("{prefix}{name}");
        self.last_prefix_id = prefix_id;
        self.last_name_id = name_id;
        Ok(if self.unchecked {
            NamedNode::new_unchecked(iri)
        } else {
            NamedNode::new(iri)?
        })
    }

    fn decode_blank_node(&self, id: String) -> Result<BlankNode, JellySyntaxError> {
        Ok(if self.unchecked {
            BlankNode::new_unchecked(id)
        } else {
            BlankNode::new(id)?
        })
    }

    fn decode_literal(&self, literal: RdfLiteral) -> Result<Literal, JellySyntaxError> {
        Ok(match literal.literalKind {
            None => Literal::new_simple_literal(literal.lex),
            Some(LiteralKind::Langtag(language)) => {
                if self.unchecked {
                    Literal::new_language_tagged_literal_unchecked(literal.lex, language)
                } else {
                    Literal::new_language_tagged_literal(literal.lex, language)?
                }
            }
            Some(LiteralKind::Datatype(id)) => {
                let datatype = self
                    .datatypes
                    .get(id)
                    .ok_or(JellySyntaxError::DatatypeIdNotFound(id))?;
                let datatype = if self.unchecked {
                    NamedNode::new_unchecked(datatype)
                } else {
                    NamedNode::new(datatype)?
                };
                Literal::new_typed_literal(literal.lex, datatype)
            }
        })
    }
}
