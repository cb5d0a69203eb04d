//! A [TREE profile](https://treecg.github.io/specification/profile) page serializer implemented by [`TreeProfileSerializer`].

use crate::error::{MalformedTermError, TreeSerializeError};
use crate::member::Member;
use crate::vocab::tree;
use oxrdf::vocab::rdf;
use oxrdf::{GraphNameRef, Literal, NamedNode, NamedOrBlankNodeRef, QuadRef, TermRef};
use std::io::{self, Write};

/// A [TREE profile](https://treecg.github.io/specification/profile) page serializer.
///
/// The page starts with a hypermedia block describing the collection, its view and, optionally, a relation to a next page.
/// Each member is then written as a `<collection> tree:member <member> .` marker
/// immediately followed by all the member quads in N-Quads.
///
/// ```
/// use oxrdf::vocab::rdfs;
/// use oxrdf::{Literal, NamedNode};
/// use oxtree::{Member, TreeProfileSerializer};
///
/// let name = NamedNode::new("http://example.com/m1")?;
/// let mut member = Member::new(name.clone());
/// member.push(name, rdfs::LABEL, Literal::new_simple_literal("m1"));
///
/// let mut serializer = TreeProfileSerializer::new(NamedNode::new("http://example.com/c")?)
///     .with_view(NamedNode::new("http://example.com/page/0")?)
///     .for_writer(Vec::new())?;
/// serializer.serialize_member(&member)?;
/// let page = String::from_utf8(serializer.finish()?)?;
/// assert!(page.ends_with(
///     "<http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m1> .\n\
///      <http://example.com/m1> <http://www.w3.org/2000/01/rdf-schema#label> \"m1\" <http://example.com/m1> .\n"
/// ));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct TreeProfileSerializer {
    collection: NamedNode,
    view: Option<NamedNode>,
    relation: Option<Relation>,
}

#[derive(Clone, Debug)]
struct Relation {
    node: NamedNode,
    path: NamedNode,
    value: i64,
}

impl TreeProfileSerializer {
    /// Builds a new [`TreeProfileSerializer`] for the given collection.
    #[inline]
    pub fn new(collection: impl Into<NamedNode>) -> Self {
        Self {
            collection: collection.into(),
            view: None,
            relation: None,
        }
    }

    /// Sets the IRI of the page.
    ///
    /// By default, the page refers to itself with the relative IRI `<>`.
    #[inline]
    pub fn with_view(mut self, view: impl Into<NamedNode>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Adds a `tree:GreaterThanOrEqualToRelation` to the `node` page
    /// for the members whose value at `path` is greater than or equal to `value`.
    #[inline]
    pub fn with_relation(
        mut self,
        node: impl Into<NamedNode>,
        path: impl Into<NamedNode>,
        value: i64,
    ) -> Self {
        self.relation = Some(Relation {
            node: node.into(),
            path: path.into(),
            value,
        });
        self
    }

    /// Writes a page to a [`Write`] implementation.
    ///
    /// The hypermedia block is written immediately.
    pub fn for_writer<W: Write>(self, mut writer: W) -> io::Result<WriterTreeProfileSerializer<W>> {
        self.write_hypermedia(&mut writer)?;
        Ok(WriterTreeProfileSerializer {
            writer,
            marker: format!("{} {}", self.collection, tree::MEMBER),
            buffer: Vec::new(),
        })
    }

    fn write_hypermedia(&self, mut writer: impl Write) -> io::Result<()> {
        let view = self
            .view
            .as_ref()
            .map_or_else(|| "<>".into(), ToString::to_string);
        let collection = &self.collection;
        writeln!(writer, "{view} {} {} .", rdf::TYPE, tree::NODE)?;
        writeln!(writer, "{collection} {} {} .", rdf::TYPE, tree::COLLECTION)?;
        writeln!(writer, "{collection} {} {view} .", tree::VIEW)?;
        if let Some(relation) = &self.relation {
            writeln!(writer, "{view} {} _:r1 .", tree::RELATION)?;
            writeln!(
                writer,
                "_:r1 {} {} .",
                rdf::TYPE,
                tree::GREATER_THAN_OR_EQUAL_TO_RELATION
            )?;
            writeln!(writer, "_:r1 {} {} .", tree::NODE_PROPERTY, relation.node)?;
            writeln!(
                writer,
                "_:r1 {} {} .",
                tree::VALUE,
                Literal::from(relation.value)
            )?;
            writeln!(writer, "_:r1 {} {} .", tree::PATH, relation.path)?;
        }
        Ok(())
    }
}

/// Writes a TREE profile page to a [`Write`] implementation. Can be built using [`TreeProfileSerializer::for_writer`].
#[must_use]
pub struct WriterTreeProfileSerializer<W: Write> {
    writer: W,
    marker: String,
    buffer: Vec<u8>,
}

impl<W: Write> WriterTreeProfileSerializer<W> {
    /// Writes a member: its marker then all its quads.
    ///
    /// If one of the quads can't be written, nothing of the member is written.
    pub fn serialize_member(&mut self, member: &Member) -> Result<(), TreeSerializeError> {
        self.buffer.clear();
        writeln!(self.buffer, "{} {} .", self.marker, member.name())?;
        for quad in member {
            write_quad(quad.as_ref(), &mut self.buffer)?;
        }
        self.writer.write_all(&self.buffer)?;
        Ok(())
    }

    /// Ends the write process and returns the underlying [`Write`].
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_quad(quad: QuadRef<'_>, buffer: &mut Vec<u8>) -> Result<(), TreeSerializeError> {
    match quad.subject {
        NamedOrBlankNodeRef::NamedNode(node) => write!(buffer, "{node} ")?,
        NamedOrBlankNodeRef::BlankNode(node) => {
            return Err(malformed(node.to_string(), "subject"));
        }
    }
    write!(buffer, "{} ", quad.predicate)?;
    match quad.object {
        TermRef::NamedNode(node) => write!(buffer, "{node} ")?,
        TermRef::Literal(literal) => write!(buffer, "{literal} ")?,
        other => return Err(malformed(other.to_string(), "object")),
    }
    match quad.graph_name {
        GraphNameRef::NamedNode(node) => writeln!(buffer, "{node} .")?,
        other => return Err(malformed(other.to_string(), "graph name")),
    }
    Ok(())
}

fn malformed(term: String, position: &'static str) -> TreeSerializeError {
    MalformedTermError { term, position }.into()
}
