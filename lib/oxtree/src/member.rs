use oxrdf::{NamedNode, NamedNodeRef, NamedOrBlankNode, Quad, Term};
use std::slice;

/// A member of a TREE collection: a named bundle of quads whose graph name is the member name.
///
/// The quads are only added through [`Member::push`], so every quad of the bundle always belongs to it.
///
/// ```
/// use oxrdf::vocab::rdf;
/// use oxrdf::{GraphName, NamedNode};
/// use oxtree::Member;
///
/// let name = NamedNode::new("http://example.com/member/1")?;
/// let mut member = Member::new(name.clone());
/// member.push(name.clone(), rdf::TYPE, NamedNode::new("http://example.com/Member")?);
/// assert_eq!(member.len(), 1);
/// assert_eq!(member.quads()[0].graph_name, GraphName::from(name));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Member {
    name: NamedNode,
    quads: Vec<Quad>,
}

impl Member {
    #[inline]
    pub fn new(name: impl Into<NamedNode>) -> Self {
        Self {
            name: name.into(),
            quads: Vec::new(),
        }
    }

    /// Builds an empty member with room for `capacity` quads.
    #[inline]
    pub fn with_capacity(name: impl Into<NamedNode>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            quads: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn name(&self) -> NamedNodeRef<'_> {
        self.name.as_ref()
    }

    /// Adds a quad to the member, in the member graph.
    pub fn push(
        &mut self,
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) {
        self.quads.push(Quad::new(
            subject,
            predicate,
            object,
            self.name.clone(),
        ));
    }

    #[inline]
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Quad> {
        self.quads.iter()
    }
}

impl<'a> IntoIterator for &'a Member {
    type Item = &'a Quad;
    type IntoIter = slice::Iter<'a, Quad>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
