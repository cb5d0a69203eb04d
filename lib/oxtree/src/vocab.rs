//! Provides ready to use [`NamedNodeRef`](oxrdf::NamedNodeRef)s for the vocabularies used by TREE pages.

pub mod tree {
    //! [TREE](https://w3id.org/tree/specification) hypermedia vocabulary.
    use oxrdf::NamedNodeRef;

    /// A collection of members.
    pub const COLLECTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#Collection");
    /// A page of a TREE collection.
    pub const NODE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://w3id.org/tree#Node");
    /// A relation to members whose path value is greater than or equal to the relation value.
    pub const GREATER_THAN_OR_EQUAL_TO_RELATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#GreaterThanOrEqualToRelation");
    /// Links a collection to one of its members.
    pub const MEMBER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#member");
    /// Links a collection to the root page of one of its views.
    pub const VIEW: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://w3id.org/tree#view");
    /// Links a page to one of its relations.
    pub const RELATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#relation");
    /// The page a relation points to.
    pub const NODE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#node");
    /// The value a relation compares member values against.
    pub const VALUE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://w3id.org/tree#value");
    /// The path to the member values a relation compares.
    pub const PATH: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://w3id.org/tree#path");
}
