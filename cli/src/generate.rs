//! Synthetic LDES-like datasets.

use crate::config::{BenchConfig, CANONICAL_QUADS};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Literal, NamedNode, Term};
use oxtree::Member;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod ex {
    use oxrdf::NamedNodeRef;

    pub const MEMBER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://example.org/vocab/Member");
    pub const VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://example.org/vocab/value");
    pub const EXTRA_PREDICATES: [NamedNodeRef<'_>; 4] = [
        NamedNodeRef::new_unchecked("https://example.org/vocab/tag"),
        NamedNodeRef::new_unchecked("https://example.org/vocab/attr"),
        NamedNodeRef::new_unchecked("https://example.org/vocab/prop"),
        NamedNodeRef::new_unchecked("https://example.org/vocab/rel"),
    ];
}

const MAX_VALUE: i64 = 1_000_000;

/// Generates the members of the dataset described by the configuration.
///
/// The same configuration always yields the same members.
pub fn generate(config: &BenchConfig) -> anyhow::Result<Vec<Member>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.members)
        .map(|i| {
            let size = rng.gen_range(config.min_quads..=config.max_quads);
            generate_member(&mut rng, &config.base, i, size)
        })
        .collect()
}

fn generate_member(
    rng: &mut StdRng,
    base: &str,
    index: usize,
    size: usize,
) -> anyhow::Result<Member> {
    let name = NamedNode::new(format!("{base}member/{index:05}"))?;
    let mut member = Member::with_capacity(name.clone(), size);
    member.push(name.clone(), rdf::TYPE, ex::MEMBER);
    member.push(
        name.clone(),
        rdfs::LABEL,
        Literal::new_simple_literal(format!("Member {index:05}")),
    );
    member.push(
        name.clone(),
        ex::VALUE,
        Literal::from(rng.gen_range(0..=MAX_VALUE)),
    );
    for _ in CANONICAL_QUADS..size {
        let predicate = ex::EXTRA_PREDICATES[rng.gen_range(0..ex::EXTRA_PREDICATES.len())];
        let object: Term = if rng.gen_bool(0.5) {
            Literal::new_simple_literal(random_letters(rng, 10)).into()
        } else {
            NamedNode::new(format!("{base}res/{}", random_letters(rng, 6)))?.into()
        };
        member.push(name.clone(), predicate, object);
    }
    Ok(member)
}

/// ASCII letters, lower and upper case.
fn random_letters(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| {
            let i = rng.gen_range(0..52_u8);
            char::from(if i < 26 { b'a' + i } else { b'A' + i - 26 })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE;
    use oxrdf::{GraphName, NamedOrBlankNode};
    use std::num::NonZeroUsize;
    use std::path::PathBuf;

    fn config(members: usize, seed: u64) -> BenchConfig {
        BenchConfig {
            members,
            min_quads: 6,
            max_quads: 30,
            batch_size: NonZeroUsize::MIN,
            seed,
            out_dir: PathBuf::from("out"),
            base: DEFAULT_BASE.into(),
        }
    }

    #[test]
    fn generation_is_deterministic() -> anyhow::Result<()> {
        assert_eq!(generate(&config(50, 7))?, generate(&config(50, 7))?);
        assert_ne!(generate(&config(50, 7))?, generate(&config(50, 8))?);
        Ok(())
    }

    #[test]
    fn members_are_well_formed() -> anyhow::Result<()> {
        let members = generate(&config(100, 42))?;
        assert_eq!(members.len(), 100);
        for (i, member) in members.iter().enumerate() {
            assert_eq!(
                member.name().as_str(),
                format!("https://example.org/ldes/member/{i:05}")
            );
            assert!((6..=30).contains(&member.len()));
            let name = NamedOrBlankNode::from(member.name().into_owned());
            let graph_name = GraphName::from(member.name().into_owned());
            for quad in member {
                assert_eq!(quad.subject, name);
                assert_eq!(quad.graph_name, graph_name);
            }
            let quads = member.quads();
            assert_eq!(quads[0].predicate, rdf::TYPE);
            assert_eq!(quads[0].object, Term::from(ex::MEMBER.into_owned()));
            assert_eq!(
                quads[1].object,
                Term::from(Literal::new_simple_literal(format!("Member {i:05}")))
            );
            assert_eq!(quads[2].predicate, ex::VALUE);
            assert!(quads[3..].iter().all(|quad| {
                ex::EXTRA_PREDICATES
                    .iter()
                    .any(|predicate| *predicate == quad.predicate)
            }));
        }
        Ok(())
    }

    #[test]
    fn fixed_member_size() -> anyhow::Result<()> {
        let mut config = config(20, 0);
        config.min_quads = 3;
        config.max_quads = 3;
        assert!(generate(&config)?.iter().all(|member| member.len() == 3));
        Ok(())
    }
}
