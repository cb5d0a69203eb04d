use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use oxjelly::{JellyParser, JellySerializer};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Literal, NamedNode};
use oxtree::{Member, TreeProfileParser, TreeProfileSerializer};
use std::hint::black_box;
use std::num::NonZeroUsize;

const BASE: &str = "https://example.org/ldes/";

fn members(count: usize) -> Vec<Member> {
    let vocab = |name: &str| NamedNode::new(format!("https://example.org/vocab/{name}")).unwrap();
    (0..count)
        .map(|i| {
            let name = NamedNode::new(format!("{BASE}member/{i:05}")).unwrap();
            let mut member = Member::new(name.clone());
            member.push(name.clone(), rdf::TYPE, vocab("Member"));
            member.push(
                name.clone(),
                rdfs::LABEL,
                Literal::new_simple_literal(format!("Member {i:05}")),
            );
            member.push(name.clone(), vocab("value"), Literal::from(i64::try_from(i).unwrap()));
            for j in 0..(i % 25) {
                member.push(
                    name.clone(),
                    vocab("tag"),
                    NamedNode::new(format!("{BASE}res/{j}")).unwrap(),
                );
            }
            member
        })
        .collect()
}

fn collection() -> NamedNode {
    NamedNode::new(format!("{BASE}collection")).unwrap()
}

fn tree_page(members: &[Member]) -> Vec<u8> {
    let mut serializer = TreeProfileSerializer::new(collection())
        .for_writer(Vec::new())
        .unwrap();
    for member in members {
        serializer.serialize_member(member).unwrap();
    }
    serializer.finish().unwrap()
}

fn jelly_stream(members: &[Member]) -> Vec<u8> {
    let mut serializer = JellySerializer::new().for_writer(Vec::new());
    for quad in members.iter().flat_map(Member::quads) {
        serializer.serialize_quad(quad).unwrap();
    }
    serializer.finish().unwrap()
}

fn write(c: &mut Criterion) {
    let members = members(1000);
    let quads = members.iter().map(Member::len).sum::<usize>();
    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Elements(quads as u64));
    group.bench_function("TREE profile page", |b| {
        b.iter(|| tree_page(black_box(&members)))
    });
    group.bench_function("Jelly stream", |b| {
        b.iter(|| jelly_stream(black_box(&members)))
    });
}

fn parse(c: &mut Criterion) {
    let members = members(1000);
    let page = tree_page(&members);
    let jelly = jelly_stream(&members);
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(members.len() as u64));
    for batch_size in [1, 100] {
        let batch_size = NonZeroUsize::new(batch_size).unwrap();
        group.bench_function(format!("TREE profile page in batches of {batch_size}"), |b| {
            b.iter(|| {
                TreeProfileParser::new(collection())
                    .with_batch_size(batch_size)
                    .parse_read(page.as_slice())
                    .unwrap()
            })
        });
    }
    group.bench_function("Jelly stream", |b| {
        b.iter(|| {
            for quad in JellyParser::new().for_reader(jelly.as_slice()) {
                quad.unwrap();
            }
        })
    });
    group.bench_function("Jelly stream unchecked", |b| {
        b.iter(|| {
            for quad in JellyParser::new().unchecked().for_reader(jelly.as_slice()) {
                quad.unwrap();
            }
        })
    });
}

criterion_group!(profile, write, parse);
criterion_main!(profile);
