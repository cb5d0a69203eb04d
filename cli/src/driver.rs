//! Writes the generated members in both formats and measures the batch parsing of both files.

use crate::config::BenchConfig;
use crate::generate::ex;
use crate::report::PathReport;
use anyhow::Context;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use oxjelly::{JellyParser, JellySerializer};
use oxrdf::{GraphName, NamedNode, Quad};
use oxtree::{Member, MemberBatch, MemberBatcher, TreeProfileParser, TreeProfileSerializer};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const TREE_LABEL: &str = "TREE profile (.tree.nq.gz) parsing";
pub const JELLY_LABEL: &str = "Jelly parsing";

/// Writes the members as a gzipped TREE profile page.
pub fn write_tree_page(config: &BenchConfig, members: &[Member]) -> anyhow::Result<()> {
    let path = config.tree_page_path();
    let start = Instant::now();
    let mut serializer = TreeProfileSerializer::new(config.collection()?)
        .with_relation(
            NamedNode::new(format!("{}page/1", config.base))?,
            ex::VALUE,
            0,
        )
        .for_writer(create_gz(&path)?)?;
    for member in members {
        serializer
            .serialize_member(member)
            .with_context(|| format!("Failed to write member {}", member.name()))?;
    }
    serializer.finish()?.finish()?.flush()?;
    info!(
        path = %path.display(),
        bytes = file_size(&path),
        elapsed = ?start.elapsed(),
        "TREE profile page written"
    );
    Ok(())
}

/// Writes the members as a gzipped Jelly stream, one named graph per member.
pub fn write_jelly(config: &BenchConfig, members: &[Member]) -> anyhow::Result<()> {
    let path = config.jelly_path();
    let start = Instant::now();
    let mut serializer = JellySerializer::new()
        .with_stream_name(config.collection()?.into_string())
        .for_writer(create_gz(&path)?);
    for quad in members.iter().flat_map(Member::quads) {
        serializer.serialize_quad(quad)?;
    }
    serializer.finish()?.finish()?.flush()?;
    info!(
        path = %path.display(),
        bytes = file_size(&path),
        elapsed = ?start.elapsed(),
        "Jelly stream written"
    );
    Ok(())
}

/// Streams a TREE profile page and groups its members into batches.
pub fn parse_tree_page(
    path: &Path,
    collection: NamedNode,
    batch_size: NonZeroUsize,
) -> anyhow::Result<PathReport> {
    let mut parser = TreeProfileParser::new(collection.clone())
        .with_batch_size(batch_size)
        .for_reader(open(path)?);
    let mut batches = Vec::new();
    for batch in &mut parser {
        let batch = batch.with_context(|| format!("Failed to parse {}", path.display()))?;
        log_batch(&batch);
        batches.push(batch);
    }
    let skipped_lines = parser.skipped_lines();
    if batches.is_empty() {
        warn!(%collection, "No member marker of the collection has been found");
    }
    if skipped_lines > 0 {
        warn!(
            skipped_lines,
            "Lines that are neither a member marker nor a statement have been skipped"
        );
    }
    let report = PathReport::new(TREE_LABEL, None, batches, skipped_lines);
    info!(
        members = report.members(),
        quads = report.quads(),
        "TREE profile page parsed"
    );
    Ok(report)
}

/// Loads a Jelly stream in memory then iterates over its graphs in member batches.
///
/// The graphs are iterated in an arbitrary order.
pub fn parse_jelly(path: &Path, batch_size: NonZeroUsize) -> anyhow::Result<PathReport> {
    let start = Instant::now();
    let mut dataset = HashMap::<GraphName, Vec<Quad>>::new();
    for quad in JellyParser::new().for_reader(open(path)?) {
        let quad = quad.with_context(|| format!("Failed to parse {}", path.display()))?;
        dataset
            .entry(quad.graph_name.clone())
            .or_default()
            .push(quad);
    }
    let load_time = start.elapsed();
    info!(graphs = dataset.len(), elapsed = ?load_time, "Jelly stream loaded");

    let mut batcher = MemberBatcher::new(batch_size);
    let mut batches = Vec::new();
    for (graph_name, quads) in &dataset {
        let name = match graph_name {
            GraphName::NamedNode(node) => node.as_str(),
            GraphName::BlankNode(node) => node.as_str(),
            GraphName::DefaultGraph => "",
        };
        if let Some(batch) = batcher.start_member(name) {
            log_batch(&batch);
            batches.push(batch);
        }
        batcher.add_quads(quads.len());
    }
    if let Some(batch) = batcher.finish() {
        log_batch(&batch);
        batches.push(batch);
    }
    let report = PathReport::new(JELLY_LABEL, Some(load_time), batches, 0);
    info!(
        members = report.members(),
        quads = report.quads(),
        "Jelly graphs iterated"
    );
    Ok(report)
}

fn log_batch(batch: &MemberBatch) {
    debug!(
        index = batch.index,
        members = batch.members,
        quads = batch.quads,
        elapsed = ?batch.elapsed,
        first_member = %batch.first_member,
        last_member = %batch.last_member,
        "batch"
    );
}

fn create_gz(path: &Path) -> anyhow::Result<GzEncoder<BufWriter<File>>> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(GzEncoder::new(BufWriter::new(file), Compression::default()))
}

/// Opens a file, decompressing it if its name ends with `.gz`.
fn open(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(if path.extension() == Some(OsStr::new("gz")) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    })
}

fn file_size(path: &Path) -> u64 {
    path.metadata().map_or(0, |metadata| metadata.len())
}
