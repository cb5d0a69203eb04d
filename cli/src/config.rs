use crate::cli::DatasetArgs;
use anyhow::{Context, ensure};
use oxrdf::NamedNode;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[cfg(test)]
pub const DEFAULT_BASE: &str = "https://example.org/ldes/";
pub const TREE_PAGE_FILE: &str = "tree-page.tree.nq.gz";
pub const JELLY_FILE: &str = "dataset.jelly.gz";

/// Every member carries a type, a label and a value.
pub const CANONICAL_QUADS: usize = 3;

/// Configuration of a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub members: usize,
    pub min_quads: usize,
    pub max_quads: usize,
    pub batch_size: NonZeroUsize,
    pub seed: u64,
    pub out_dir: PathBuf,
    pub base: String,
}

impl BenchConfig {
    pub fn new(dataset: DatasetArgs, batch_size: NonZeroUsize) -> anyhow::Result<Self> {
        ensure!(
            dataset.min_quads >= CANONICAL_QUADS,
            "--min-quads must be at least {CANONICAL_QUADS}, found {}",
            dataset.min_quads
        );
        ensure!(
            dataset.min_quads <= dataset.max_quads,
            "--min-quads ({}) must not be greater than --max-quads ({})",
            dataset.min_quads,
            dataset.max_quads
        );
        collection_iri(&dataset.base)?;
        Ok(Self {
            members: dataset.members,
            min_quads: dataset.min_quads,
            max_quads: dataset.max_quads,
            batch_size,
            seed: dataset.seed,
            out_dir: dataset.out_dir,
            base: dataset.base,
        })
    }

    pub fn collection(&self) -> anyhow::Result<NamedNode> {
        collection_iri(&self.base)
    }

    pub fn tree_page_path(&self) -> PathBuf {
        self.out_dir.join(TREE_PAGE_FILE)
    }

    pub fn jelly_path(&self) -> PathBuf {
        self.out_dir.join(JELLY_FILE)
    }
}

pub fn collection_iri(base: &str) -> anyhow::Result<NamedNode> {
    NamedNode::new(format!("{base}collection"))
        .with_context(|| format!("The base IRI {base} is invalid"))
}
