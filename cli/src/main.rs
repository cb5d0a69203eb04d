use crate::cli::{Args, Command, ReportFormat};
use crate::config::{BenchConfig, collection_iri};
use crate::report::{PathReport, Report};
use anyhow::Context;
use clap::Parser;
use oxrdf::NamedNode;
use oxtree::parser::DEFAULT_BATCH_SIZE;
use std::io::{self, Write, stdout};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod driver;
mod generate;
mod report;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Run {
            dataset,
            batch_size,
            format,
        } => {
            let config = BenchConfig::new(dataset, batch_size)?;
            generate_and_write(&config)?;
            let tree = driver::parse_tree_page(
                &config.tree_page_path(),
                config.collection()?,
                config.batch_size,
            )?;
            let jelly = driver::parse_jelly(&config.jelly_path(), config.batch_size)?;
            print_report(Some(&tree), Some(&jelly), format)
        }
        Command::Generate { dataset } => {
            let config = BenchConfig::new(dataset, DEFAULT_BATCH_SIZE)?;
            generate_and_write(&config)
        }
        Command::ParseTree {
            file,
            batch_size,
            collection,
            base,
            format,
        } => {
            let collection = if let Some(collection) = collection {
                NamedNode::new(&collection)
                    .with_context(|| format!("The collection IRI {collection} is invalid"))?
            } else {
                collection_iri(&base)?
            };
            let tree = driver::parse_tree_page(&file, collection, batch_size)?;
            print_report(Some(&tree), None, format)
        }
        Command::ParseJelly {
            file,
            batch_size,
            format,
        } => {
            let jelly = driver::parse_jelly(&file, batch_size)?;
            print_report(None, Some(&jelly), format)
        }
    }
}

fn generate_and_write(config: &BenchConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let members = generate::generate(config)?;
    info!(
        members = members.len(),
        quads = members.iter().map(oxtree::Member::len).sum::<usize>(),
        seed = config.seed,
        elapsed = ?start.elapsed(),
        "Dataset generated"
    );
    driver::write_tree_page(config, &members)?;
    driver::write_jelly(config, &members)?;
    Ok(())
}

fn print_report(
    tree: Option<&PathReport>,
    jelly: Option<&PathReport>,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    match format {
        ReportFormat::Text => {
            for report in [tree, jelly].into_iter().flatten() {
                writeln!(stdout)?;
                write!(stdout, "{report}")?;
            }
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &Report::new(tree, jelly))?;
            writeln!(stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![expect(clippy::panic_in_result_fn)]

    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use predicates::prelude::*;
    use serde_json::Value;

    fn cli_command() -> Result<Command> {
        Ok(Command::from_std(
            escargot::CargoBuild::new()
                .bin("oxtree-bench")
                .manifest_path(format!("{}/Cargo.toml", env!("CARGO_MANIFEST_DIR")))
                .run()?
                .command(),
        ))
    }

    const PAGE: &str = "<http://example.com/c> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://w3id.org/tree#Collection> .
<http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m1> .
<http://example.com/m1> <http://example.com/p> \"1\" <http://example.com/m1> .
<http://example.com/m1> <http://example.com/p> \"2\" <http://example.com/m1> .
<http://example.com/m1> <http://example.com/p> \"3\" <http://example.com/m1> .
<http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m2> .
<http://example.com/m2> <http://example.com/p> \"1\" <http://example.com/m2> .
<http://example.com/m2> <http://example.com/p> \"2\" <http://example.com/m2> .
<http://example.com/m2> <http://example.com/p> \"3\" <http://example.com/m2> .
# a comment
<http://example.com/m2> <http://example.com/p> \"4\" <http://example.com/m2> .
<http://example.com/m2> <http://example.com/p> \"5\" <http://example.com/m2> .
<http://example.com/c> <https://w3id.org/tree#member> <http://example.com/m3> .
<http://example.com/m3> <http://example.com/p> \"1\" <http://example.com/m3> .
not a statement
<http://example.com/m3> <http://example.com/p> \"2\" <http://example.com/m3> .
";

    fn json_stdout(command: &mut Command) -> Result<Value> {
        let output = command.assert().success().get_output().stdout.clone();
        Ok(serde_json::from_slice(&output)?)
    }

    #[test]
    fn cli_help() -> Result<()> {
        cli_command()?
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("Usage"));
        Ok(())
    }

    #[test]
    fn cli_run_text() -> Result<()> {
        let dir = TempDir::new()?;
        cli_command()?
            .arg("run")
            .arg("--members")
            .arg("25")
            .arg("--batch-size")
            .arg("10")
            .arg("--out-dir")
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "=== TREE profile (.tree.nq.gz) parsing ===",
            ))
            .stdout(predicate::str::contains("=== Jelly parsing ==="))
            .stdout(predicate::str::contains("Initial load time (not batched)"))
            .stdout(predicate::str::contains(
                "Total members processed in batches: 25",
            ))
            .stdout(predicate::str::contains("Batch 2: members=5"));
        dir.child("tree-page.tree.nq.gz")
            .assert(predicate::path::exists());
        dir.child("dataset.jelly.gz")
            .assert(predicate::path::exists());
        Ok(())
    }

    #[test]
    fn cli_run_json() -> Result<()> {
        let dir = TempDir::new()?;
        let report = json_stdout(
            cli_command()?
                .arg("run")
                .arg("--members")
                .arg("25")
                .arg("--batch-size")
                .arg("10")
                .arg("--out-dir")
                .arg(dir.path())
                .arg("--format")
                .arg("json"),
        )?;
        assert_eq!(report["tree"]["members"], 25);
        assert_eq!(report["jelly"]["members"], 25);
        assert_eq!(report["tree"]["quads"], report["jelly"]["quads"]);
        assert_eq!(report["tree"]["batches"].as_array().map(Vec::len), Some(3));
        assert_eq!(report["jelly"]["batches"].as_array().map(Vec::len), Some(3));
        assert!(report["jelly"]["load_seconds"].is_f64());
        assert_eq!(
            report["tree"]["batches"][0]["first_member"],
            "https://example.org/ldes/member/00000"
        );
        Ok(())
    }

    #[test]
    fn cli_generate_then_parse() -> Result<()> {
        let dir = TempDir::new()?;
        cli_command()?
            .arg("generate")
            .arg("--members")
            .arg("30")
            .arg("--min-quads")
            .arg("3")
            .arg("--max-quads")
            .arg("3")
            .arg("--out-dir")
            .arg(dir.path())
            .assert()
            .success()
            .stdout("");

        let tree = json_stdout(
            cli_command()?
                .arg("parse-tree")
                .arg("--file")
                .arg(dir.child("tree-page.tree.nq.gz").path())
                .arg("--batch-size")
                .arg("1000")
                .arg("--format")
                .arg("json"),
        )?;
        assert_eq!(tree["tree"]["members"], 30);
        assert_eq!(tree["tree"]["quads"], 90);
        assert_eq!(tree["tree"]["batches"].as_array().map(Vec::len), Some(1));
        assert!(tree.get("jelly").is_none());

        let jelly = json_stdout(
            cli_command()?
                .arg("parse-jelly")
                .arg("--file")
                .arg(dir.child("dataset.jelly.gz").path())
                .arg("--format")
                .arg("json"),
        )?;
        assert_eq!(jelly["jelly"]["members"], 30);
        assert_eq!(jelly["jelly"]["quads"], 90);
        Ok(())
    }

    #[test]
    fn cli_parse_page_with_other_base() -> Result<()> {
        let dir = TempDir::new()?;
        cli_command()?
            .arg("generate")
            .arg("--members")
            .arg("12")
            .arg("--base")
            .arg("http://example.com/feed/")
            .arg("--out-dir")
            .arg(dir.path())
            .assert()
            .success();
        let page = dir.child("tree-page.tree.nq.gz");

        let report = json_stdout(
            cli_command()?
                .arg("parse-tree")
                .arg("--file")
                .arg(page.path())
                .arg("--base")
                .arg("http://example.com/feed/")
                .arg("--format")
                .arg("json"),
        )?;
        assert_eq!(report["tree"]["members"], 12);

        cli_command()?
            .arg("parse-tree")
            .arg("--file")
            .arg(page.path())
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "No member marker of the collection has been found",
            ));
        Ok(())
    }

    #[test]
    fn cli_parse_plain_page() -> Result<()> {
        let dir = TempDir::new()?;
        let page = dir.child("page.nq");
        page.write_str(PAGE)?;
        cli_command()?
            .arg("parse-tree")
            .arg("--file")
            .arg(page.path())
            .arg("--collection")
            .arg("http://example.com/c")
            .arg("--batch-size")
            .arg("2")
            .assert()
            .success()
            .stdout(predicate::str::contains("Batch 0: members=2, quads=8"))
            .stdout(predicate::str::contains("Batch 1: members=1, quads=2"))
            .stdout(predicate::str::contains("Skipped lines:"));
        Ok(())
    }

    #[test]
    fn cli_invalid_quad_range() -> Result<()> {
        let dir = TempDir::new()?;
        cli_command()?
            .arg("generate")
            .arg("--min-quads")
            .arg("10")
            .arg("--max-quads")
            .arg("5")
            .arg("--out-dir")
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("--min-quads"));
        cli_command()?
            .arg("generate")
            .arg("--min-quads")
            .arg("2")
            .arg("--out-dir")
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least 3"));
        dir.child("tree-page.tree.nq.gz")
            .assert(predicate::path::missing());
        Ok(())
    }

    #[test]
    fn cli_zero_batch_size() -> Result<()> {
        cli_command()?
            .arg("run")
            .arg("--batch-size")
            .arg("0")
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn cli_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        cli_command()?
            .arg("parse-jelly")
            .arg("--file")
            .arg(dir.child("missing.jelly.gz").path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to open"));
        Ok(())
    }
}
