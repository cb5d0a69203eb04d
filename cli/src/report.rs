use oxtree::MemberBatch;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Number of batches shown in the text report.
const SAMPLE_BATCHES: usize = 3;

/// The measures of one of the parsing paths.
#[derive(Debug, Clone)]
pub struct PathReport {
    pub label: &'static str,
    /// One-time cost paid before the first batch, like loading a whole file in memory.
    pub load_time: Option<Duration>,
    pub batches: Vec<MemberBatch>,
    pub skipped_lines: u64,
}

impl PathReport {
    pub fn new(
        label: &'static str,
        load_time: Option<Duration>,
        batches: Vec<MemberBatch>,
        skipped_lines: u64,
    ) -> Self {
        Self {
            label,
            load_time,
            batches,
            skipped_lines,
        }
    }

    pub fn members(&self) -> usize {
        self.batches.iter().map(|batch| batch.members).sum()
    }

    pub fn quads(&self) -> usize {
        self.batches.iter().map(|batch| batch.quads).sum()
    }

    /// Sum of the batch times, excluding the load time.
    pub fn batch_time(&self) -> Duration {
        self.batches.iter().map(|batch| batch.elapsed).sum()
    }

    #[expect(clippy::cast_precision_loss)]
    fn throughput(&self, count: usize) -> Option<f64> {
        let seconds = self.batch_time().as_secs_f64();
        (seconds > 0.).then(|| count as f64 / seconds)
    }

    pub fn members_per_second(&self) -> Option<f64> {
        self.throughput(self.members())
    }

    pub fn quads_per_second(&self) -> Option<f64> {
        self.throughput(self.quads())
    }

    pub fn summary(&self) -> PathSummary<'_> {
        PathSummary {
            label: self.label,
            load_seconds: self.load_time.map(|time| time.as_secs_f64()),
            members: self.members(),
            quads: self.quads(),
            batch_seconds: self.batch_time().as_secs_f64(),
            members_per_second: self.members_per_second(),
            quads_per_second: self.quads_per_second(),
            skipped_lines: self.skipped_lines,
            batches: self
                .batches
                .iter()
                .map(|batch| BatchSummary {
                    index: batch.index,
                    members: batch.members,
                    quads: batch.quads,
                    seconds: batch.elapsed.as_secs_f64(),
                    first_member: &batch.first_member,
                    last_member: &batch.last_member,
                })
                .collect(),
        }
    }
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.label)?;
        if let Some(load_time) = self.load_time {
            writeln!(
                f,
                "Initial load time (not batched): {:.4}s",
                load_time.as_secs_f64()
            )?;
        }
        if !self.batches.is_empty() {
            writeln!(f, "Total members processed in batches: {}", self.members())?;
            writeln!(f, "Total quads processed in batches:   {}", self.quads())?;
            writeln!(
                f,
                "Sum of batch times:                 {:.4}s",
                self.batch_time().as_secs_f64()
            )?;
            if let Some(throughput) = self.members_per_second() {
                writeln!(f, "Throughput (members/s):            {throughput:.2}")?;
            }
            if let Some(throughput) = self.quads_per_second() {
                writeln!(f, "Throughput (quads/s):              {throughput:.2}")?;
            }
        }
        if self.skipped_lines > 0 {
            writeln!(f, "Skipped lines:                      {}", self.skipped_lines)?;
        }
        for batch in self.batches.iter().take(SAMPLE_BATCHES) {
            writeln!(
                f,
                "Batch {}: members={}, quads={}, time={:.4}s",
                batch.index,
                batch.members,
                batch.quads,
                batch.elapsed.as_secs_f64()
            )?;
        }
        Ok(())
    }
}

/// The JSON form of a [`PathReport`].
#[derive(Serialize)]
pub struct PathSummary<'a> {
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_seconds: Option<f64>,
    members: usize,
    quads: usize,
    batch_seconds: f64,
    members_per_second: Option<f64>,
    quads_per_second: Option<f64>,
    skipped_lines: u64,
    batches: Vec<BatchSummary<'a>>,
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    index: usize,
    members: usize,
    quads: usize,
    seconds: f64,
    first_member: &'a str,
    last_member: &'a str,
}

/// The report of a command: one entry per parsing path that has been run.
#[derive(Serialize)]
pub struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<PathSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jelly: Option<PathSummary<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(tree: Option<&'a PathReport>, jelly: Option<&'a PathReport>) -> Self {
        Self {
            tree: tree.map(PathReport::summary),
            jelly: jelly.map(PathReport::summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(index: usize, members: usize, quads: usize, millis: u64) -> MemberBatch {
        MemberBatch {
            index,
            members,
            quads,
            elapsed: Duration::from_millis(millis),
            first_member: format!("http://example.com/m{index}"),
            last_member: format!("http://example.com/m{index}-last"),
        }
    }

    #[test]
    fn totals_and_throughput() {
        let report = PathReport::new(
            "test",
            None,
            vec![batch(0, 2, 8, 500), batch(1, 1, 2, 500)],
            0,
        );
        assert_eq!(report.members(), 3);
        assert_eq!(report.quads(), 10);
        assert_eq!(report.batch_time(), Duration::from_secs(1));
        assert_eq!(report.members_per_second(), Some(3.));
        assert_eq!(report.quads_per_second(), Some(10.));
    }

    #[test]
    fn text_report() {
        let report = PathReport::new(
            "Jelly parsing",
            Some(Duration::from_millis(250)),
            vec![
                batch(0, 2, 8, 500),
                batch(1, 2, 6, 250),
                batch(2, 2, 4, 125),
                batch(3, 1, 2, 125),
            ],
            0,
        );
        assert_eq!(
            report.to_string(),
            "=== Jelly parsing ===
Initial load time (not batched): 0.2500s
Total members processed in batches: 7
Total quads processed in batches:   20
Sum of batch times:                 1.0000s
Throughput (members/s):            7.00
Throughput (quads/s):              20.00
Batch 0: members=2, quads=8, time=0.5000s
Batch 1: members=2, quads=6, time=0.2500s
Batch 2: members=2, quads=4, time=0.1250s
"
        );
    }

    #[test]
    fn empty_text_report() {
        let report = PathReport::new("empty", None, Vec::new(), 2);
        assert_eq!(
            report.to_string(),
            "=== empty ===\nSkipped lines:                      2\n"
        );
        assert_eq!(report.members_per_second(), None);
    }

    #[test]
    fn json_report() -> serde_json::Result<()> {
        let tree = PathReport::new("tree", None, vec![batch(0, 1, 3, 0)], 0);
        let value = serde_json::to_value(Report::new(Some(&tree), None))?;
        assert_eq!(value["tree"]["members"], 1);
        assert_eq!(value["tree"]["quads"], 3);
        assert!(value["tree"]["members_per_second"].is_null());
        assert!(value["tree"].get("load_seconds").is_none());
        assert_eq!(
            value["tree"]["batches"][0]["first_member"],
            "http://example.com/m0"
        );
        assert!(value.get("jelly").is_none());
        Ok(())
    }
}
