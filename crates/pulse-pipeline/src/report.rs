//! Run report generation.

use chrono::{DateTime, Utc};
use pulse_core::types::Outcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statistics::RunStats;

/// Complete record of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Whether processed series were written to storage
    pub persist: bool,
    /// One outcome per instrument, in work-list order
    pub outcomes: Vec<Outcome>,
    pub stats: RunStats,
}

impl PipelineRun {
    /// Finish a run that began at `started_at`.
    pub fn new(started_at: DateTime<Utc>, persist: bool, outcomes: Vec<Outcome>) -> Self {
        let stats = RunStats::from_outcomes(&outcomes);
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            persist,
            outcomes,
            stats,
        }
    }

    /// Wall-clock duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Outcomes that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                    PIPELINE RUN SUMMARY                    \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Run ID:              {}\n", self.run_id));
        s.push_str(&format!(
            "  Started:             {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str(&format!("  Duration:            {} ms\n", self.duration_ms()));
        s.push_str(&format!(
            "  Mode:                {}\n",
            if self.persist { "fetch + transform + load" } else { "fetch + transform" }
        ));
        s.push('\n');

        s.push_str("INSTRUMENTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for outcome in &self.outcomes {
            if outcome.is_success() {
                let target = outcome.destination.as_deref().unwrap_or("-");
                s.push_str(&format!(
                    "  OK    {:<18} {:>5} rows  {}\n",
                    outcome.symbol, outcome.rows, target
                ));
            } else {
                s.push_str(&format!(
                    "  FAIL  {:<18} {}: {}\n",
                    outcome.symbol,
                    outcome.status,
                    outcome.detail.as_deref().unwrap_or("")
                ));
            }
        }
        s.push('\n');

        s.push_str("TOTALS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Attempted:           {}\n", self.stats.attempted));
        s.push_str(&format!("  Succeeded:           {}\n", self.stats.succeeded));
        s.push_str(&format!("  Failed:              {}\n", self.stats.failed));
        if self.stats.failed > 0 {
            s.push_str(&format!(
                "    fetch / transform / load: {} / {} / {}\n",
                self.stats.fetch_failed, self.stats.transform_failed, self.stats.load_failed
            ));
        }
        s.push_str(&format!("  Rows Processed:      {}\n", self.stats.rows_processed));
        s.push_str(&format!("  Success Rate:        {:.2}%\n", self.stats.success_rate));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
