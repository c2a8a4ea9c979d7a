use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend-side lifecycle of a scrape job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed jobs never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// Returned by the backend as soon as a scrape is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
}

/// Read-only snapshot of a scrape job as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// Per-source summary the backend attaches to a finished scrape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub status: String,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub added: Option<i64>,
    #[serde(default)]
    pub removed: Option<i64>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScrapeJob {
    /// Decodes the `result` map; sources whose entry has an unexpected shape are skipped.
    pub fn source_outcomes(&self) -> BTreeMap<String, SourceOutcome> {
        let Some(serde_json::Value::Object(map)) = &self.result else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(source, value)| {
                serde_json::from_value::<SourceOutcome>(value.clone())
                    .ok()
                    .map(|outcome| (source.clone(), outcome))
            })
            .collect()
    }
}

/// One normalized job posting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: String,
}

/// One page of listings in server order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub listings: Vec<Listing>,
    pub total: u64,
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBucket {
    pub range: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

/// One completed scrape run. Counts are nullable on the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrapeHistoryEntry {
    pub date: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub added: Option<i64>,
    #[serde(default)]
    pub removed: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub retained: Option<i64>,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

/// Aggregated analytics payload. `scrape_history` arrives newest-first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendSnapshot {
    #[serde(default)]
    pub top_tags: Vec<TagCount>,
    #[serde(default)]
    pub salary_distribution: Vec<SalaryBucket>,
    #[serde(default)]
    pub top_companies: Vec<CompanyCount>,
    #[serde(default)]
    pub scrape_history: Vec<ScrapeHistoryEntry>,
    #[serde(default)]
    pub sources_breakdown: Vec<SourceCount>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
