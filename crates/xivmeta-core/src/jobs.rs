use serde::{Deserialize, Serialize};

/// One statistics row for a single job within a zone/boss context.
///
/// `score` and `count` are kept as the source formats them (locale
/// thousands separators included). Numeric parsing happens in [`crate::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job: String,
    pub score: String,
    pub count: String,
}

impl JobRecord {
    #[must_use]
    pub fn new(job: impl Into<String>, score: impl Into<String>, count: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            score: score.into(),
            count: count.into(),
        }
    }
}

#[must_use]
pub fn normalize_job_name(name: &str) -> String {
    name.trim().to_lowercase()
}
