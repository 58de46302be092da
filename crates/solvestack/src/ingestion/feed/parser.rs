use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::catalog::SolutionPossibility;
use crate::ingestion::candidate::CandidateRecord;
use crate::ingestion::normalizer::{classify_solution, clean_text, humanize};

pub(crate) fn parse_candidates<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut candidates = Vec::new();

    for row in csv_reader.deserialize::<FeedRow>() {
        candidates.push(row?.into_candidate());
    }

    Ok(candidates)
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    title: String,
    #[serde(default)]
    description: String,
    source: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source_id: Option<String>,
    reference_link: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    suggested_tech: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    author_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    humanized_explanation: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    solution_possibility: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    difficulty: Option<String>,
}

impl FeedRow {
    fn into_candidate(self) -> CandidateRecord {
        let title = clean_text(&self.title);
        let description = clean_text(&self.description);

        let humanized_explanation = self
            .humanized_explanation
            .or_else(|| Some(humanize(&title, &description)));
        let solution_possibility = self
            .solution_possibility
            .as_deref()
            .and_then(SolutionPossibility::parse)
            .or_else(|| Some(classify_solution(&format!("{title} {description}"))));

        CandidateRecord {
            tags: split_tags(&self.tags),
            date: normalize_date(&self.date),
            author_name: if self.author_name.is_empty() {
                "Anonymous".to_string()
            } else {
                self.author_name
            },
            author_id: if self.author_id.is_empty() {
                "N/A".to_string()
            } else {
                self.author_id
            },
            title,
            description,
            source: self.source,
            source_id: self.source_id,
            reference_link: self.reference_link,
            suggested_tech: self.suggested_tech,
            humanized_explanation,
            solution_possibility,
            difficulty: self.difficulty,
        }
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.replace(' ', "-"))
        .collect()
}

/// Dates are stored as `YYYY-MM-DD`; anything unparseable is kept verbatim.
fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    trimmed.to_string()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
