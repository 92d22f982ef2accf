//! # Academic paper submissions
//!
//! A [`Paper`] moves through review phases (abstract, full paper, revision,
//! camera-ready). Each phase is a [`PaperPhase`] snapshot embedded in the paper
//! payload, carrying reviewer [`PaperFeedback`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::flexible;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    #[serde(alias = "id")]
    pub paper_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", alias = "abstractText", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub conference_id: Option<String>,
    #[serde(default)]
    pub conference_name: Option<String>,
    /// Raw backend status, e.g. `Pending`, `UnderReview`, `Accepted`, `Rejected`.
    #[serde(default)]
    pub status: String,
    #[serde(alias = "createdAt", default, with = "flexible")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phases: Vec<PaperPhase>,
}

impl Paper {
    /// The phase currently open, i.e. the last one in submission order.
    pub fn current_phase(&self) -> Option<&PaperPhase> {
        self.phases.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperPhase {
    #[serde(default)]
    pub phase_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, with = "flexible")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback: Vec<PaperFeedback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperFeedback {
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, with = "flexible")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_phase_is_last() {
        let paper: Paper = serde_json::from_str(
            r#"{
                "paperId": "p1",
                "title": "Ownership Types",
                "abstract": "We study...",
                "status": "UnderReview",
                "phases": [
                    {"phaseName": "Abstract", "status": "Accepted"},
                    {"phaseName": "FullPaper", "status": "Pending",
                     "feedback": [{"comment": "Tighten section 3"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(paper.abstract_text.as_deref(), Some("We study..."));
        let phase = paper.current_phase().unwrap();
        assert_eq!(phase.phase_name, "FullPaper");
        assert_eq!(phase.feedback[0].comment, "Tighten section 3");
    }
}
