use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Number,
}

/// One question in an assessment form. The pipeline core treats the
/// questions list as an opaque payload; no validation happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
}

impl QuestionSpec {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            kind: QuestionKind::Text,
            label: label.into(),
        }
    }
}

/// The assessment form for a job. Keyed by the owning job's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: u32,
    pub questions: Vec<QuestionSpec>,
}

impl Assessment {
    pub fn new(job_id: u32, questions: Vec<QuestionSpec>) -> Self {
        Self {
            id: job_id,
            questions,
        }
    }
}
