use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// All stages in pipeline order, as rendered on the kanban board.
    pub fn all() -> [Stage; 6] {
        [
            Stage::Applied,
            Stage::Screen,
            Stage::Tech,
            Stage::Offer,
            Stage::Hired,
            Stage::Rejected,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Applied => write!(f, "applied"),
            Stage::Screen => write!(f, "screen"),
            Stage::Tech => write!(f, "tech"),
            Stage::Offer => write!(f, "offer"),
            Stage::Hired => write!(f, "hired"),
            Stage::Rejected => write!(f, "rejected"),
        }
    }
}

/// A note left on a candidate's record, newest last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub body: String,
    pub at: DateTime<Utc>,
}

impl Note {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            at: Utc::now(),
        }
    }
}

/// A candidate in the pipeline. `stage` is a mutable classification with no
/// ordering invariant, unlike a job's `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub stage: Stage,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            stage: Stage::Applied,
            notes: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Fields a candidate patch is allowed to touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    /// Full replacement of the notes history, newest last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
}

impl CandidatePatch {
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Default::default()
        }
    }

    pub fn apply(&self, candidate: &mut Candidate) {
        if let Some(ref name) = self.name {
            candidate.name = name.clone();
        }
        if let Some(ref email) = self.email {
            candidate.email = email.clone();
        }
        if let Some(stage) = self.stage {
            candidate.stage = stage;
        }
        if let Some(ref notes) = self.notes {
            candidate.notes = notes.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.stage.is_none() && self.notes.is_none()
    }
}
