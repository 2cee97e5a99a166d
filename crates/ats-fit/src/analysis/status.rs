use super::scoring::{FitScore, STRONG_FIT_THRESHOLD};

/// Scores strictly below this are rejected.
pub const REJECT_THRESHOLD: u8 = 30;

/// Target status in the origin ATS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtsStatus {
    New,
    Interview,
    Rejected,
}

impl AtsStatus {
    pub fn for_score(score: FitScore) -> Self {
        match score.value() {
            value if value > STRONG_FIT_THRESHOLD => Self::Interview,
            value if value < REJECT_THRESHOLD => Self::Rejected,
            _ => Self::New,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::New => 1,
            Self::Interview => 3,
            Self::Rejected => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Interview => "Interview",
            Self::Rejected => "Rejected",
        }
    }
}
