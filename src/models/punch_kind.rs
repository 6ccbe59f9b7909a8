use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PunchKind {
    In,
    Out,
}

impl PunchKind {
    pub fn pk_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::In => "in",
            PunchKind::Out => "out",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            PunchKind::In => PunchKind::Out,
            PunchKind::Out => PunchKind::In,
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, PunchKind::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, PunchKind::Out)
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PunchKind::In => write!(f, "In"),
            PunchKind::Out => write!(f, "Out"),
        }
    }
}
