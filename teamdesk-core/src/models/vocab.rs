//! Closed vocabularies stored as TEXT columns
//!
//! Each enum round-trips through the exact label the dashboard displays
//! (`"Needs Analysis"`, `"Closed-Won"`, `"To Do"`), so the database holds
//! human-readable values and the JSON surface matches it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Label as stored and displayed.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse an exact label.
            pub fn parse(s: &str) -> Result<Self, ValidationError> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(ValidationError::InvalidVariant {
                        field: $field,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

vocabulary! {
    /// Where a lead sits in the sales funnel
    LeadStatus, field = "status" {
        New => "New",
        Contacted => "Contacted",
        Proposal => "Proposal",
        Negotiation => "Negotiation",
        Won => "Won",
        Lost => "Lost",
    }
}

vocabulary! {
    /// Pipeline column a deal is in
    DealStage, field = "stage" {
        Qualification => "Qualification",
        NeedsAnalysis => "Needs Analysis",
        Proposal => "Proposal",
        Negotiation => "Negotiation",
        ClosedWon => "Closed-Won",
        ClosedLost => "Closed-Lost",
    }
}

vocabulary! {
    TaskPriority, field = "priority" {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

vocabulary! {
    TaskStatus, field = "status" {
        ToDo => "To Do",
        InProgress => "In Progress",
        Done => "Done",
    }
}

vocabulary! {
    /// Kind of interaction recorded in the activity feed
    ActivityKind, field = "type" {
        Note => "note",
        Email => "email",
        Call => "call",
        Meeting => "meeting",
    }
}

vocabulary! {
    BookmarkKind, field = "type" {
        Lead => "lead",
        Deal => "deal",
        Report => "report",
        Other => "other",
    }
}

vocabulary! {
    /// What a task is attached to
    RelatedKind, field = "relatedTo.type" {
        Lead => "lead",
        Deal => "deal",
    }
}

vocabulary! {
    /// Flavour of AI-drafted email for a lead
    EmailKind, field = "type" {
        FollowUp => "follow-up",
        Introduction => "introduction",
    }
}

impl DealStage {
    /// Closed stages end the deal's life in the pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for stage in DealStage::ALL {
            assert_eq!(DealStage::parse(stage.as_str()).unwrap(), *stage);
        }
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn labels_with_spaces_and_dashes() {
        assert_eq!(DealStage::NeedsAnalysis.as_str(), "Needs Analysis");
        assert_eq!(DealStage::ClosedWon.as_str(), "Closed-Won");
        assert_eq!(TaskStatus::ToDo.as_str(), "To Do");
        assert_eq!(EmailKind::FollowUp.as_str(), "follow-up");
    }

    #[test]
    fn parse_is_case_sensitive() {
        let err = LeadStatus::parse("won").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidVariant {
                field: "status",
                value: "won".into()
            }
        );
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&DealStage::ClosedLost).unwrap();
        assert_eq!(json, "\"Closed-Lost\"");

        let kind: ActivityKind = serde_json::from_str("\"meeting\"").unwrap();
        assert_eq!(kind, ActivityKind::Meeting);
    }

    #[test]
    fn closed_stages() {
        assert!(DealStage::ClosedWon.is_closed());
        assert!(DealStage::ClosedLost.is_closed());
        assert!(!DealStage::Negotiation.is_closed());
    }
}
