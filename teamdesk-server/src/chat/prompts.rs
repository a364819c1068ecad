//! Prompt text for the lead assistant features

use teamdesk_core::models::EmailKind;

use crate::db::{Activity, Lead};

/// Returned instead of calling the model when a lead has no history.
pub const NO_ACTIVITY_SUMMARY: &str =
    "No activities recorded for this lead yet, so there is nothing to summarize.";

/// Ask for a sales email to `lead`, signed by `sender`.
pub fn lead_email(lead: &Lead, kind: EmailKind, sender: &str) -> String {
    let purpose = match kind {
        EmailKind::FollowUp => {
            "a friendly follow-up email checking in on our previous conversation and proposing a next step"
        }
        EmailKind::Introduction => {
            "a short introduction email presenting our team and asking for a first call"
        }
    };

    format!(
        "Write {purpose} to {name} at {company}. \
         Their current status in our pipeline is \"{status}\". \
         Keep it under 150 words, include a subject line, and sign it as {sender}.",
        name = lead.name,
        company = lead.company,
        status = lead.status,
    )
}

/// Ask for a short summary of a lead's activity history, oldest first.
pub fn activity_summary(lead: &Lead, activities: &[Activity]) -> String {
    let history: String = activities
        .iter()
        .map(|a| {
            format!(
                "- {} ({}, by {}): {}\n",
                a.date.format("%Y-%m-%d"),
                a.kind,
                a.author_name,
                a.content
            )
        })
        .collect();

    format!(
        "Summarize the interaction history with {name} from {company} in two or three \
         sentences, then suggest one next action.\n\nActivities:\n{history}",
        name = lead.name,
        company = lead.company,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lead() -> Lead {
        Lead {
            id: 1,
            name: "Sarah Lee".into(),
            company: "Innovate LLC".into(),
            email: "sarah.lee@innovatellc.com".into(),
            phone: None,
            status: "Proposal".into(),
            source: "Social Media".into(),
            country: "India".into(),
            avatar: None,
            owner_name: "Alex Johnson".into(),
            owner_avatar: "https://i.pravatar.cc/150?u=user-1".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn email_prompt_mentions_lead_and_kind() {
        let prompt = lead_email(&lead(), EmailKind::FollowUp, "Alex Johnson");
        assert!(prompt.contains("follow-up"));
        assert!(prompt.contains("Sarah Lee at Innovate LLC"));
        assert!(prompt.contains("\"Proposal\""));
        assert!(prompt.ends_with("sign it as Alex Johnson."));

        let prompt = lead_email(&lead(), EmailKind::Introduction, "Alex Johnson");
        assert!(prompt.contains("introduction"));
    }

    #[test]
    fn summary_prompt_lists_activities() {
        let activity = Activity {
            id: 3,
            kind: "call".into(),
            content: "Discussed pricing and terms".into(),
            date: Utc.with_ymd_and_hms(2023, 10, 20, 16, 0, 0).unwrap(),
            lead_id: Some(1),
            author_name: "Maria Garcia".into(),
            author_avatar: "https://i.pravatar.cc/150?u=user-2".into(),
        };

        let prompt = activity_summary(&lead(), &[activity]);
        assert!(prompt.contains("Sarah Lee from Innovate LLC"));
        assert!(prompt.contains("- 2023-10-20 (call, by Maria Garcia): Discussed pricing and terms"));
    }
}
