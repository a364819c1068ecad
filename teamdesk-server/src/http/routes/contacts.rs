//! Contact endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use teamdesk_core::models::{
    default_avatar, optional_text, required_text, Email, MAX_SHORT_TEXT,
};
use teamdesk_core::ValidationError;

use crate::db::{Contact, ContactChanges, ContactRepo, NewContact};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tags: Option<Vec<String>>,
    pub avatar: Option<String>,
}

/// Trimmed, de-duplicated, non-empty tags in input order.
fn clean_tags(tags: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(tag) = optional_text("tags", Some(tag.as_str()), MAX_SHORT_TEXT)? {
            if !cleaned.contains(&tag) {
                cleaned.push(tag);
            }
        }
    }
    Ok(cleaned)
}

impl CreateContactRequest {
    fn into_new_contact(self) -> Result<NewContact, ValidationError> {
        let email = Email::new(self.email.as_deref().unwrap_or_default())?;
        let avatar = optional_text("avatar", self.avatar.as_deref(), MAX_SHORT_TEXT)?
            .unwrap_or_else(|| default_avatar(email.as_str()));

        Ok(NewContact {
            name: required_text("name", self.name.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            phone: optional_text("phone", self.phone.as_deref(), MAX_SHORT_TEXT)?.unwrap_or_default(),
            company: optional_text("company", self.company.as_deref(), MAX_SHORT_TEXT)?
                .unwrap_or_default(),
            tags: clean_tags(self.tags)?,
            avatar,
            email,
        })
    }
}

impl UpdateContactRequest {
    fn into_changes(self) -> Result<ContactChanges, ValidationError> {
        let changes = ContactChanges {
            name: self
                .name
                .as_deref()
                .map(|n| required_text("name", n, MAX_SHORT_TEXT))
                .transpose()?,
            email: self.email.as_deref().map(Email::new).transpose()?,
            // Phone and company may be cleared, so blank is a value here
            phone: self.phone.map(|p| p.trim().to_string()),
            company: self.company.map(|c| c.trim().to_string()),
            tags: self.tags.map(clean_tags).transpose()?,
            avatar: optional_text("avatar", self.avatar.as_deref(), MAX_SHORT_TEXT)?,
        };

        if changes.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(changes)
    }
}

/// GET /contacts
async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = ContactRepo::new(&state.pool).list().await?;
    Ok(Json(contacts))
}

/// POST /contacts
async fn create_contact(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = ContactRepo::new(&state.pool)
        .create(req.into_new_contact()?)
        .await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /contacts/{id}
async fn update_contact(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    let contact = ContactRepo::new(&state.pool)
        .update(id, req.into_changes()?)
        .await?;
    Ok(Json(contact))
}

/// Contact routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", put(update_contact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{app, post, put as put_json};
    use serde_json::json;

    #[test]
    fn create_defaults() {
        let req: CreateContactRequest = serde_json::from_value(json!({
            "name": "John Doe",
            "email": "john.doe@brighttech.com",
            "tags": [" Client ", "VIP", "", "Client"]
        }))
        .unwrap();
        let contact = req.into_new_contact().unwrap();

        assert_eq!(contact.phone, "");
        assert_eq!(contact.company, "");
        assert_eq!(contact.tags, vec!["Client", "VIP"]);
        assert_eq!(contact.avatar, "https://i.pravatar.cc/150?u=john.doe@brighttech.com");
    }

    #[test]
    fn update_can_clear_phone() {
        let req: UpdateContactRequest = serde_json::from_value(json!({ "phone": "" })).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.phone.as_deref(), Some(""));
    }

    #[test]
    fn empty_update_rejected() {
        let err = UpdateContactRequest::default().into_changes().unwrap_err();
        assert_eq!(err, ValidationError::NothingToUpdate);
    }

    #[tokio::test]
    async fn create_requires_name() {
        let (status, json) = post(app(), "/api/contacts", json!({ "email": "a@b.co" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "name cannot be empty");
    }

    #[tokio::test]
    async fn update_rejects_bad_email() {
        let (status, _) = put_json(app(), "/api/contacts/2", json!({ "email": "nope" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
