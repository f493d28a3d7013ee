//! Wire shapes for the REST data API and auth API.

use crate::model::category::Category;
use crate::model::goal::{Goal, GoalId};
use crate::model::identity::{Identity, Session};
use crate::repo::goal_repo::{RemoteErrorKind, RepoError, RepoResult};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Row returned by `GET/POST /rest/v1/goals`.
#[derive(Debug, Deserialize)]
pub(crate) struct GoalRow {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}

impl GoalRow {
    pub fn into_goal(self) -> RepoResult<Goal> {
        let category = self
            .category
            .parse::<Category>()
            .map_err(|err| RepoError::new(RemoteErrorKind::InvalidData, err.to_string()))?;
        let created_at_ms = parse_timestamp_ms(&self.created_at)?;
        Ok(Goal {
            id: GoalId::new(self.id),
            title: self.title,
            category,
            completed: self.completed,
            created_at_ms,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InsertGoalRow<'a> {
    pub title: &'a str,
    pub category: Category,
    pub completed: bool,
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletedPatch {
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpMetadata<'a> {
    pub display_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserMetadata {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

impl UserRow {
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.unwrap_or_default(),
            display_name: self.user_metadata.and_then(|meta| meta.display_name),
        }
    }
}

/// Body of token grants and sign-up.
///
/// Sign-up without an issued session returns only the user fields, so every
/// member is optional.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserRow>,
}

impl TokenResponse {
    /// Returns `None` when the provider did not issue a session.
    pub fn into_session(self) -> Option<Session> {
        let access_token = self.access_token.filter(|token| !token.is_empty())?;
        let user = self.user?;
        Some(Session {
            identity: user.into_identity(),
            access_token,
            refresh_token: self.refresh_token,
        })
    }
}

/// Error body shared by the auth API and the REST API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Parses an RFC 3339 timestamp; offset-less values are read as UTC.
pub(crate) fn parse_timestamp_ms(value: &str) -> RepoResult<i64> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.timestamp_millis())
        .or_else(|err| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc().timestamp_millis())
                .map_err(|_| err)
        })
        .map_err(|err| {
            RepoError::new(
                RemoteErrorKind::InvalidData,
                format!("invalid created_at `{value}`: {err}"),
            )
        })
}

fn id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Number(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_timestamp_ms, ErrorBody, GoalRow, TokenResponse};
    use crate::model::category::Category;
    use crate::repo::goal_repo::RemoteErrorKind;
    use serde_json::json;

    #[test]
    fn goal_row_accepts_numeric_and_text_ids() {
        let numeric: GoalRow = serde_json::from_value(json!({
            "id": 42,
            "title": "Ler",
            "category": "Estudos",
            "completed": true,
            "created_at": "2026-02-13T10:00:00+00:00"
        }))
        .unwrap();
        let goal = numeric.into_goal().unwrap();
        assert_eq!(goal.id.as_str(), "42");
        assert_eq!(goal.category, Category::Studies);
        assert!(goal.completed);
        assert_eq!(goal.created_at_ms, 1_770_976_800_000);

        let text: GoalRow = serde_json::from_value(json!({
            "id": "7b1c",
            "title": "Ler",
            "category": "Estudos",
            "created_at": "2026-02-13T10:00:00.250Z"
        }))
        .unwrap();
        let goal = text.into_goal().unwrap();
        assert_eq!(goal.id.as_str(), "7b1c");
        assert!(!goal.completed);
        assert_eq!(goal.created_at_ms, 1_770_976_800_250);
    }

    #[test]
    fn goal_row_rejects_unknown_category() {
        let row: GoalRow = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "category": "Lazer",
            "created_at": "2026-02-13T10:00:00Z"
        }))
        .unwrap();
        let err = row.into_goal().unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::InvalidData);
    }

    #[test]
    fn timestamp_without_offset_is_utc() {
        assert_eq!(
            parse_timestamp_ms("2026-02-13T10:00:00.5").unwrap(),
            1_770_976_800_500
        );
    }

    #[test]
    fn timestamp_parse_reports_invalid_data() {
        let err = parse_timestamp_ms("yesterday").unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::InvalidData);
    }

    #[test]
    fn token_response_without_access_token_has_no_session() {
        let response: TokenResponse = serde_json::from_value(json!({
            "user": {"id": "u1", "email": "ana@focodiario.com"}
        }))
        .unwrap();
        assert!(response.into_session().is_none());
    }

    #[test]
    fn token_response_maps_display_name() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "user": {
                "id": "u1",
                "email": "ana@focodiario.com",
                "user_metadata": {"display_name": "Ana"}
            }
        }))
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.identity.display_name.as_deref(), Some("Ana"));
        assert_eq!(session.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn error_body_prefers_description() {
        let body = ErrorBody::parse(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(
            body.into_message().as_deref(),
            Some("Invalid login credentials")
        );
        assert!(ErrorBody::parse("<html>").into_message().is_none());
    }
}
