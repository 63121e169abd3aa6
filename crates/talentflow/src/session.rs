//! Acting-user context passed explicitly into every operation that needs identity.

use std::fmt;
use std::str::FromStr;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::TalentError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    HrTeam,
    Candidate,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HrTeam => "hr-team",
            Role::Candidate => "candidate",
        }
    }

    pub const fn is_hiring_team(self) -> bool {
        matches!(self, Role::Admin | Role::HrTeam)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "hr-team" | "hr_team" | "hr" => Ok(Role::HrTeam),
            "candidate" => Ok(Role::Candidate),
            other => Err(TalentError::validation(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SessionContext {
    pub fn candidate(user_id: impl Into<String>, name: &str, email: &str) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Candidate,
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }
    }

    pub fn hiring_team(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            name: None,
            email: None,
        }
    }

    pub fn require_role(&self, role: Role) -> Result<(), TalentError> {
        if self.role == role {
            Ok(())
        } else {
            Err(TalentError::Forbidden(format!(
                "{} role required, session has {}",
                role, self.role
            )))
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = TalentError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| TalentError::validation(format!("{USER_ID_HEADER} header required")))?;
        let role = match header(parts, USER_ROLE_HEADER) {
            Some(raw) => raw.parse()?,
            None => Role::Candidate,
        };

        Ok(Self {
            user_id: user_id.to_string(),
            role,
            name: header(parts, USER_NAME_HEADER).map(str::to_string),
            email: header(parts, USER_EMAIL_HEADER).map(str::to_string),
        })
    }
}
