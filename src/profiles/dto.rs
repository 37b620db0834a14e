use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Profile;
use crate::error::FieldError;
use crate::users::User;

fn missing(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Body of POST /api/profile. Everything is optional at the serde layer so
/// required-field checks can answer with field-level messages instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertProfileBody {
    pub company: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    /// Comma-separated, split and trimmed on write.
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

impl UpsertProfileBody {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if missing(&self.status) {
            errors.push(FieldError {
                msg: "Status is required",
                param: "status",
            });
        }
        if missing(&self.skills) {
            errors.push(FieldError {
                msg: "Skills is required",
                param: "skills",
            });
        }
        errors
    }
}

/// Body of the experience append and update routes.
#[derive(Debug, Default, Deserialize)]
pub struct ExperienceBody {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl ExperienceBody {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if missing(&self.title) {
            errors.push(FieldError {
                msg: "Title is required",
                param: "title",
            });
        }
        if missing(&self.company) {
            errors.push(FieldError {
                msg: "Company is required",
                param: "company",
            });
        }
        if missing(&self.from) {
            errors.push(FieldError {
                msg: "From date is required",
                param: "from",
            });
        }
        errors
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationBody {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl EducationBody {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if missing(&self.school) {
            errors.push(FieldError {
                msg: "School is required",
                param: "school",
            });
        }
        if missing(&self.degree) {
            errors.push(FieldError {
                msg: "Degree is required",
                param: "degree",
            });
        }
        if missing(&self.fieldofstudy) {
            errors.push(FieldError {
                msg: "Field of Study is required",
                param: "fieldofstudy",
            });
        }
        if missing(&self.from) {
            errors.push(FieldError {
                msg: "From date is required",
                param: "from",
            });
        }
        errors
    }
}

/// Owner summary embedded in read responses in place of the bare user id.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<User> for OwnerSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            avatar: u.avatar,
        }
    }
}

/// Profile as returned by the read endpoints: the stored record plus the
/// owner summary. `user` is None only if the account row is gone.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: Option<OwnerSummary>,
    #[serde(flatten)]
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: &'static str,
}
