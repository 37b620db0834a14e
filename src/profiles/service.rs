//! Document manipulation for profile records: the merge-update and the
//! ordered experience/education lists. Pure functions applied between a repo
//! read and a repo write.

use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{EducationBody, ExperienceBody, UpsertProfileBody};
use super::repo_types::{Education, Experience, Profile, SocialLinks};

/// Returned when a list edit names an id that is not in the list.
#[derive(Debug, PartialEq, Eq)]
pub struct EntryNotFound;

/// Split a comma-separated skills string into trimmed segments.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

fn social_from_body(body: &UpsertProfileBody) -> SocialLinks {
    SocialLinks {
        youtube: body.youtube.clone(),
        facebook: body.facebook.clone(),
        twitter: body.twitter.clone(),
        instagram: body.instagram.clone(),
        linkedin: body.linkedin.clone(),
    }
}

/// Merge-update: only keys present in the body overwrite. The social block
/// is rebuilt from the platforms supplied in this call, so platforms left
/// out are cleared.
pub fn apply_update(profile: &mut Profile, body: &UpsertProfileBody) {
    if let Some(status) = &body.status {
        profile.status = status.clone();
    }
    if let Some(company) = &body.company {
        profile.company = Some(company.clone());
    }
    if let Some(website) = &body.website {
        profile.website = Some(website.clone());
    }
    if let Some(bio) = &body.bio {
        profile.bio = Some(bio.clone());
    }
    if let Some(githubusername) = &body.githubusername {
        profile.githubusername = Some(githubusername.clone());
    }
    if let Some(skills) = &body.skills {
        profile.skills = parse_skills(skills);
    }
    profile.social = sqlx::types::Json(social_from_body(body));
}

/// Build a fresh profile from the submitted fields. The handler has already
/// checked that status and skills are present.
pub fn new_profile(user_id: Uuid, body: &UpsertProfileBody) -> Profile {
    let now = OffsetDateTime::now_utc();
    let mut profile = Profile {
        user_id,
        status: String::new(),
        company: None,
        website: None,
        bio: None,
        githubusername: None,
        skills: Vec::new(),
        social: sqlx::types::Json(SocialLinks::default()),
        experience: sqlx::types::Json(Vec::new()),
        education: sqlx::types::Json(Vec::new()),
        created_at: now,
        updated_at: now,
    };
    apply_update(&mut profile, body);
    profile
}

/// Common handle for id-addressable list entries.
pub trait ListEntry {
    fn entry_id(&self) -> Uuid;
}

impl ListEntry for Experience {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

impl ListEntry for Education {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

/// Additions land at the front: newest-first insertion order.
pub fn push_experience(list: &mut Vec<Experience>, body: &ExperienceBody) -> Uuid {
    let id = Uuid::new_v4();
    list.insert(
        0,
        Experience {
            id,
            title: body.title.clone().unwrap_or_default(),
            company: body.company.clone().unwrap_or_default(),
            location: body.location.clone(),
            from: body.from.clone().unwrap_or_default(),
            to: body.to.clone(),
            current: body.current.unwrap_or(false),
            description: body.description.clone(),
        },
    );
    id
}

pub fn push_education(list: &mut Vec<Education>, body: &EducationBody) -> Uuid {
    let id = Uuid::new_v4();
    list.insert(
        0,
        Education {
            id,
            school: body.school.clone().unwrap_or_default(),
            degree: body.degree.clone().unwrap_or_default(),
            fieldofstudy: body.fieldofstudy.clone().unwrap_or_default(),
            from: body.from.clone().unwrap_or_default(),
            to: body.to.clone(),
            current: body.current.unwrap_or(false),
            description: body.description.clone(),
        },
    );
    id
}

/// Remove exactly one entry by id, by linear scan. Missing ids are reported,
/// not silently ignored.
pub fn remove_entry<T: ListEntry>(list: &mut Vec<T>, entry_id: Uuid) -> Result<T, EntryNotFound> {
    match list.iter().position(|e| e.entry_id() == entry_id) {
        Some(idx) => Ok(list.remove(idx)),
        None => Err(EntryNotFound),
    }
}

/// Overwrite only the supplied fields of one experience entry, in place.
pub fn update_experience(
    list: &mut [Experience],
    entry_id: Uuid,
    body: &ExperienceBody,
) -> Result<(), EntryNotFound> {
    let entry = list
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or(EntryNotFound)?;
    if let Some(title) = &body.title {
        entry.title = title.clone();
    }
    if let Some(company) = &body.company {
        entry.company = company.clone();
    }
    if let Some(location) = &body.location {
        entry.location = Some(location.clone());
    }
    if let Some(from) = &body.from {
        entry.from = from.clone();
    }
    if let Some(to) = &body.to {
        entry.to = Some(to.clone());
    }
    if let Some(current) = body.current {
        entry.current = current;
    }
    if let Some(description) = &body.description {
        entry.description = Some(description.clone());
    }
    Ok(())
}
