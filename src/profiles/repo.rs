use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Profile;
use crate::users::User;

impl Profile {
    /// Find a profile by owning user.
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, status, company, website, bio, githubusername,
                   skills, social, experience, education, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, status, company, website, bio, githubusername,
                   skills, social, experience, education, created_at, updated_at
            FROM profiles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(profiles)
    }

    /// Insert or overwrite the full row. Merge semantics are applied in
    /// memory before this is called; concurrent writers for the same user
    /// can lose updates, matching the source system.
    pub async fn upsert(db: &PgPool, profile: &Profile) -> anyhow::Result<Profile> {
        let stored = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles
                (user_id, status, company, website, bio, githubusername,
                 skills, social, experience, education)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                status = EXCLUDED.status,
                company = EXCLUDED.company,
                website = EXCLUDED.website,
                bio = EXCLUDED.bio,
                githubusername = EXCLUDED.githubusername,
                skills = EXCLUDED.skills,
                social = EXCLUDED.social,
                experience = EXCLUDED.experience,
                education = EXCLUDED.education,
                updated_at = now()
            RETURNING user_id, status, company, website, bio, githubusername,
                      skills, social, experience, education, created_at, updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.status)
        .bind(&profile.company)
        .bind(&profile.website)
        .bind(&profile.bio)
        .bind(&profile.githubusername)
        .bind(&profile.skills)
        .bind(&profile.social)
        .bind(&profile.experience)
        .bind(&profile.education)
        .fetch_one(db)
        .await?;
        Ok(stored)
    }

    /// Remove the profile and its owning user in one transaction; either
    /// both rows go or neither does.
    pub async fn delete_with_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query(r#"DELETE FROM profiles WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        User::delete_tx(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
