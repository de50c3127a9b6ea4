use crate::auth::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

impl User {
    /// Find a user by (normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, profile_pic, about,
                   muted_conversations, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, profile_pic, about,
                   muted_conversations, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, profile_pic, about,
                      muted_conversations, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Apply a partial profile update; `None` fields are left untouched.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        profile_pic: Option<&str>,
        about: Option<&str>,
        full_name: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET profile_pic = COALESCE($2, profile_pic),
                   about       = COALESCE($3, about),
                   full_name   = COALESCE($4, full_name)
             WHERE id = $1
            RETURNING id, email, password_hash, full_name, profile_pic, about,
                      muted_conversations, created_at
            "#,
        )
        .bind(id)
        .bind(profile_pic)
        .bind(about)
        .bind(full_name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Add a conversation to the muted set, atomically and without duplicates.
    /// Returns the resulting set whether or not anything was added.
    pub async fn mute_conversation(
        db: &PgPool,
        id: Uuid,
        conversation_user_id: Uuid,
    ) -> anyhow::Result<Vec<Uuid>> {
        let (muted,): (Vec<Uuid>,) = sqlx::query_as(
            r#"
            UPDATE users
               SET muted_conversations = CASE
                     WHEN muted_conversations @> ARRAY[$2]::uuid[] THEN muted_conversations
                     ELSE array_append(muted_conversations, $2)
                   END
             WHERE id = $1
            RETURNING muted_conversations
            "#,
        )
        .bind(id)
        .bind(conversation_user_id)
        .fetch_one(db)
        .await?;
        Ok(muted)
    }

    /// Remove all occurrences of a conversation from the muted set.
    /// Returns the resulting set even if nothing was removed.
    pub async fn unmute_conversation(
        db: &PgPool,
        id: Uuid,
        conversation_user_id: Uuid,
    ) -> anyhow::Result<Vec<Uuid>> {
        let (muted,): (Vec<Uuid>,) = sqlx::query_as(
            r#"
            UPDATE users
               SET muted_conversations = array_remove(muted_conversations, $2)
             WHERE id = $1
            RETURNING muted_conversations
            "#,
        )
        .bind(id)
        .bind(conversation_user_id)
        .fetch_one(db)
        .await?;
        Ok(muted)
    }
}
