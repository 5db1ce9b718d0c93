use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::{NewWaitlistUser, TokenLookup, WaitlistRepo},
    domain::entities::waitlist_user::{UserType, WaitlistUser},
};

// Row as stored in the db; user_type stays TEXT and is parsed on the way out.
#[derive(sqlx::FromRow, Debug)]
struct WaitlistUserRow {
    id: Uuid,
    email: String,
    name: String,
    user_type: String,
    is_verified: bool,
    verification_token: Option<String>,
    quiz_completed: bool,
    waitlist_position: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(sqlx::FromRow, Debug)]
struct TokenLookupRow {
    issued_at: NaiveDateTime,
    #[sqlx(flatten)]
    user: WaitlistUserRow,
}

impl TryFrom<WaitlistUserRow> for WaitlistUser {
    type Error = AppError;

    fn try_from(row: WaitlistUserRow) -> AppResult<Self> {
        let user_type = UserType::parse(&row.user_type).ok_or_else(|| {
            AppError::Database(format!(
                "row {} has unknown user_type {:?}",
                row.id, row.user_type
            ))
        })?;
        Ok(WaitlistUser {
            id: row.id,
            email: row.email,
            name: row.name,
            user_type,
            is_verified: row.is_verified,
            verification_token: row.verification_token,
            quiz_completed: row.quiz_completed,
            waitlist_position: row.waitlist_position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, email, name, user_type, is_verified, verification_token, \
     quiz_completed, waitlist_position, created_at, updated_at";

const USER_COLUMNS_QUALIFIED: &str = "u.id, u.email, u.name, u.user_type, u.is_verified, \
     u.verification_token, u.quiz_completed, u.waitlist_position, u.created_at, u.updated_at";

#[async_trait]
impl WaitlistRepo for PostgresPersistence {
    async fn create_user(&self, new: NewWaitlistUser) -> AppResult<WaitlistUser> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, WaitlistUserRow>(&format!(
            r#"INSERT INTO waitlist_users (id, email, name, user_type, verification_token)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&new.email)
        .bind(&new.name)
        .bind(new.user_type.as_str())
        .bind(&new.token)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        sqlx::query("INSERT INTO verification_tokens (token, user_id) VALUES ($1, $2)")
            .bind(&new.token)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<TokenLookup>> {
        let row = sqlx::query_as::<_, TokenLookupRow>(&format!(
            r#"SELECT t.created_at AS issued_at, {USER_COLUMNS_QUALIFIED}
               FROM verification_tokens t
               JOIN waitlist_users u ON u.id = t.user_id
               WHERE t.token = $1"#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(TokenLookup {
                user: r.user.try_into()?,
                issued_at: r.issued_at,
            })
        })
        .transpose()
    }

    async fn consume_token(&self, user_id: Uuid) -> AppResult<u64> {
        // One statement so the flip and the token bookkeeping commit
        // together; rows_affected reports the user update alone, which is
        // what decides the race.
        let res = sqlx::query(
            r#"WITH consumed AS (
                   UPDATE verification_tokens
                   SET consumed_at = NOW()
                   WHERE user_id = $1 AND consumed_at IS NULL
               )
               UPDATE waitlist_users
               SET is_verified = TRUE, verification_token = NULL, updated_at = NOW()
               WHERE id = $1 AND is_verified = FALSE"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }

    async fn force_verify(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE waitlist_users
               SET is_verified = TRUE, verification_token = NULL, updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_welcome_candidate(&self) -> AppResult<Option<WaitlistUser>> {
        let row = sqlx::query_as::<_, WaitlistUserRow>(&format!(
            r#"SELECT {USER_COLUMNS}
               FROM waitlist_users
               WHERE is_verified = TRUE AND quiz_completed = TRUE
               ORDER BY updated_at DESC
               LIMIT 1"#
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(WaitlistUser::try_from).transpose()
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err
        && db.constraint() == Some("waitlist_users_email_key")
    {
        return AppError::AlreadyRegistered;
    }
    AppError::from(err)
}
