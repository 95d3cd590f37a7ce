use chrono::{DateTime, Utc};
use gwiit_core::{
    Email, HashedPassword, LoginField, LoginIdentifiers, NewUser, OnDelete, OrganizationId,
    Reference, SiteId, User, UserFilter, UserId, UserQuery, UserStore, UserStoreError,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Postgres, QueryBuilder};

const USER_COLUMNS: &str = "id, email, username, badge_barcode, badge_rfid, password_hash, \
     first_name, last_name, organization_id, site_id, is_active, is_staff, is_superuser, \
     date_joined, date_created, last_modified, created_by_id, modified_by_id";

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: Option<String>,
    username: Option<String>,
    badge_barcode: Option<String>,
    badge_rfid: Option<String>,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    organization_id: Option<i64>,
    site_id: Option<i64>,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
    date_created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    created_by_id: Option<i64>,
    modified_by_id: Option<i64>,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .map(Email::try_from)
            .transpose()
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
        let identifiers =
            LoginIdentifiers::from_parts(email, row.username, row.badge_barcode, row.badge_rfid)
                .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        Ok(User {
            id: UserId::new(row.id),
            identifiers,
            password_hash: HashedPassword::new(Secret::from(row.password_hash)),
            first_name: row.first_name,
            last_name: row.last_name,
            organization_id: row.organization_id.map(OrganizationId::new),
            site_id: row.site_id.map(SiteId::new),
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            date_joined: row.date_joined,
            date_created: row.date_created,
            last_modified: row.last_modified,
            created_by_id: row.created_by_id.map(UserId::new),
            modified_by_id: row.modified_by_id.map(UserId::new),
        })
    }
}

/// Strictly later than the stored stamp, so stale writers always miss.
const NEXT_STAMP: &str = "GREATEST(now(), last_modified + interval '1 microsecond')";

/// Maps the partial unique indexes from the migration back to the field they guard.
fn map_write_error(e: sqlx::Error) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        let field = match db_err.constraint() {
            Some("users_active_email_key") => Some(LoginField::Email),
            Some("users_active_username_key") => Some(LoginField::Username),
            Some("users_active_badge_barcode_key") => Some(LoginField::BadgeBarcode),
            Some("users_active_badge_rfid_key") => Some(LoginField::BadgeRfid),
            _ => None,
        };
        if let Some(field) = field {
            return UserStoreError::UniquenessViolation(field);
        }
    }
    UserStoreError::UnexpectedError(e.to_string())
}

fn unexpected(e: sqlx::Error) -> UserStoreError {
    UserStoreError::UnexpectedError(e.to_string())
}

fn like_pattern(part: &str) -> String {
    let escaped = part
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    match filter {
        UserFilter::Active(active) => builder.push("is_active = ").push_bind(*active),
        UserFilter::Staff(staff) => builder.push("is_staff = ").push_bind(*staff),
        UserFilter::Organization(id) => builder.push("organization_id = ").push_bind(id.get()),
        UserFilter::Site(id) => builder.push("site_id = ").push_bind(id.get()),
        UserFilter::JoinedSince(since) => builder.push("date_joined >= ").push_bind(*since),
        UserFilter::CreatedBy(id) => builder.push("created_by_id = ").push_bind(id.get()),
        UserFilter::ModifiedBy(id) => builder.push("modified_by_id = ").push_bind(id.get()),
        UserFilter::Email(email) => builder.push("email = ").push_bind(email.as_str().to_owned()),
        UserFilter::Username(name) => builder.push("username = ").push_bind(name.clone()),
        UserFilter::BadgeBarcode(code) => builder.push("badge_barcode = ").push_bind(code.clone()),
        UserFilter::BadgeRfid(code) => builder.push("badge_rfid = ").push_bind(code.clone()),
        UserFilter::FirstNameContains(part) => {
            builder.push("first_name ILIKE ").push_bind(like_pattern(part))
        }
        UserFilter::LastNameContains(part) => {
            builder.push("last_name ILIKE ").push_bind(like_pattern(part))
        }
    };
}

fn reference_column(reference: Reference) -> (&'static str, i64) {
    match reference {
        Reference::Organization(id) => ("organization_id", id.get()),
        Reference::Site(id) => ("site_id", id.get()),
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let ids = &user.identifiers;
        let query = format!(
            r#"
                INSERT INTO users (
                    email, username, badge_barcode, badge_rfid, password_hash,
                    first_name, last_name, organization_id, site_id,
                    is_active, is_staff, is_superuser, created_by_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(ids.email().map(Email::as_str))
            .bind(ids.username())
            .bind(ids.badge_barcode())
            .bind(ids.badge_rfid())
            .bind(user.password_hash.as_ref().expose_secret())
            .bind(user.first_name.as_deref())
            .bind(user.last_name.as_deref())
            .bind(user.organization_id.map(OrganizationId::get))
            .bind(user.site_id.map(SiteId::get))
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(user.created_by_id.map(UserId::get))
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        row.try_into()
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all, fields(user_id = %user.id))]
    async fn update_user(&self, user: User) -> Result<User, UserStoreError> {
        let ids = &user.identifiers;
        let query = format!(
            r#"
                UPDATE users
                SET email = $2, username = $3, badge_barcode = $4, badge_rfid = $5,
                    password_hash = $6, first_name = $7, last_name = $8,
                    organization_id = $9, site_id = $10, is_active = $11, is_staff = $12,
                    is_superuser = $13, modified_by_id = $15,
                    last_modified = {NEXT_STAMP}
                WHERE id = $1 AND last_modified = $14
                RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user.id.get())
            .bind(ids.email().map(Email::as_str))
            .bind(ids.username())
            .bind(ids.badge_barcode())
            .bind(ids.badge_rfid())
            .bind(user.password_hash.as_ref().expose_secret())
            .bind(user.first_name.as_deref())
            .bind(user.last_name.as_deref())
            .bind(user.organization_id.map(OrganizationId::get))
            .bind(user.site_id.map(SiteId::get))
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(user.last_modified)
            .bind(user.modified_by_id.map(UserId::get))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        match row {
            Some(row) => row.try_into(),
            None => match self.get_user(user.id).await {
                Ok(_) => Err(UserStoreError::ConcurrentModification),
                Err(e) => Err(e),
            },
        }
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all, fields(user_id = %id))]
    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(UserStoreError::UserNotFound);
        };
        row.try_into()
    }

    #[tracing::instrument(name = "Filtering users in PostgreSQL", skip_all)]
    async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, UserStoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        for filter in query.filters() {
            builder.push(" AND ");
            push_filter(&mut builder, filter);
        }
        builder.push(" ORDER BY id ASC");

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[tracing::instrument(name = "Looking up user by login identifier", skip_all)]
    async fn find_active_by_identifier(&self, identifier: &str) -> Result<User, UserStoreError> {
        let query = format!(
            r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE is_active
                  AND (lower(email) = lower($1)
                    OR lower(username) = lower($1)
                    OR lower(badge_barcode) = lower($1)
                    OR lower(badge_rfid) = lower($1))
                ORDER BY id ASC
                LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(UserStoreError::UserNotFound);
        };
        row.try_into()
    }

    #[tracing::instrument(name = "Deactivating superuser in PostgreSQL", skip_all, fields(user_id = %id))]
    async fn deactivate_superuser(&self, id: UserId) -> Result<User, UserStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let target: Option<(bool, bool)> =
            sqlx::query_as("SELECT is_superuser, is_active FROM users WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?;

        let Some((is_superuser, is_active)) = target else {
            return Err(UserStoreError::UserNotFound);
        };
        if !is_superuser {
            return Err(UserStoreError::NotASuperuser);
        }

        // Locking every active superuser serializes concurrent deactivations.
        let active_superusers: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE is_superuser AND is_active FOR UPDATE")
                .fetch_all(&mut *tx)
                .await
                .map_err(unexpected)?;
        if is_active && active_superusers.len() <= 1 {
            return Err(UserStoreError::LastActiveSuperuser);
        }

        let query = format!(
            "UPDATE users SET is_active = FALSE, last_modified = {NEXT_STAMP} WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        row.try_into()
    }

    #[tracing::instrument(name = "Releasing user references in PostgreSQL", skip(self), fields(reference = %reference))]
    async fn release_reference(
        &self,
        reference: Reference,
        policy: OnDelete,
    ) -> Result<u64, UserStoreError> {
        let (column, id) = reference_column(reference);

        let statement = match policy {
            OnDelete::Restrict => {
                let (count,): (i64,) =
                    sqlx::query_as(&format!("SELECT COUNT(*) FROM users WHERE {column} = $1"))
                        .bind(id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(unexpected)?;
                return match count {
                    0 => Ok(0),
                    n => Err(UserStoreError::ReferencedByUsers(n as u64)),
                };
            }
            OnDelete::SetNull => format!(
                "UPDATE users SET {column} = NULL, last_modified = {NEXT_STAMP} \
                 WHERE {column} = $1"
            ),
            // Superusers only lose the reference.
            OnDelete::Cascade => format!(
                "UPDATE users SET {column} = NULL, is_active = (is_active AND is_superuser), \
                 last_modified = {NEXT_STAMP} WHERE {column} = $1"
            ),
        };

        let result = sqlx::query(&statement)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(result.rows_affected())
    }
}
