//! PostgreSQL store adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{ChequebookStore, StoreError, SubscriptionSlice, Upserted};
use crate::models::{Account, Flag, NewSubscription, Subscription, SubscriptionPatch, User, UserRecord};
use crate::pagination::PageRequest;
use crate::uuid::uuidv7;

macro_rules! subscription_columns {
    () => {
        "id, cust_ac_no, branch_code, reorder_threshold_number, subscribed, \
         notify_sms, notify_email, notify_rm, created_date, updated_date"
    };
}

/// Store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    fullname: String,
    group_code: String,
    user_status: String,
    branch_code: String,
    password_hash: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            user: User {
                username: row.username,
                fullname: row.fullname,
                group_code: row.group_code,
                user_status: row.user_status,
                branch_code: row.branch_code,
            },
            password_hash: row.password_hash,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    branch_code: String,
    cust_ac_no: String,
    ac_desc: String,
    cust_no: String,
    ccy: String,
    account_class: String,
    cheque_book_facility: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            cheque_book_facility: flag_column("cheque_book_facility", &row.cheque_book_facility)?,
            branch_code: row.branch_code,
            cust_ac_no: row.cust_ac_no,
            description: row.ac_desc,
            customer_no: row.cust_no,
            currency: row.ccy,
            account_class: row.account_class,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    cust_ac_no: String,
    branch_code: String,
    reorder_threshold_number: i32,
    subscribed: String,
    notify_sms: String,
    notify_email: String,
    notify_rm: String,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StoreError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            subscribed: flag_column("subscribed", &row.subscribed)?,
            notify_sms: flag_column("notify_sms", &row.notify_sms)?,
            notify_email: flag_column("notify_email", &row.notify_email)?,
            notify_rm: flag_column("notify_rm", &row.notify_rm)?,
            id: row.id,
            cust_ac_no: row.cust_ac_no,
            branch_code: row.branch_code,
            reorder_threshold_number: row.reorder_threshold_number,
            created_at: row.created_date,
            updated_at: row.updated_date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    row: SubscriptionRow,
    inserted: bool,
}

fn flag_column(column: &str, value: &str) -> Result<Flag, StoreError> {
    Flag::parse(value).ok_or_else(|| StoreError::Corrupt(format!("{column} = {value:?}")))
}

fn flag_param(flag: Option<Flag>) -> Option<&'static str> {
    flag.map(Flag::as_str)
}

#[async_trait]
impl ChequebookStore for PgStore {
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, fullname, group_code, user_status, branch_code, password_hash \
             FROM users WHERE UPPER(username) = UPPER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT username, fullname, group_code, user_status, branch_code, NULL::text AS password_hash \
             FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| UserRecord::from(r).user).collect())
    }

    async fn find_account(&self, cust_ac_no: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT branch_code, cust_ac_no, ac_desc, cust_no, ccy, account_class, cheque_book_facility \
             FROM sttm_cust_account WHERE cust_ac_no = $1",
        )
        .bind(cust_ac_no)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::try_from).transpose()
    }

    async fn upsert_subscription(&self, new: &NewSubscription) -> Result<Upserted, StoreError> {
        // xmax is 0 only for a freshly inserted tuple.
        let row = sqlx::query_as::<_, UpsertRow>(concat!(
            "INSERT INTO chq_bk_reorder_sub \
             (id, cust_ac_no, branch_code, reorder_threshold_number, subscribed, notify_sms, notify_email, notify_rm) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (cust_ac_no) DO UPDATE SET \
               branch_code = EXCLUDED.branch_code, \
               reorder_threshold_number = EXCLUDED.reorder_threshold_number, \
               subscribed = EXCLUDED.subscribed, \
               notify_sms = EXCLUDED.notify_sms, \
               notify_email = EXCLUDED.notify_email, \
               notify_rm = EXCLUDED.notify_rm, \
               updated_date = now() \
             RETURNING ",
            subscription_columns!(),
            ", (xmax = 0) AS inserted"
        ))
        .bind(uuidv7())
        .bind(&new.cust_ac_no)
        .bind(&new.branch_code)
        .bind(new.reorder_threshold_number)
        .bind(new.subscribed.as_str())
        .bind(new.notify_sms.as_str())
        .bind(new.notify_email.as_str())
        .bind(new.notify_rm.as_str())
        .fetch_one(&self.pool)
        .await?;

        debug!(cust_ac_no = %new.cust_ac_no, created = row.inserted, "subscription upserted");
        Ok(Upserted {
            created: row.inserted,
            subscription: Subscription::try_from(row.row)?,
        })
    }

    async fn update_subscription(
        &self,
        cust_ac_no: &str,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(concat!(
            "UPDATE chq_bk_reorder_sub SET \
               branch_code = COALESCE($2, branch_code), \
               reorder_threshold_number = COALESCE($3, reorder_threshold_number), \
               subscribed = COALESCE($4, subscribed), \
               notify_sms = COALESCE($5, notify_sms), \
               notify_email = COALESCE($6, notify_email), \
               notify_rm = COALESCE($7, notify_rm), \
               updated_date = now() \
             WHERE cust_ac_no = $1 \
             RETURNING ",
            subscription_columns!()
        ))
        .bind(cust_ac_no)
        .bind(patch.branch_code.as_deref())
        .bind(patch.reorder_threshold_number)
        .bind(flag_param(patch.subscribed))
        .bind(flag_param(patch.notify_sms))
        .bind(flag_param(patch.notify_email))
        .bind(flag_param(patch.notify_rm))
        .fetch_optional(&self.pool)
        .await?;
        row.map(Subscription::try_from).transpose()
    }

    async fn unsubscribe(&self, cust_ac_no: &str) -> Result<Option<Subscription>, StoreError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(concat!(
            "UPDATE chq_bk_reorder_sub \
             SET subscribed = 'N', notify_sms = 'N', notify_email = 'N', notify_rm = 'N', \
                 updated_date = now() \
             WHERE cust_ac_no = $1 \
             RETURNING ",
            subscription_columns!()
        ))
        .bind(cust_ac_no)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Subscription::try_from).transpose()
    }

    async fn page_subscriptions(
        &self,
        status: Option<Flag>,
        page: PageRequest,
    ) -> Result<SubscriptionSlice, StoreError> {
        // Count and page on the same connection; it returns to the pool on drop.
        let mut conn = self.pool.acquire().await?;
        let status = flag_param(status);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chq_bk_reorder_sub WHERE ($1::text IS NULL OR subscribed = $1)",
        )
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        let rows = sqlx::query_as::<_, SubscriptionRow>(concat!(
            "SELECT ",
            subscription_columns!(),
            " FROM chq_bk_reorder_sub \
             WHERE ($1::text IS NULL OR subscribed = $1) \
             ORDER BY created_date DESC, id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(status)
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&mut *conn)
        .await?;

        Ok(SubscriptionSlice {
            rows: rows
                .into_iter()
                .map(Subscription::try_from)
                .collect::<Result<_, _>>()?,
            total_records: u64::try_from(total).unwrap_or_default(),
        })
    }
}
