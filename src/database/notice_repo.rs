use sqlx::SqlitePool;

pub struct NewOperatorNotice<'a> {
    pub notice_id: &'a str,
    pub kind: &'a str, // member_of_the_week|weekly_digest
    pub subject: &'a str,
    pub body: &'a str,
    pub created_at: &'a str,
}

const SQL_INSERT_OPERATOR_NOTICE: &str = r#"
INSERT INTO operator_notices (
  notice_id,
  kind,
  subject,
  body,
  created_at
) VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub async fn insert_operator_notice(
    pool: &SqlitePool,
    notice: NewOperatorNotice<'_>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_OPERATOR_NOTICE)
        .bind(notice.notice_id)
        .bind(notice.kind)
        .bind(notice.subject)
        .bind(notice.body)
        .bind(notice.created_at)
        .execute(pool)
        .await?;
    Ok(())
}
