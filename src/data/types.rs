use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::models::{ArticleId, CommentId, Role, TagId, UserId};

// Integer keys are stored as INTEGER columns
macro_rules! integer_key_sql {
    ($($id:ident),+ $(,)?) => {
        $(
            impl ToSql for $id {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.0))
                }
            }

            impl FromSql for $id {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    i64::column_result(value).map($id)
                }
            }
        )+
    };
}

integer_key_sql!(ArticleId, CommentId, TagId, UserId);

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse::<Role>()
            .map_err(|err| FromSqlError::Other(err.to_string().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_role_column_round_trip() -> anyhow::Result<()> {
        let conn = Connection::open_in_memory()?;
        let role: Role = conn.query_row("SELECT ?1", [Role::Admin], |row| row.get(0))?;
        assert_eq!(role, Role::Admin);

        let bad = conn.query_row("SELECT 'owner'", [], |row| row.get::<_, Role>(0));
        assert!(bad.is_err());
        Ok(())
    }

    #[test]
    fn test_ids_bind_as_integers() -> anyhow::Result<()> {
        let conn = Connection::open_in_memory()?;
        let kind: String = conn.query_row("SELECT typeof(?1)", [ArticleId(7)], |row| row.get(0))?;
        assert_eq!(kind, "integer");

        let id: UserId = conn.query_row("SELECT 42", [], |row| row.get(0))?;
        assert_eq!(id, UserId(42));
        Ok(())
    }
}
