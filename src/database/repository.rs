use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;

/// Plain table access keyed by an integer `id` column
pub struct Repository<T> {
    table_name: &'static str,
    columns: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, columns: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            columns,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", self.columns, self.table_name);
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    /// Deletes by id, reporting `NotFound` when no row matched
    pub async fn delete_404(&self, id: i32) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table_name);
        let removed = sqlx::query(&sql).bind(id).execute(&self.pool).await?.rows_affected();
        if removed == 0 {
            return Err(DatabaseError::NotFound(format!("{} {} not found", self.entity_name(), id)));
        }
        Ok(())
    }

    fn entity_name(&self) -> &'static str {
        self.table_name.strip_suffix('s').unwrap_or(self.table_name)
    }
}
