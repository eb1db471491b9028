use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info};

use super::list_codec::ListCodec;
use super::manager::DatabaseError;
use super::query_builder::{bind_param_query, InspectionListQuery};
use super::record::{
    AuditRow, HeadRow, InspectionDetailRow, InspectionRows, OrganizationRow, StoredInspection,
};
use crate::api::{ActPayload, InspectionResponse};

const SELECT_INSPECTION: &str = r#"
    SELECT
        act.id,
        act.created_by,
        act.updated_by,
        act.created_at,
        act.updated_at,
        org.organization_full_name,
        COALESCE(org.organization_short_name, '') AS organization_short_name,
        org.organization_ogrn,
        org.organization_legal_address,
        COALESCE(org.organization_postal_address, '') AS organization_postal_address,
        head.leader_position,
        head.leader_last_name,
        head.leader_first_name,
        COALESCE(head.leader_middle_name, '') AS leader_middle_name,
        insp.inspection_type,
        insp.minzdrav_order_number,
        insp.minzdrav_order_date,
        insp.inspection_number,
        insp.date_start,
        insp.date_end,
        insp.duration_work_days,
        insp.letter_number,
        insp.letter_date,
        COALESCE(insp.representative_document, '') AS representative_document,
        insp.addresses,
        insp.authorized_persons,
        insp.signatories,
        insp.representatives
    FROM act
    INNER JOIN act_organization org ON org.act_id = act.id
    INNER JOIN act_head head ON head.act_id = act.id
    INNER JOIN act_inspection insp ON insp.act_id = act.id
"#;

const COUNT_INSPECTIONS: &str = r#"
    SELECT COUNT(*) AS count
    FROM act
    INNER JOIN act_organization org ON org.act_id = act.id
    INNER JOIN act_head head ON head.act_id = act.id
    INNER JOIN act_inspection insp ON insp.act_id = act.id
"#;

const INSERT_ORGANIZATION: &str = r#"
    INSERT INTO act_organization (
        act_id,
        organization_full_name,
        organization_short_name,
        organization_ogrn,
        organization_legal_address,
        organization_postal_address
    ) VALUES ($1, $2, $3, $4, $5, $6)
"#;

const UPDATE_ORGANIZATION_ON_CONFLICT: &str = r#"
    ON CONFLICT (act_id) DO UPDATE SET
        organization_full_name = EXCLUDED.organization_full_name,
        organization_short_name = EXCLUDED.organization_short_name,
        organization_ogrn = EXCLUDED.organization_ogrn,
        organization_legal_address = EXCLUDED.organization_legal_address,
        organization_postal_address = EXCLUDED.organization_postal_address
"#;

const INSERT_HEAD: &str = r#"
    INSERT INTO act_head (
        act_id,
        leader_position,
        leader_last_name,
        leader_first_name,
        leader_middle_name
    ) VALUES ($1, $2, $3, $4, $5)
"#;

const UPDATE_HEAD_ON_CONFLICT: &str = r#"
    ON CONFLICT (act_id) DO UPDATE SET
        leader_position = EXCLUDED.leader_position,
        leader_last_name = EXCLUDED.leader_last_name,
        leader_first_name = EXCLUDED.leader_first_name,
        leader_middle_name = EXCLUDED.leader_middle_name
"#;

const INSERT_DETAIL: &str = r#"
    INSERT INTO act_inspection (
        act_id,
        inspection_type,
        minzdrav_order_number,
        minzdrav_order_date,
        inspection_number,
        date_start,
        date_end,
        duration_work_days,
        letter_number,
        letter_date,
        representative_document,
        addresses,
        authorized_persons,
        signatories,
        representatives
    ) VALUES (
        $1, $2, $3, $4, $5,
        $6, $7, $8,
        $9, $10, $11,
        $12, $13, $14, $15
    )
"#;

const UPDATE_DETAIL_ON_CONFLICT: &str = r#"
    ON CONFLICT (act_id) DO UPDATE SET
        inspection_type = EXCLUDED.inspection_type,
        minzdrav_order_number = EXCLUDED.minzdrav_order_number,
        minzdrav_order_date = EXCLUDED.minzdrav_order_date,
        inspection_number = EXCLUDED.inspection_number,
        date_start = EXCLUDED.date_start,
        date_end = EXCLUDED.date_end,
        duration_work_days = EXCLUDED.duration_work_days,
        letter_number = EXCLUDED.letter_number,
        letter_date = EXCLUDED.letter_date,
        representative_document = EXCLUDED.representative_document,
        addresses = EXCLUDED.addresses,
        authorized_persons = EXCLUDED.authorized_persons,
        signatories = EXCLUDED.signatories,
        representatives = EXCLUDED.representatives
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Insert,
    Upsert,
}

impl WriteMode {
    fn statement(self, insert: &str, on_conflict: &str) -> String {
        match self {
            WriteMode::Insert => insert.to_string(),
            WriteMode::Upsert => format!("{}{}", insert, on_conflict),
        }
    }
}

/// Reads and writes inspection acts across `act` and its three sub-tables.
///
/// Every multi-statement write runs in one transaction; a failure anywhere
/// drops the transaction and rolls everything back.
#[derive(Clone)]
pub struct InspectionStore {
    pool: PgPool,
    lists: Arc<dyn ListCodec>,
}

impl InspectionStore {
    pub fn new(pool: PgPool, lists: Arc<dyn ListCodec>) -> Self {
        Self { pool, lists }
    }

    pub async fn fetch_by_id(&self, id: i32) -> Result<InspectionResponse, DatabaseError> {
        let sql = format!("{} WHERE act.id = $1", SELECT_INSPECTION);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("inspection {} not found", id)))?;

        Ok(self.stored_from_row(&row)?.into_response())
    }

    /// One page of acts, newest first, plus the total matching count.
    pub async fn list(&self, query: &InspectionListQuery) -> Result<(Vec<InspectionResponse>, i64), DatabaseError> {
        let filter = query.where_clause();

        let count_sql = format!("{} WHERE {}", COUNT_INSPECTIONS, filter.query);
        let mut count_query = sqlx::query(&count_sql);
        for param in filter.params.iter() {
            count_query = bind_param_query(count_query, param);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.try_get("count")?;

        let n = filter.params.len();
        let page_sql = format!(
            "{} WHERE {} ORDER BY act.created_at DESC, act.id DESC LIMIT ${} OFFSET ${}",
            SELECT_INSPECTION,
            filter.query,
            n + 1,
            n + 2
        );
        let mut page_query = sqlx::query(&page_sql);
        for param in filter.params.iter() {
            page_query = bind_param_query(page_query, param);
        }
        let rows = page_query
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(|row| self.stored_from_row(row).map(StoredInspection::into_response))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Listed {} of {} inspections (page {})", items.len(), total, query.page);
        Ok((items, total))
    }

    pub async fn insert(&self, payload: &ActPayload, created_by: &str) -> Result<InspectionResponse, DatabaseError> {
        let rows = InspectionRows::from_payload(payload);

        let mut tx = self.pool.begin().await?;
        let id: i32 = sqlx::query_scalar("INSERT INTO act (created_by, updated_by) VALUES ($1, $1) RETURNING id")
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;
        self.write_rows(&mut tx, id, &rows, WriteMode::Insert).await?;
        tx.commit().await?;

        info!("Created inspection {} by {}", id, created_by);
        self.fetch_by_id(id).await
    }

    /// Replaces the sub-rows of an existing act. A missing act changes nothing.
    pub async fn update(&self, id: i32, payload: &ActPayload, updated_by: &str) -> Result<InspectionResponse, DatabaseError> {
        let rows = InspectionRows::from_payload(payload);

        let mut tx = self.pool.begin().await?;
        let touched = sqlx::query("UPDATE act SET updated_by = $1, updated_at = now() WHERE id = $2")
            .bind(updated_by)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if touched == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::NotFound(format!("inspection {} not found", id)));
        }
        self.write_rows(&mut tx, id, &rows, WriteMode::Upsert).await?;
        tx.commit().await?;

        info!("Updated inspection {} by {}", id, updated_by);
        self.fetch_by_id(id).await
    }

    /// Removes the act and its sub-rows in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for table in ["act_inspection", "act_head", "act_organization"] {
            sqlx::query(&format!("DELETE FROM {} WHERE act_id = $1", table))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let removed = sqlx::query("DELETE FROM act WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::NotFound(format!("inspection {} not found", id)));
        }
        tx.commit().await?;

        info!("Deleted inspection {}", id);
        Ok(())
    }

    async fn write_rows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        act_id: i32,
        rows: &InspectionRows,
        mode: WriteMode,
    ) -> Result<(), DatabaseError> {
        let org = &rows.organization;
        let sql = mode.statement(INSERT_ORGANIZATION, UPDATE_ORGANIZATION_ON_CONFLICT);
        sqlx::query(&sql)
            .bind(act_id)
            .bind(&org.full_name)
            .bind(&org.short_name)
            .bind(&org.ogrn)
            .bind(&org.legal_address)
            .bind(&org.postal_address)
            .execute(&mut **tx)
            .await?;

        let head = &rows.head;
        let sql = mode.statement(INSERT_HEAD, UPDATE_HEAD_ON_CONFLICT);
        sqlx::query(&sql)
            .bind(act_id)
            .bind(&head.position)
            .bind(&head.last_name)
            .bind(&head.first_name)
            .bind(&head.middle_name)
            .execute(&mut **tx)
            .await?;

        let detail = &rows.detail;
        let sql = mode.statement(INSERT_DETAIL, UPDATE_DETAIL_ON_CONFLICT);
        let query = sqlx::query(&sql)
            .bind(act_id)
            .bind(&detail.inspection_type)
            .bind(&detail.order_number)
            .bind(detail.order_date)
            .bind(&detail.inspection_number)
            .bind(detail.date_start)
            .bind(detail.date_end)
            .bind(detail.duration_work_days)
            .bind(&detail.letter_number)
            .bind(detail.letter_date)
            .bind(&detail.representative_document);
        let query = self.lists.bind(query, &detail.addresses)?;
        let query = self.lists.bind(query, &detail.authorized_persons)?;
        let query = self.lists.bind(query, &detail.signatories)?;
        let query = self.lists.bind(query, &detail.representatives)?;
        query.execute(&mut **tx).await?;

        Ok(())
    }

    fn stored_from_row(&self, row: &PgRow) -> Result<StoredInspection, DatabaseError> {
        Ok(StoredInspection {
            audit: AuditRow {
                id: row.try_get("id")?,
                created_by: row.try_get("created_by")?,
                updated_by: row.try_get("updated_by")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            },
            rows: InspectionRows {
                organization: OrganizationRow {
                    full_name: row.try_get("organization_full_name")?,
                    short_name: row.try_get("organization_short_name")?,
                    ogrn: row.try_get("organization_ogrn")?,
                    legal_address: row.try_get("organization_legal_address")?,
                    postal_address: row.try_get("organization_postal_address")?,
                },
                head: HeadRow {
                    position: row.try_get("leader_position")?,
                    last_name: row.try_get("leader_last_name")?,
                    first_name: row.try_get("leader_first_name")?,
                    middle_name: row.try_get("leader_middle_name")?,
                },
                detail: InspectionDetailRow {
                    inspection_type: row.try_get("inspection_type")?,
                    order_number: row.try_get("minzdrav_order_number")?,
                    order_date: row.try_get("minzdrav_order_date")?,
                    inspection_number: row.try_get("inspection_number")?,
                    date_start: row.try_get("date_start")?,
                    date_end: row.try_get("date_end")?,
                    duration_work_days: row.try_get("duration_work_days")?,
                    letter_number: row.try_get("letter_number")?,
                    letter_date: row.try_get("letter_date")?,
                    representative_document: row.try_get("representative_document")?,
                    addresses: self.lists.decode(row, "addresses")?,
                    authorized_persons: self.lists.decode(row, "authorized_persons")?,
                    signatories: self.lists.decode(row, "signatories")?,
                    representatives: self.lists.decode(row, "representatives")?,
                },
            },
        })
    }
}
