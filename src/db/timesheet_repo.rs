// src/db/timesheet_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::push_tenant_filter, error::AppError},
    models::{
        reports::FactoryTripRow,
        tenancy::TenantFilter,
        timesheet::{Timesheet, TimesheetEntry, TimesheetListQuery, TimesheetStatus},
    },
};

const ENTRY_COLUMNS: &str =
    "id, timesheet_id, route_id, tarih, sefer_sayisi, birim_fiyat_snapshot, kdv_orani_snapshot";

#[derive(Clone)]
pub struct TimesheetRepository {
    pool: PgPool,
}

impl TimesheetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CABEÇALHO (Puantaj)
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create_timesheet(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
        vehicle_id: Uuid,
        driver_id: Option<Uuid>,
        yil: i32,
        ay: i32,
        created_by: Uuid,
    ) -> Result<Timesheet, AppError> {
        sqlx::query_as::<_, Timesheet>(
            r#"
            INSERT INTO timesheets (organization_id, project_id, vehicle_id, driver_id, yil, ay, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(project_id)
        .bind(vehicle_id)
        .bind(driver_id)
        .bind(yil)
        .bind(ay)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::TimesheetAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn list_timesheets(
        &self,
        filter: &TenantFilter,
        query: &TimesheetListQuery,
    ) -> Result<Vec<Timesheet>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM timesheets WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        if let Some(yil) = query.yil {
            qb.push(" AND yil = ").push_bind(yil);
        }
        if let Some(ay) = query.ay {
            qb.push(" AND ay = ").push_bind(ay);
        }
        if let Some(project_id) = query.project_id {
            qb.push(" AND project_id = ").push_bind(project_id);
        }
        qb.push(" ORDER BY yil DESC, ay DESC, created_at DESC");

        Ok(qb.build_query_as::<Timesheet>().fetch_all(&self.pool).await?)
    }

    // Portal do fornecedor: puantajes dos veículos do fornecedor
    pub async fn list_for_supplier(
        &self,
        filter: &TenantFilter,
        supplier_id: Uuid,
    ) -> Result<Vec<Timesheet>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT t.* FROM timesheets t JOIN vehicles v ON v.id = t.vehicle_id WHERE v.supplier_id = ",
        );
        qb.push_bind(supplier_id);
        push_tenant_filter(&mut qb, filter, "t.organization_id");
        qb.push(" ORDER BY t.yil DESC, t.ay DESC");

        Ok(qb.build_query_as::<Timesheet>().fetch_all(&self.pool).await?)
    }

    pub async fn find_timesheet<'e, E>(
        &self,
        executor: E,
        filter: &TenantFilter,
        id: Uuid,
    ) -> Result<Option<Timesheet>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.select_timesheet(executor, filter, id, false).await
    }

    // Mesma busca, mas trava a linha até o fim da transação (upsert/aprovação)
    pub async fn lock_timesheet<'e, E>(
        &self,
        executor: E,
        filter: &TenantFilter,
        id: Uuid,
    ) -> Result<Option<Timesheet>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.select_timesheet(executor, filter, id, true).await
    }

    async fn select_timesheet<'e, E>(
        &self,
        executor: E,
        filter: &TenantFilter,
        id: Uuid,
        for_update: bool,
    ) -> Result<Option<Timesheet>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM timesheets WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");
        if for_update {
            qb.push(" FOR UPDATE");
        }

        Ok(qb.build_query_as::<Timesheet>().fetch_optional(executor).await?)
    }

    pub async fn approve<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        approved_by: Uuid,
    ) -> Result<Timesheet, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let timesheet = sqlx::query_as::<_, Timesheet>(
            r#"
            UPDATE timesheets
            SET status = $1, approved_by = $2, approved_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(TimesheetStatus::Approved)
        .bind(approved_by)
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(timesheet)
    }

    // =========================================================================
    //  LINHAS (Entries)
    // =========================================================================

    pub async fn list_entries<'e, E>(
        &self,
        executor: E,
        timesheet_id: Uuid,
    ) -> Result<Vec<TimesheetEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM timesheet_entries WHERE timesheet_id = $1 ORDER BY tarih ASC, created_at ASC"
        );
        let entries = sqlx::query_as::<_, TimesheetEntry>(&sql)
            .bind(timesheet_id)
            .fetch_all(executor)
            .await?;

        Ok(entries)
    }

    // Linhas de vários puantajes de uma vez (listagens com totais)
    pub async fn list_entries_for(&self, timesheet_ids: &[Uuid]) -> Result<Vec<TimesheetEntry>, AppError> {
        if timesheet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM timesheet_entries WHERE timesheet_id = ANY($1) ORDER BY tarih ASC, created_at ASC"
        );
        let entries = sqlx::query_as::<_, TimesheetEntry>(&sql)
            .bind(timesheet_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Grava a linha de (data, rota).
    ///
    /// Os snapshots só entram no INSERT. Num conflito apenas `sefer_sayisi`
    /// é atualizado, então o preço histórico nunca é recalculado.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_entry<'e, E>(
        &self,
        executor: E,
        timesheet_id: Uuid,
        route_id: Uuid,
        tarih: NaiveDate,
        sefer_sayisi: i32,
        birim_fiyat_snapshot: Decimal,
        kdv_orani_snapshot: Decimal,
    ) -> Result<TimesheetEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO timesheet_entries
                (timesheet_id, route_id, tarih, sefer_sayisi, birim_fiyat_snapshot, kdv_orani_snapshot)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (timesheet_id, tarih, route_id)
            DO UPDATE SET sefer_sayisi = EXCLUDED.sefer_sayisi, updated_at = NOW()
            RETURNING {ENTRY_COLUMNS}
            "#
        );
        let entry = sqlx::query_as::<_, TimesheetEntry>(&sql)
            .bind(timesheet_id)
            .bind(route_id)
            .bind(tarih)
            .bind(sefer_sayisi)
            .bind(birim_fiyat_snapshot)
            .bind(kdv_orani_snapshot)
            .fetch_one(executor)
            .await?;

        Ok(entry)
    }

    // =========================================================================
    //  RELATÓRIO DE FÁBRICA
    // =========================================================================

    pub async fn factory_trips(
        &self,
        filter: &TenantFilter,
        yil: i32,
        ay: i32,
        project_id: Option<Uuid>,
    ) -> Result<Vec<FactoryTripRow>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT r.id AS route_id,
                   r.name AS route_name,
                   p.name AS project_name,
                   p.factory_name,
                   r.fabrika_fiyati,
                   SUM(e.sefer_sayisi)::BIGINT AS sefer
            FROM timesheet_entries e
            JOIN timesheets t ON t.id = e.timesheet_id
            JOIN routes r ON r.id = e.route_id
            JOIN projects p ON p.id = t.project_id
            WHERE t.status = 'APPROVED' AND t.yil = "#,
        );
        qb.push_bind(yil).push(" AND t.ay = ").push_bind(ay);
        push_tenant_filter(&mut qb, filter, "t.organization_id");
        if let Some(project_id) = project_id {
            qb.push(" AND t.project_id = ").push_bind(project_id);
        }
        qb.push(
            " GROUP BY r.id, r.name, p.name, p.factory_name, r.fabrika_fiyati ORDER BY p.name ASC, r.name ASC",
        );

        Ok(qb.build_query_as::<FactoryTripRow>().fetch_all(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::db::fixtures::{reprice_route, seed_timesheet};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[sqlx::test]
    async fn second_write_of_a_line_keeps_the_first_snapshot(pool: PgPool) {
        let seed = seed_timesheet(&pool, dec("150.00"), dec("20")).await.unwrap();
        let repo = TimesheetRepository::new(pool.clone());

        let first = repo
            .upsert_entry(&pool, seed.timesheet_id, seed.route_id, day(10), 4, dec("150.00"), dec("20"))
            .await
            .unwrap();

        reprice_route(&pool, seed.route_id, dec("175.00"), dec("10")).await.unwrap();

        // Mesmo (tarih, rota) com os valores novos da rota
        let second = repo
            .upsert_entry(&pool, seed.timesheet_id, seed.route_id, day(10), 6, dec("175.00"), dec("10"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.sefer_sayisi, 6);
        assert_eq!(second.birim_fiyat_snapshot, dec("150.00"));
        assert_eq!(second.kdv_orani_snapshot, dec("20"));

        let stored = repo.list_entries(&pool, seed.timesheet_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].birim_fiyat_snapshot, dec("150.00"));
        assert_eq!(stored[0].kdv_orani_snapshot, dec("20"));
    }

    #[sqlx::test]
    async fn timesheets_of_another_organization_are_invisible(pool: PgPool) {
        let ours = seed_timesheet(&pool, dec("100"), dec("20")).await.unwrap();
        let theirs = seed_timesheet(&pool, dec("100"), dec("20")).await.unwrap();
        let repo = TimesheetRepository::new(pool.clone());
        let filter = TenantFilter::organization(ours.organization_id);

        assert!(repo.find_timesheet(&pool, &filter, ours.timesheet_id).await.unwrap().is_some());
        assert!(repo.find_timesheet(&pool, &filter, theirs.timesheet_id).await.unwrap().is_none());
        assert!(repo.lock_timesheet(&pool, &filter, theirs.timesheet_id).await.unwrap().is_none());

        let listed = repo.list_timesheets(&filter, &TimesheetListQuery { yil: None, ay: None, project_id: None })
            .await
            .unwrap();
        assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ours.timesheet_id]);

        // Sem restrição enxerga as duas
        let all = TenantFilter::unrestricted();
        assert!(repo.find_timesheet(&pool, &all, theirs.timesheet_id).await.unwrap().is_some());
    }
}
