// src/db/dashboard_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use crate::{
    common::{db_utils::push_tenant_filter, error::AppError},
    models::{dashboard::DashboardSummary, tenancy::TenantFilter},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, table: &str, extra: Option<&str>, filter: &TenantFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {table} WHERE TRUE"));
        if let Some(extra) = extra {
            qb.push(" AND ").push(extra);
        }
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?)
    }

    // Resumo Geral: as contagens são independentes, então rodam em paralelo
    pub async fn get_summary(&self, filter: &TenantFilter) -> Result<DashboardSummary, AppError> {
        let (suppliers, vehicles, drivers, projects, routes, draft_timesheets) = tokio::try_join!(
            self.count("suppliers", None, filter),
            self.count("vehicles", Some("is_active"), filter),
            self.count("drivers", Some("is_active"), filter),
            self.count("projects", Some("is_active"), filter),
            self.count("routes", None, filter),
            self.count("timesheets", Some("status = 'DRAFT'"), filter),
        )?;

        Ok(DashboardSummary {
            suppliers,
            vehicles,
            drivers,
            projects,
            routes,
            draft_timesheets,
        })
    }
}
