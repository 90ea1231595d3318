// src/services/timesheet_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FleetRepository, NotificationRepository, ProjectRepository, TimesheetRepository},
    models::{
        auth::Principal,
        notifications::{NewNotification, NotificationType},
        tenancy::TenantFilter,
        timesheet::{
            CreateTimesheetPayload, Timesheet, TimesheetDetail, TimesheetEntry, TimesheetListQuery,
            TimesheetSummary, UpsertEntryPayload,
        },
    },
    services::billing::calculate_timesheet_totals,
};

#[derive(Clone)]
pub struct TimesheetService {
    repo: TimesheetRepository,
    fleet_repo: FleetRepository,
    project_repo: ProjectRepository,
    notification_repo: NotificationRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TimesheetService {
    pub fn new(
        repo: TimesheetRepository,
        fleet_repo: FleetRepository,
        project_repo: ProjectRepository,
        notification_repo: NotificationRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, fleet_repo, project_repo, notification_repo, pool }
    }

    /// Abre o puantaj do mês. Projeto, veículo e motorista precisam ser
    /// visíveis pelo filtro e da mesma organização.
    pub async fn create_timesheet(
        &self,
        principal: &Principal,
        filter: &TenantFilter,
        payload: &CreateTimesheetPayload,
    ) -> Result<Timesheet, AppError> {
        let project = self.project_repo
            .find_project(filter, payload.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Proje {}", payload.project_id)))?;

        // Daqui em diante tudo tem que estar na organização do projeto
        let org_filter = TenantFilter::organization(project.organization_id);

        self.fleet_repo
            .find_vehicle(&org_filter, payload.vehicle_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Araç {}", payload.vehicle_id)))?;

        if let Some(driver_id) = payload.driver_id {
            self.fleet_repo
                .find_driver(&org_filter, driver_id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Şoför {}", driver_id)))?;
        }

        self.repo
            .create_timesheet(
                project.organization_id,
                project.id,
                payload.vehicle_id,
                payload.driver_id,
                payload.yil,
                payload.ay,
                principal.user_id,
            )
            .await
    }

    pub async fn list_timesheets(
        &self,
        filter: &TenantFilter,
        query: &TimesheetListQuery,
    ) -> Result<Vec<TimesheetSummary>, AppError> {
        let timesheets = self.repo.list_timesheets(filter, query).await?;
        self.with_totals(timesheets).await
    }

    pub async fn list_for_supplier(
        &self,
        filter: &TenantFilter,
        supplier_id: Uuid,
    ) -> Result<Vec<TimesheetSummary>, AppError> {
        let timesheets = self.repo.list_for_supplier(filter, supplier_id).await?;
        self.with_totals(timesheets).await
    }

    async fn with_totals(&self, timesheets: Vec<Timesheet>) -> Result<Vec<TimesheetSummary>, AppError> {
        let ids: Vec<Uuid> = timesheets.iter().map(|t| t.id).collect();
        let entries = self.repo.list_entries_for(&ids).await?;
        Ok(summarize(timesheets, entries))
    }

    pub async fn get_detail(&self, filter: &TenantFilter, id: Uuid) -> Result<TimesheetDetail, AppError> {
        let header = self.repo
            .find_timesheet(&self.pool, filter, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Puantaj {}", id)))?;

        let entries = self.repo.list_entries(&self.pool, header.id).await?;
        let calculation = calculate_timesheet_totals(&entries);

        Ok(TimesheetDetail { header, entries, calculation })
    }

    /// Grava a linha (data, rota) de um puantaj em aberto.
    ///
    /// Na primeira gravação o preço e o KDV são copiados da rota; depois disso
    /// só a quantidade de viagens muda.
    pub async fn upsert_entry(
        &self,
        filter: &TenantFilter,
        timesheet_id: Uuid,
        payload: &UpsertEntryPayload,
    ) -> Result<TimesheetEntry, AppError> {
        // 1. Inicia a transação e trava o cabeçalho
        let mut tx = self.pool.begin().await?;

        let timesheet = self.repo
            .lock_timesheet(&mut *tx, filter, timesheet_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Puantaj {}", timesheet_id)))?;

        if timesheet.is_locked() {
            return Err(AppError::TimesheetLocked);
        }
        if !timesheet.covers(payload.tarih) {
            return Err(AppError::EntryOutsidePeriod);
        }

        // 2. A rota tem que ser do mesmo projeto (e portanto da mesma organização)
        let route = self.project_repo
            .find_route(&mut *tx, &TenantFilter::organization(timesheet.organization_id), payload.route_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Güzergah {}", payload.route_id)))?;

        if route.project_id != timesheet.project_id {
            return Err(AppError::RouteProjectMismatch);
        }

        // 3. Alíquota única por puantaj (linha nova apenas; a existente mantém o snapshot)
        let existing = self.repo.list_entries(&mut *tx, timesheet.id).await?;
        let is_new_line = !existing
            .iter()
            .any(|e| e.tarih == payload.tarih && e.route_id == route.id);
        if is_new_line {
            ensure_uniform_vat(&existing, route.kdv_orani)?;
        }

        // 4. Grava
        let entry = self.repo
            .upsert_entry(
                &mut *tx,
                timesheet.id,
                route.id,
                payload.tarih,
                payload.sefer_sayisi,
                route.birim_fiyat,
                route.kdv_orani,
            )
            .await?;

        tx.commit().await?;

        Ok(entry)
    }

    /// DRAFT -> APPROVED e avisa quem abriu o puantaj, tudo na mesma transação.
    pub async fn approve(
        &self,
        approver: &Principal,
        filter: &TenantFilter,
        timesheet_id: Uuid,
    ) -> Result<TimesheetDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let timesheet = self.repo
            .lock_timesheet(&mut *tx, filter, timesheet_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Puantaj {}", timesheet_id)))?;

        if timesheet.is_locked() {
            return Err(AppError::TimesheetLocked);
        }

        let header = self.repo.approve(&mut *tx, timesheet.id, approver.user_id).await?;
        let entries = self.repo.list_entries(&mut *tx, header.id).await?;
        let calculation = calculate_timesheet_totals(&entries);

        self.notification_repo
            .create(
                &mut *tx,
                &NewNotification {
                    organization_id: Some(header.organization_id),
                    user_id: header.created_by,
                    kind: NotificationType::TimesheetApproved,
                    title: "Puantaj onaylandı".to_string(),
                    message: format!(
                        "{}/{:02} dönemi puantajı onaylandı. Fatura tutarı: {:.2} TL",
                        header.yil,
                        header.ay,
                        calculation.fatura_tutari.round_dp(2)
                    ),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(timesheet_id = %header.id, approved_by = %approver.user_id, "✅ Puantaj aprovado");
        Ok(TimesheetDetail { header, entries, calculation })
    }
}

/// Junta cada puantaj com o cálculo das suas linhas.
pub fn summarize(timesheets: Vec<Timesheet>, entries: Vec<TimesheetEntry>) -> Vec<TimesheetSummary> {
    let mut by_timesheet: HashMap<Uuid, Vec<TimesheetEntry>> = HashMap::new();
    for entry in entries {
        by_timesheet.entry(entry.timesheet_id).or_default().push(entry);
    }

    timesheets
        .into_iter()
        .map(|header| {
            let lines = by_timesheet.remove(&header.id).unwrap_or_default();
            TimesheetSummary {
                calculation: calculate_timesheet_totals(&lines),
                header,
            }
        })
        .collect()
}

/// Uma linha nova só entra se tiver a mesma alíquota das que já existem.
pub fn ensure_uniform_vat(existing: &[TimesheetEntry], kdv_orani: Decimal) -> Result<(), AppError> {
    match existing.first() {
        Some(first) if first.kdv_orani_snapshot != kdv_orani => Err(AppError::MixedVatRate {
            expected: first.kdv_orani_snapshot,
            got: kdv_orani,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use crate::db::fixtures::{reprice_route, seed_timesheet};
    use crate::models::timesheet::TimesheetStatus;

    fn timesheet(id: Uuid) -> Timesheet {
        Timesheet {
            id,
            organization_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            driver_id: None,
            yil: 2025,
            ay: 3,
            status: TimesheetStatus::Draft,
            created_by: Uuid::new_v4(),
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    fn entry(timesheet_id: Uuid, sefer: i32, fiyat: i64, kdv: i64) -> TimesheetEntry {
        TimesheetEntry {
            id: Uuid::new_v4(),
            timesheet_id,
            route_id: Uuid::new_v4(),
            tarih: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            sefer_sayisi: sefer,
            birim_fiyat_snapshot: Decimal::from(fiyat),
            kdv_orani_snapshot: Decimal::from(kdv),
        }
    }

    #[test]
    fn period_check_uses_year_and_month() {
        let ts = timesheet(Uuid::new_v4());
        assert!(ts.covers(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(ts.covers(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(!ts.covers(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
        assert!(!ts.covers(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn approved_timesheet_is_locked() {
        let mut ts = timesheet(Uuid::new_v4());
        assert!(!ts.is_locked());
        ts.status = TimesheetStatus::Approved;
        assert!(ts.is_locked());
    }

    #[test]
    fn summaries_group_entries_by_timesheet() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let entries = vec![entry(a, 10, 100, 20), entry(b, 1, 50, 20), entry(a, 5, 200, 20)];

        let summaries = summarize(vec![timesheet(a), timesheet(b), timesheet(c)], entries);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].calculation.toplam, Decimal::from(2000));
        assert_eq!(summaries[0].calculation.fatura_tutari, Decimal::from(2200));
        assert_eq!(summaries[1].calculation.toplam, Decimal::from(50));
        // Sem linhas: tudo zero
        assert_eq!(summaries[2].calculation.fatura_tutari, Decimal::ZERO);
    }

    #[test]
    fn mixed_vat_rates_are_rejected() {
        let id = Uuid::new_v4();
        let existing = vec![entry(id, 1, 100, 20)];

        assert!(ensure_uniform_vat(&[], Decimal::from(18)).is_ok());
        assert!(ensure_uniform_vat(&existing, Decimal::from(20)).is_ok());
        assert!(matches!(
            ensure_uniform_vat(&existing, Decimal::from(10)),
            Err(AppError::MixedVatRate { .. })
        ));
    }

    fn service(pool: &PgPool) -> TimesheetService {
        TimesheetService::new(
            TimesheetRepository::new(pool.clone()),
            FleetRepository::new(pool.clone()),
            ProjectRepository::new(pool.clone()),
            NotificationRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    #[sqlx::test]
    async fn repricing_a_route_does_not_touch_recorded_lines(pool: PgPool) {
        let seed = seed_timesheet(&pool, Decimal::from(150), Decimal::from(20)).await.unwrap();
        let service = service(&pool);
        let filter = TenantFilter::organization(seed.organization_id);
        let line = |sefer| UpsertEntryPayload {
            route_id: seed.route_id,
            tarih: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            sefer_sayisi: sefer,
        };

        service.upsert_entry(&filter, seed.timesheet_id, &line(4)).await.unwrap();
        reprice_route(&pool, seed.route_id, Decimal::from(175), Decimal::from(10)).await.unwrap();

        // A linha existente aceita a nova quantidade sem checar a alíquota nova
        let entry = service.upsert_entry(&filter, seed.timesheet_id, &line(6)).await.unwrap();
        assert_eq!(entry.sefer_sayisi, 6);
        assert_eq!(entry.birim_fiyat_snapshot, Decimal::from(150));
        assert_eq!(entry.kdv_orani_snapshot, Decimal::from(20));

        let detail = service.get_detail(&filter, seed.timesheet_id).await.unwrap();
        assert_eq!(detail.calculation.toplam, Decimal::from(900));
        assert_eq!(detail.calculation.kdv, Decimal::from(180));
    }

    #[sqlx::test]
    async fn entries_cannot_target_another_organization(pool: PgPool) {
        let ours = seed_timesheet(&pool, Decimal::from(100), Decimal::from(20)).await.unwrap();
        let theirs = seed_timesheet(&pool, Decimal::from(100), Decimal::from(20)).await.unwrap();
        let service = service(&pool);
        let filter = TenantFilter::organization(ours.organization_id);
        let tarih = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();

        // Puantaj alheio
        let foreign_sheet = UpsertEntryPayload { route_id: ours.route_id, tarih, sefer_sayisi: 1 };
        let result = service.upsert_entry(&filter, theirs.timesheet_id, &foreign_sheet).await;
        assert!(matches!(result, Err(AppError::ResourceNotFound(_))));

        // Rota alheia no nosso puantaj
        let foreign_route = UpsertEntryPayload { route_id: theirs.route_id, tarih, sefer_sayisi: 1 };
        let result = service.upsert_entry(&filter, ours.timesheet_id, &foreign_route).await;
        assert!(matches!(result, Err(AppError::ResourceNotFound(_))));

        assert!(matches!(
            service.get_detail(&filter, theirs.timesheet_id).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }
}
