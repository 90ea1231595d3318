// src/services/report_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, TimesheetRepository},
    models::{
        auth::Principal,
        notifications::{NewNotification, NotificationType},
        reports::{FactoryReport, FactoryReportLine, FactoryReportQuery, FactoryTripRow},
        tenancy::TenantFilter,
    },
};

#[derive(Clone)]
pub struct ReportService {
    timesheet_repo: TimesheetRepository,
    notification_repo: NotificationRepository,
    fonts_dir: PathBuf,
    pool: PgPool,
}

impl ReportService {
    pub fn new(
        timesheet_repo: TimesheetRepository,
        notification_repo: NotificationRepository,
        fonts_dir: PathBuf,
        pool: PgPool,
    ) -> Self {
        Self { timesheet_repo, notification_repo, fonts_dir, pool }
    }

    /// Viagens de puantajs aprovados no mês, valorizadas pelo preço de fábrica.
    pub async fn factory_report(
        &self,
        filter: &TenantFilter,
        query: &FactoryReportQuery,
    ) -> Result<FactoryReport, AppError> {
        let rows = self.timesheet_repo
            .factory_trips(filter, query.yil, query.ay, query.project_id)
            .await?;

        let report = build_factory_report(query.yil, query.ay, rows);
        let missing = report.lines.iter().filter(|l| l.missing_price).count();
        if missing > 0 {
            tracing::warn!(yil = report.yil, ay = report.ay, missing, "Rotas sem preço de fábrica no relatório");
        }

        Ok(report)
    }

    pub async fn factory_report_pdf(
        &self,
        requester: &Principal,
        filter: &TenantFilter,
        query: &FactoryReportQuery,
    ) -> Result<Vec<u8>, AppError> {
        let report = self.factory_report(filter, query).await?;

        // A renderização é CPU pura, fica fora do executor
        let fonts_dir = self.fonts_dir.clone();
        let render_input = report.clone();
        let buffer = tokio::task::spawn_blocking(move || render_factory_pdf(&fonts_dir, &render_input))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização do PDF: {}", e))??;

        self.notification_repo
            .create(
                &self.pool,
                &NewNotification {
                    organization_id: requester.organization_id,
                    user_id: requester.user_id,
                    kind: NotificationType::ReportReady,
                    title: "Fabrika raporu hazır".to_string(),
                    message: format!("{}/{:02} dönemi fabrika raporu oluşturuldu.", report.yil, report.ay),
                },
            )
            .await?;

        Ok(buffer)
    }
}

/// Agrega as linhas do banco: tutar = sefer × fabrika_fiyati.
/// Sem preço de fábrica a linha vale zero e fica marcada.
pub fn build_factory_report(yil: i32, ay: i32, rows: Vec<FactoryTripRow>) -> FactoryReport {
    let lines: Vec<FactoryReportLine> = rows
        .into_iter()
        .map(|row| {
            let tutar = row
                .fabrika_fiyati
                .map(|fiyat| Decimal::from(row.sefer) * fiyat)
                .unwrap_or(Decimal::ZERO);

            FactoryReportLine {
                route_id: row.route_id,
                route_name: row.route_name,
                project_name: row.project_name,
                factory_name: row.factory_name,
                sefer: row.sefer,
                missing_price: row.fabrika_fiyati.is_none(),
                fabrika_fiyati: row.fabrika_fiyati,
                tutar,
            }
        })
        .collect();

    FactoryReport {
        yil,
        ay,
        toplam_sefer: lines.iter().map(|l| l.sefer).sum(),
        toplam_tutar: lines.iter().map(|l| l.tutar).sum(),
        lines,
    }
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

pub fn render_factory_pdf(fonts_dir: &std::path::Path, report: &FactoryReport) -> Result<Vec<u8>, AppError> {
    // 1. Fonte (precisa de suporte aos caracteres turcos)
    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None)
        .map_err(|_| AppError::FontNotFound(format!("Fonte não encontrada em {}", fonts_dir.display())))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Fabrika Raporu {}/{:02}", report.yil, report.ay));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(elements::Paragraph::new("FABRİKA SEFER RAPORU")
        .styled(style::Style::new().bold().with_font_size(16)));
    doc.push(elements::Paragraph::new(format!("Dönem: {}/{:02}", report.ay, report.yil)));
    doc.push(elements::Break::new(1.5));

    // --- TABELA ---
    // Pesos: Proje (3), Güzergah (4), Sefer (1), Fiyat (2), Tutar (2)
    let mut table = elements::TableLayout::new(vec![3, 4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    table.row()
        .element(elements::Paragraph::new("Proje").styled(style_bold))
        .element(elements::Paragraph::new("Güzergah").styled(style_bold))
        .element(elements::Paragraph::new("Sefer").styled(style_bold))
        .element(elements::Paragraph::new("Fabrika Fiyatı").styled(style_bold))
        .element(elements::Paragraph::new("Tutar").styled(style_bold))
        .push()
        .map_err(pdf_error)?;

    for line in &report.lines {
        let fiyat = match line.fabrika_fiyati {
            Some(f) => format!("{:.2} TL", f),
            None => "-".to_string(),
        };
        table.row()
            .element(elements::Paragraph::new(line.project_name.clone()))
            .element(elements::Paragraph::new(line.route_name.clone()))
            .element(elements::Paragraph::new(line.sefer.to_string()))
            .element(elements::Paragraph::new(fiyat))
            .element(elements::Paragraph::new(format!("{:.2} TL", line.tutar)))
            .push()
            .map_err(pdf_error)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- TOTAIS ---
    let mut total = elements::Paragraph::new(format!(
        "TOPLAM: {} sefer / {:.2} TL",
        report.toplam_sefer, report.toplam_tutar
    ));
    total.set_alignment(genpdf::Alignment::Right);
    doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

    if report.lines.iter().any(|l| l.missing_price) {
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new("Fiyatı tanımlanmamış güzergahlar 0 TL olarak hesaplanmıştır.")
            .styled(style::Style::new().italic().with_font_size(8)));
    }

    // 2. Renderiza em memória
    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn row(name: &str, sefer: i64, fiyat: Option<&str>) -> FactoryTripRow {
        FactoryTripRow {
            route_id: Uuid::new_v4(),
            route_name: name.to_string(),
            project_name: "Gebze Servis".to_string(),
            factory_name: Some("Arçelik".to_string()),
            fabrika_fiyati: fiyat.map(|f| Decimal::from_str(f).unwrap()),
            sefer,
        }
    }

    #[test]
    fn report_values_trips_at_factory_price() {
        let report = build_factory_report(
            2025,
            3,
            vec![row("Kadıköy", 42, Some("1600.00")), row("Pendik", 10, Some("99.95"))],
        );

        assert_eq!(report.lines[0].tutar, Decimal::from(67200));
        assert_eq!(report.lines[1].tutar, Decimal::from_str("999.50").unwrap());
        assert_eq!(report.toplam_sefer, 52);
        assert_eq!(report.toplam_tutar, Decimal::from_str("68199.50").unwrap());
        assert!(report.lines.iter().all(|l| !l.missing_price));
    }

    #[test]
    fn route_without_factory_price_counts_as_zero() {
        let report = build_factory_report(2025, 3, vec![row("Tuzla", 7, None), row("Kartal", 2, Some("50"))]);

        assert!(report.lines[0].missing_price);
        assert_eq!(report.lines[0].tutar, Decimal::ZERO);
        assert_eq!(report.toplam_sefer, 9);
        assert_eq!(report.toplam_tutar, Decimal::from(100));
    }

    #[test]
    fn empty_month_gives_empty_report() {
        let report = build_factory_report(2025, 1, Vec::new());
        assert!(report.lines.is_empty());
        assert_eq!(report.toplam_sefer, 0);
        assert_eq!(report.toplam_tutar, Decimal::ZERO);
    }

    #[test]
    fn missing_fonts_are_reported() {
        let report = build_factory_report(2025, 1, Vec::new());
        let result = render_factory_pdf(std::path::Path::new("/caminho/que/nao/existe"), &report);
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}
