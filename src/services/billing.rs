// src/services/billing.rs

//! Cálculo de fatura do puantaj.
//!
//! Aritmética toda em `Decimal`, sem arredondamento: quem apresenta arredonda.

use rust_decimal::Decimal;

use crate::models::timesheet::{TimesheetCalculation, TimesheetEntry};

/// Alíquota usada quando o puantaj ainda não tem linhas.
pub const DEFAULT_KDV_ORANI: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Fração fixa de retenção (tevkifat) sobre o KDV: 5/10.
pub const TEVKIFAT_ORANI: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

pub fn calculate_timesheet_totals(entries: &[TimesheetEntry]) -> TimesheetCalculation {
    let toplam: Decimal = entries
        .iter()
        .map(|e| Decimal::from(e.sefer_sayisi) * e.birim_fiyat_snapshot)
        .sum();

    // Assume alíquota única por puantaj: vale a da primeira linha.
    // A homogeneidade é garantida na gravação (TimesheetService::upsert_entry).
    let kdv_orani = entries
        .first()
        .map(|e| e.kdv_orani_snapshot)
        .unwrap_or(DEFAULT_KDV_ORANI);

    if entries.iter().any(|e| e.kdv_orani_snapshot != kdv_orani) {
        tracing::warn!(
            timesheet_id = %entries[0].timesheet_id,
            "⚠️ Puantaj com alíquotas de KDV diferentes; usando {}",
            kdv_orani
        );
    }

    let kdv = toplam * kdv_orani / Decimal::ONE_HUNDRED;
    let ara_toplam = toplam + kdv;
    let tevkifat = kdv * TEVKIFAT_ORANI;
    let fatura_tutari = ara_toplam - tevkifat;

    TimesheetCalculation {
        toplam,
        kdv,
        ara_toplam,
        tevkifat,
        fatura_tutari,
    }
}
