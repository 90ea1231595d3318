// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "tr";

// Catálogo de mensagens por idioma. Chaves desconhecidas voltam a própria chave.
const TR: &[(&str, &str)] = &[
    ("unauthenticated", "Oturum açmanız gerekiyor."),
    ("invalid_credentials", "E-posta veya şifre hatalı."),
    ("forbidden_admin_only", "Bu işlem yalnızca yöneticiler (ADMIN) tarafından yapılabilir."),
    ("forbidden_factory_price", "Fabrika fiyatını düzenleme yetkiniz yok."),
    ("forbidden_factory_report", "Fabrika raporu oluşturma yetkiniz yok."),
    ("forbidden_timesheet_approval", "Puantaj onaylama yetkiniz yok."),
    ("forbidden_back_office", "Bu alana erişim yetkiniz yok."),
    ("forbidden_supplier_only", "Bu alan yalnızca tedarikçi kullanıcılarına açıktır."),
    ("forbidden_supplier_scope", "Tedarikçi hesabınız bir tedarikçiye bağlı değil."),
    ("forbidden_cross_tenant", "Başka bir organizasyonun verisine erişemezsiniz."),
    ("validation_failed", "Bir veya daha fazla alan geçersiz."),
    ("required", "Bu alan zorunludur."),
    ("invalid_email", "Geçersiz e-posta adresi."),
    ("password_too_short", "Şifre en az 6 karakter olmalıdır."),
    ("must_be_non_negative", "Değer negatif olamaz."),
    ("money_too_large", "Tutar 999.999.999.999,99 değerini aşamaz."),
    ("unknown_role", "Geçersiz rol. ADMIN, MANAGER, USER veya SUPPLIER olmalıdır."),
    ("percentage_out_of_range", "Oran 0 ile 100 arasında olmalıdır."),
    ("trip_count_out_of_range", "Sefer sayısı 0 ile 1000 arasında olmalıdır."),
    ("year_out_of_range", "Geçersiz yıl."),
    ("month_out_of_range", "Ay 1 ile 12 arasında olmalıdır."),
    ("capacity_out_of_range", "Kapasite 1 ile 100 arasında olmalıdır."),
    ("email_already_exists", "Bu e-posta adresi zaten kullanılıyor."),
    ("organization_required", "Organizasyon belirtilmelidir."),
    ("supplier_required", "Tedarikçi kullanıcıları için tedarikçi seçilmelidir."),
    ("not_found", "Kayıt bulunamadı."),
    ("timesheet_locked", "Onaylanmış puantaj değiştirilemez."),
    ("timesheet_already_exists", "Bu araç ve proje için bu ayın puantajı zaten var."),
    ("entry_outside_period", "Tarih puantaj dönemine ait değil."),
    ("mixed_vat_rate", "Puantajdaki tüm satırlar aynı KDV oranını kullanmalıdır."),
    ("route_project_mismatch", "Güzergah bu puantajın projesine ait değil."),
    ("font_not_found", "Rapor yazı tipi bulunamadı."),
    ("internal_error", "Beklenmeyen bir hata oluştu."),
];

const EN: &[(&str, &str)] = &[
    ("unauthenticated", "You need to sign in."),
    ("invalid_credentials", "Invalid email or password."),
    ("forbidden_admin_only", "Only administrators (ADMIN) can perform this action."),
    ("forbidden_factory_price", "You are not allowed to edit factory prices."),
    ("forbidden_factory_report", "You are not allowed to generate factory reports."),
    ("forbidden_timesheet_approval", "You are not allowed to approve timesheets."),
    ("forbidden_back_office", "You are not allowed to access this area."),
    ("forbidden_supplier_only", "This area is only available to supplier users."),
    ("forbidden_supplier_scope", "Your supplier account is not linked to a supplier."),
    ("forbidden_cross_tenant", "You cannot access another organization's data."),
    ("validation_failed", "One or more fields are invalid."),
    ("required", "This field is required."),
    ("invalid_email", "Invalid email address."),
    ("password_too_short", "Password must be at least 6 characters."),
    ("must_be_non_negative", "Value cannot be negative."),
    ("money_too_large", "Amount cannot exceed 999,999,999,999.99."),
    ("unknown_role", "Invalid role. Must be ADMIN, MANAGER, USER or SUPPLIER."),
    ("percentage_out_of_range", "Rate must be between 0 and 100."),
    ("trip_count_out_of_range", "Trip count must be between 0 and 1000."),
    ("year_out_of_range", "Invalid year."),
    ("month_out_of_range", "Month must be between 1 and 12."),
    ("capacity_out_of_range", "Capacity must be between 1 and 100."),
    ("email_already_exists", "This email is already in use."),
    ("organization_required", "An organization must be specified."),
    ("supplier_required", "Supplier users must be linked to a supplier."),
    ("not_found", "Record not found."),
    ("timesheet_locked", "Approved timesheets cannot be changed."),
    ("timesheet_already_exists", "A timesheet for this vehicle, project and month already exists."),
    ("entry_outside_period", "Date is outside the timesheet period."),
    ("mixed_vat_rate", "All lines of a timesheet must share the same VAT rate."),
    ("route_project_mismatch", "Route does not belong to this timesheet's project."),
    ("font_not_found", "Report font not found."),
    ("internal_error", "An unexpected error occurred."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("tr", TR.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }

    /// Traduz `key` para `lang`, caindo para o turco e depois para a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_have_the_same_keys() {
        let tr: Vec<_> = TR.iter().map(|(k, _)| *k).collect();
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(tr, en);
    }

    #[test]
    fn falls_back_to_turkish_then_to_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "not_found"), "Record not found.");
        assert_eq!(store.translate("de", "not_found"), "Kayıt bulunamadı.");
        assert_eq!(store.translate("en", "no_such_key"), "no_such_key");
    }
}
