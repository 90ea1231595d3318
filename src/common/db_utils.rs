use sqlx::{Postgres, QueryBuilder};

use crate::models::tenancy::TenantFilter;

// ---
// Helper de Tenant: a "Chave" das consultas
// ---
/// Acrescenta `AND <column> = $n` quando o filtro é restrito.
/// A consulta precisa já ter um `WHERE` aberto.
pub(crate) fn push_tenant_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &TenantFilter,
    column: &str,
) {
    if let Some(org) = filter.organization_id() {
        builder.push(" AND ").push(column).push(" = ").push_bind(org);
    }
}
