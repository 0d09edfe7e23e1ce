//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::quota_usage;
use crate::domain::QuotaRecord;

/// Database row for a caller's daily counter.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = quota_usage)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuotaUsageRow {
    pub key: String,
    pub date: String,
    pub count: i32,
}

impl From<QuotaUsageRow> for QuotaRecord {
    fn from(row: QuotaUsageRow) -> Self {
        // Counts are only ever written from u32 values.
        Self::new(row.key, row.date, u32::try_from(row.count).unwrap_or(0))
    }
}

impl From<&QuotaRecord> for QuotaUsageRow {
    fn from(record: &QuotaRecord) -> Self {
        Self {
            key: record.key.clone(),
            date: record.date.clone(),
            count: i32::try_from(record.count).unwrap_or(i32::MAX),
        }
    }
}

/// Row returned by the conditional increment.
#[derive(QueryableByName, Debug)]
pub struct CountRow {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub count: i32,
}
