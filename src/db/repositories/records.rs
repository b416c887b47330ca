use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};

use crate::entities::{prelude::*, records};

pub struct RecordRepository {
    conn: DatabaseConnection,
}

impl RecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Raw document text stored under `key`
    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        let row = Records::find_by_id(key.to_string()).one(&self.conn).await?;
        Ok(row.map(|r| r.document))
    }

    /// Inserts or replaces the document stored under `key`
    pub async fn upsert(&self, key: &str, document: String) -> Result<(), DbErr> {
        let active_model = records::ActiveModel {
            record_key: Set(key.to_string()),
            document: Set(document),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        Records::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(records::Column::RecordKey)
                    .update_columns([records::Column::Document, records::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }
}
