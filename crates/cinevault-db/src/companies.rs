//! Production company repository. Rows are created by the movie write path;
//! this side is read-only.

use cinevault_common::Result;

use crate::database::Database;
use crate::schema::ProductionCompany;

pub struct CompanyRepository {
    db: Database,
}

impl CompanyRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: i64, size: i64) -> Result<Vec<ProductionCompany>> {
        let companies: Vec<ProductionCompany> = sqlx::query_as(
            "SELECT id, name, logo_path, origin_country FROM production_companies \
             ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(size)
        .bind(page * size)
        .fetch_all(self.db.pool())
        .await?;
        Ok(companies)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProductionCompany>> {
        let company: Option<ProductionCompany> = sqlx::query_as(
            "SELECT id, name, logo_path, origin_country FROM production_companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(company)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM production_companies")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}
