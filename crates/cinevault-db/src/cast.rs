//! Cast member repository. Cast rows belong to exactly one movie and are
//! written with it; deleting the movie cascades here.

use cinevault_common::Result;

use crate::database::Database;
use crate::schema::CastMember;

pub struct CastRepository {
    db: Database,
}

impl CastRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: i64, size: i64) -> Result<Vec<CastMember>> {
        let members: Vec<CastMember> = sqlx::query_as(
            "SELECT id, movie_id, tmdb_id, name, character, profile_path, credit_order \
             FROM cast_members ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(size)
        .bind(page * size)
        .fetch_all(self.db.pool())
        .await?;
        Ok(members)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CastMember>> {
        let member: Option<CastMember> = sqlx::query_as(
            "SELECT id, movie_id, tmdb_id, name, character, profile_path, credit_order \
             FROM cast_members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(member)
    }

    /// A movie's billed cast in credit order.
    pub async fn find_by_movie(&self, movie_id: i64) -> Result<Vec<CastMember>> {
        let members: Vec<CastMember> = sqlx::query_as(
            "SELECT id, movie_id, tmdb_id, name, character, profile_path, credit_order \
             FROM cast_members WHERE movie_id = $1 ORDER BY credit_order ASC, id ASC",
        )
        .bind(movie_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(members)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cast_members")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}
