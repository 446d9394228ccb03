use std::collections::HashMap;

use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entities::{playlist_categories, playlist_category, prelude::*};

pub struct PlaylistCategoryRepository {
    conn: DatabaseConnection,
}

impl PlaylistCategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List categories ordered by name, each with its playlist count.
    pub async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<(playlist_categories::Model, i64)>> {
        let mut query = PlaylistCategories::find().order_by_asc(playlist_categories::Column::Name);

        if let Some(term) = search {
            query = query.filter(playlist_categories::Column::Name.contains(term));
        }

        let categories = query.all(&self.conn).await?;

        let counts: Vec<(i32, i64)> = PlaylistCategory::find()
            .select_only()
            .column(playlist_category::Column::CategoryId)
            .column_as(playlist_category::Column::PlaylistId.count(), "count")
            .group_by(playlist_category::Column::CategoryId)
            .into_tuple()
            .all(&self.conn)
            .await?;
        let counts: HashMap<i32, i64> = counts.into_iter().collect();

        Ok(categories
            .into_iter()
            .map(|c| {
                let count = counts.get(&c.id).copied().unwrap_or(0);
                (c, count)
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<playlist_categories::Model>> {
        let category = PlaylistCategories::find_by_id(id).one(&self.conn).await?;
        Ok(category)
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query =
            PlaylistCategories::find().filter(playlist_categories::Column::Name.eq(name));

        if let Some(id) = exclude_id {
            query = query.filter(playlist_categories::Column::Id.ne(id));
        }

        Ok(query.one(&self.conn).await?.is_some())
    }

    pub async fn create(&self, name: &str) -> Result<playlist_categories::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = PlaylistCategories::insert(playlist_categories::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = PlaylistCategories::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created playlist category"))?;

        Ok(model)
    }

    pub async fn rename(&self, id: i32, name: &str) -> Result<Option<playlist_categories::Model>> {
        let Some(model) = PlaylistCategories::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: playlist_categories::ActiveModel = model.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        use sea_orm::ActiveModelTrait;
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    /// Delete a category and its playlist associations.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        PlaylistCategory::delete_many()
            .filter(playlist_category::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let result = PlaylistCategories::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = PlaylistCategories::find().count(&self.conn).await?;
        Ok(count)
    }
}
