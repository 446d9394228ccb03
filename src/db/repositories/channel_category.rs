use std::collections::HashMap;

use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entities::{channel_categories, channel_category, prelude::*};

pub struct ChannelCategoryRepository {
    conn: DatabaseConnection,
}

impl ChannelCategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List categories ordered by name, each with its channel count.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<(channel_categories::Model, i64)>> {
        let mut query = ChannelCategories::find().order_by_asc(channel_categories::Column::Name);

        if let Some(term) = search {
            query = query.filter(channel_categories::Column::Name.contains(term));
        }

        let categories = query.all(&self.conn).await?;

        let counts: Vec<(i32, i64)> = ChannelCategory::find()
            .select_only()
            .column(channel_category::Column::CategoryId)
            .column_as(channel_category::Column::ChannelId.count(), "count")
            .group_by(channel_category::Column::CategoryId)
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

    pub async fn get(&self, id: i32) -> Result<Option<channel_categories::Model>> {
        let category = ChannelCategories::find_by_id(id).one(&self.conn).await?;
        Ok(category)
    }

    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query = ChannelCategories::find().filter(channel_categories::Column::Name.eq(name));

        if let Some(id) = exclude_id {
            query = query.filter(channel_categories::Column::Id.ne(id));
        }

        Ok(query.one(&self.conn).await?.is_some())
    }

    pub async fn create(&self, name: &str) -> Result<channel_categories::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = ChannelCategories::insert(channel_categories::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = ChannelCategories::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created channel category"))?;

        Ok(model)
    }

    pub async fn rename(&self, id: i32, name: &str) -> Result<Option<channel_categories::Model>> {
        let Some(model) = ChannelCategories::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: channel_categories::ActiveModel = model.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        use sea_orm::ActiveModelTrait;
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    /// Delete a category and its channel associations.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        ChannelCategory::delete_many()
            .filter(channel_category::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let result = ChannelCategories::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = ChannelCategories::find().count(&self.conn).await?;
        Ok(count)
    }
}
