use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    LoaderTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::entities::{channel_categories, channel_category, channels, prelude::*};

pub struct ChannelRepository {
    conn: DatabaseConnection,
}

impl ChannelRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Channels of one user within a category, newest first, with their
    /// categories loaded. An optional term filters on name or description.
    pub async fn list_for_category(
        &self,
        category_id: i32,
        user_id: i32,
        search: Option<&str>,
    ) -> Result<Vec<(channels::Model, Vec<channel_categories::Model>)>> {
        let mut query = Channels::find()
            .filter(channels::Column::UserId.eq(user_id))
            .join(JoinType::InnerJoin, channels::Relation::ChannelCategory.def())
            .filter(channel_category::Column::CategoryId.eq(category_id))
            .order_by_desc(channels::Column::CreatedAt);

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(channels::Column::Name.contains(term))
                    .add(channels::Column::Description.contains(term)),
            );
        }

        let rows = query.all(&self.conn).await?;
        let categories = rows
            .load_many_to_many(ChannelCategories, ChannelCategory, &self.conn)
            .await?;

        Ok(rows.into_iter().zip(categories).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<channels::Model>> {
        let channel = Channels::find_by_id(id).one(&self.conn).await?;
        Ok(channel)
    }

    pub async fn get_with_categories(
        &self,
        id: i32,
    ) -> Result<Option<(channels::Model, Vec<channel_categories::Model>)>> {
        let Some(channel) = Channels::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let categories = vec![channel.clone()]
            .load_many_to_many(ChannelCategories, ChannelCategory, &self.conn)
            .await?
            .pop()
            .unwrap_or_default();

        Ok(Some((channel, categories)))
    }

    pub async fn url_taken(&self, url: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query = Channels::find().filter(channels::Column::Url.eq(url));

        if let Some(id) = exclude_id {
            query = query.filter(channels::Column::Id.ne(id));
        }

        Ok(query.one(&self.conn).await?.is_some())
    }

    /// Create a channel and attach it to the given categories.
    pub async fn create(
        &self,
        user_id: i32,
        name: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<channels::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let inserted = Channels::insert(channels::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            description: Set(description.map(ToString::to_string)),
            url: Set(url.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        let channel_id = inserted.last_insert_id;
        sync_categories(&txn, channel_id, category_ids).await?;

        let model = Channels::find_by_id(channel_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created channel"))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Update a channel and replace its category associations.
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<Option<channels::Model>> {
        let Some(model) = Channels::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let txn = self.conn.begin().await?;

        let mut active: channels::ActiveModel = model.into();
        active.name = Set(name.to_string());
        active.description = Set(description.map(ToString::to_string));
        active.url = Set(url.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&txn).await?;

        ChannelCategory::delete_many()
            .filter(channel_category::Column::ChannelId.eq(id))
            .exec(&txn)
            .await?;
        sync_categories(&txn, id, category_ids).await?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a channel and its category associations.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        ChannelCategory::delete_many()
            .filter(channel_category::Column::ChannelId.eq(id))
            .exec(&txn)
            .await?;

        let result = Channels::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = Channels::find().count(&self.conn).await?;
        Ok(count)
    }
}

async fn sync_categories(
    txn: &sea_orm::DatabaseTransaction,
    channel_id: i32,
    category_ids: &[i32],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<channel_category::ActiveModel> = category_ids
        .iter()
        .map(|&category_id| channel_category::ActiveModel {
            channel_id: Set(channel_id),
            category_id: Set(category_id),
        })
        .collect();

    ChannelCategory::insert_many(rows).exec(txn).await?;
    Ok(())
}
