use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    LoaderTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::entities::{playlist_categories, playlist_category, playlists, prelude::*};

/// Search field selector for the global playlist search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistSearchField {
    Title,
    Description,
}

pub struct PlaylistRepository {
    conn: DatabaseConnection,
}

impl PlaylistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Playlists of one user within a category, newest first, with their
    /// categories loaded. An optional term filters on title or description.
    pub async fn list_for_category(
        &self,
        category_id: i32,
        user_id: i32,
        search: Option<&str>,
    ) -> Result<Vec<(playlists::Model, Vec<playlist_categories::Model>)>> {
        let mut query = Playlists::find()
            .filter(playlists::Column::UserId.eq(user_id))
            .join(JoinType::InnerJoin, playlists::Relation::PlaylistCategory.def())
            .filter(playlist_category::Column::CategoryId.eq(category_id))
            .order_by_desc(playlists::Column::CreatedAt);

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(playlists::Column::Title.contains(term))
                    .add(playlists::Column::Description.contains(term)),
            );
        }

        let rows = query.all(&self.conn).await?;
        let categories = rows
            .load_many_to_many(PlaylistCategories, PlaylistCategory, &self.conn)
            .await?;

        Ok(rows.into_iter().zip(categories).collect())
    }

    /// Global search across all of a user's playlists on a single field.
    pub async fn search(
        &self,
        user_id: i32,
        field: PlaylistSearchField,
        term: &str,
    ) -> Result<Vec<(playlists::Model, Vec<playlist_categories::Model>)>> {
        let filter = match field {
            PlaylistSearchField::Title => playlists::Column::Title.contains(term),
            PlaylistSearchField::Description => playlists::Column::Description.contains(term),
        };

        let rows = Playlists::find()
            .filter(playlists::Column::UserId.eq(user_id))
            .filter(filter)
            .order_by_desc(playlists::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        let categories = rows
            .load_many_to_many(PlaylistCategories, PlaylistCategory, &self.conn)
            .await?;

        Ok(rows.into_iter().zip(categories).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<playlists::Model>> {
        let playlist = Playlists::find_by_id(id).one(&self.conn).await?;
        Ok(playlist)
    }

    pub async fn get_with_categories(
        &self,
        id: i32,
    ) -> Result<Option<(playlists::Model, Vec<playlist_categories::Model>)>> {
        let Some(playlist) = Playlists::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let categories = vec![playlist.clone()]
            .load_many_to_many(PlaylistCategories, PlaylistCategory, &self.conn)
            .await?
            .pop()
            .unwrap_or_default();

        Ok(Some((playlist, categories)))
    }

    pub async fn url_taken(&self, url: &str, exclude_id: Option<i32>) -> Result<bool> {
        let mut query = Playlists::find().filter(playlists::Column::Url.eq(url));

        if let Some(id) = exclude_id {
            query = query.filter(playlists::Column::Id.ne(id));
        }

        Ok(query.one(&self.conn).await?.is_some())
    }

    /// Create a playlist and attach it to the given categories.
    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<playlists::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let inserted = Playlists::insert(playlists::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            description: Set(description.map(ToString::to_string)),
            url: Set(url.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        let playlist_id = inserted.last_insert_id;
        sync_categories(&txn, playlist_id, category_ids).await?;

        let model = Playlists::find_by_id(playlist_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created playlist"))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Update a playlist and replace its category associations.
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<Option<playlists::Model>> {
        let Some(model) = Playlists::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let txn = self.conn.begin().await?;

        let mut active: playlists::ActiveModel = model.into();
        active.title = Set(title.to_string());
        active.description = Set(description.map(ToString::to_string));
        active.url = Set(url.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&txn).await?;

        PlaylistCategory::delete_many()
            .filter(playlist_category::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;
        sync_categories(&txn, id, category_ids).await?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a playlist and its category associations.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        PlaylistCategory::delete_many()
            .filter(playlist_category::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;

        let result = Playlists::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = Playlists::find().count(&self.conn).await?;
        Ok(count)
    }
}

async fn sync_categories(
    txn: &sea_orm::DatabaseTransaction,
    playlist_id: i32,
    category_ids: &[i32],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<playlist_category::ActiveModel> = category_ids
        .iter()
        .map(|&category_id| playlist_category::ActiveModel {
            playlist_id: Set(playlist_id),
            category_id: Set(category_id),
        })
        .collect();

    PlaylistCategory::insert_many(rows).exec(txn).await?;
    Ok(())
}
