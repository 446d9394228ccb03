use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "playlist_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::playlist_category::Entity")]
    PlaylistCategory,
}

impl Related<super::playlist_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaylistCategory.def()
    }
}

impl Related<super::playlists::Entity> for Entity {
    fn to() -> RelationDef {
        super::playlist_category::Relation::Playlist.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::playlist_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
