use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(unique)]
    pub url: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::channel_category::Entity")]
    ChannelCategory,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::channel_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChannelCategory.def()
    }
}

impl Related<super::channel_categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::channel_category::Relation::Category.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::channel_category::Relation::Channel.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
