use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "channel_categories")]
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
    #[sea_orm(has_many = "super::channel_category::Entity")]
    ChannelCategory,
}

impl Related<super::channel_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChannelCategory.def()
    }
}

impl Related<super::channels::Entity> for Entity {
    fn to() -> RelationDef {
        super::channel_category::Relation::Channel.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::channel_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
