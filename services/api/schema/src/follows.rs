use sea_orm::entity::prelude::*;

/// One follow edge. The composite primary key makes duplicate edges impossible.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fan_id: i64,
    /// `"user"` or `"artist"`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub target_kind: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub target_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FanId",
        to = "super::users::Column::Id"
    )]
    Fan,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
