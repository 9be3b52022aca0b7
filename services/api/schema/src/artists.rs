use sea_orm::entity::prelude::*;

/// Artist or label profile that is not itself a login.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked account when the artist also has an independent login.
    pub ref_user_id: Option<i64>,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RefUserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
