//! 课题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "theses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    pub area: String,
    pub status: String,
    pub author_id: i64,
    pub supervisor_id: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SupervisorId",
        to = "super::users::Column::Id"
    )]
    Supervisor,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_thesis(self) -> crate::models::theses::entities::Thesis {
        use crate::models::theses::entities::{Thesis, ThesisStatus};

        Thesis {
            id: self.id,
            title: self.title,
            summary: self.summary,
            area: self.area,
            status: self
                .status
                .parse::<ThesisStatus>()
                .unwrap_or(ThesisStatus::InProgress),
            author_id: self.author_id,
            supervisor_id: self.supervisor_id,
            created_at: super::from_millis(self.created_at),
            updated_at: self.updated_at.map(super::from_millis),
        }
    }
}
