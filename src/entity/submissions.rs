//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub thesis_id: i64,
    pub kind: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub file_ref: String,
    pub sent_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::theses::Entity",
        from = "Column::ThesisId",
        to = "super::theses::Column::Id"
    )]
    Thesis,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::theses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thesis.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionKind};

        Submission {
            id: self.id,
            thesis_id: self.thesis_id,
            kind: self
                .kind
                .parse::<SubmissionKind>()
                .unwrap_or(SubmissionKind::Partial),
            note: self.note,
            file_ref: self.file_ref,
            sent_at: super::from_millis(self.sent_at),
        }
    }
}
