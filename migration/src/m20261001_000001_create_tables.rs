use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课题表
        manager
            .create_table(
                Table::create()
                    .table(Theses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Theses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Theses::Title).string().not_null())
                    .col(ColumnDef::new(Theses::Summary).text().not_null())
                    .col(ColumnDef::new(Theses::Area).string().not_null())
                    .col(ColumnDef::new(Theses::Status).string().not_null())
                    .col(ColumnDef::new(Theses::AuthorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Theses::SupervisorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Theses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Theses::UpdatedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Theses::Table, Theses::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Theses::Table, Theses::SupervisorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::ThesisId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Kind).string().not_null())
                    .col(ColumnDef::new(Submissions::Note).text().null())
                    .col(ColumnDef::new(Submissions::FileRef).string().not_null())
                    .col(ColumnDef::new(Submissions::SentAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::ThesisId)
                            .to(Theses::Table, Theses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评审表
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::GraderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Score).double().not_null())
                    .col(ColumnDef::new(Evaluations::Comment).text().null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::GraderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_theses_author_status")
                    .table(Theses::Table)
                    .col(Theses::AuthorId)
                    .col(Theses::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_theses_supervisor_status")
                    .table(Theses::Table)
                    .col(Theses::SupervisorId)
                    .col(Theses::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_thesis_sent_at")
                    .table(Submissions::Table)
                    .col(Submissions::ThesisId)
                    .col(Submissions::SentAt)
                    .to_owned(),
            )
            .await?;

        // 同一评审人对同一提交只能有一条评审
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluations_submission_grader")
                    .table(Evaluations::Table)
                    .col(Evaluations::SubmissionId)
                    .col(Evaluations::GraderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_grader")
                    .table(Evaluations::Table)
                    .col(Evaluations::GraderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Theses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Theses {
    #[sea_orm(iden = "theses")]
    Table,
    Id,
    Title,
    Summary,
    Area,
    Status,
    AuthorId,
    SupervisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    ThesisId,
    Kind,
    Note,
    FileRef,
    SentAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    SubmissionId,
    GraderId,
    Score,
    Comment,
    EvaluatedAt,
}
