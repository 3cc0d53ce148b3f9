//! 预导入模块，方便使用

pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::theses::{ActiveModel as ThesisActiveModel, Entity as Theses, Model as ThesisModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
