//! 权限判定
//!
//! 纯函数：只看操作者、实体当前状态和动作，不访问存储。
//! 每个判定都对角色做完整的 `match`，新增角色时编译器会提示补全。

use crate::errors::{HWSystemError, Result};
use crate::models::evaluations::entities::Evaluation;
use crate::models::theses::entities::{Thesis, ThesisStatus};
use crate::models::users::entities::{User, UserRole};

/// 课题相关动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThesisAction {
    View,
    ChangeStatus,
    UpdateFields,
    Delete,
}

/// 提交相关动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    Create,
    View,
    /// 删除时需要知道提交已有的评审数量
    Delete { evaluation_count: u64 },
}

/// 评审相关动作
#[derive(Debug, Clone, Copy)]
pub enum EvaluationAction<'a> {
    Create { thesis: &'a Thesis },
    View { thesis: &'a Thesis },
    /// 修改或删除已有评审
    Modify { evaluation: &'a Evaluation },
}

/// 课题参与者（协调员、作者或指导教师）
fn is_participant(actor: &User, thesis: &Thesis) -> bool {
    match actor.role {
        UserRole::Coordinator => true,
        UserRole::Student => thesis.is_author(actor.id),
        UserRole::Advisor => thesis.is_supervisor(actor.id),
    }
}

fn not_participant(actor: &User, thesis: &Thesis) -> HWSystemError {
    HWSystemError::forbidden(format!(
        "用户 {} 无权访问课题 {}",
        actor.id, thesis.id
    ))
}

pub fn thesis_policy(actor: &User, thesis: &Thesis, action: ThesisAction) -> Result<()> {
    match action {
        ThesisAction::View => {
            if is_participant(actor, thesis) {
                Ok(())
            } else {
                Err(not_participant(actor, thesis))
            }
        }
        ThesisAction::ChangeStatus => match actor.role {
            UserRole::Coordinator => Ok(()),
            UserRole::Advisor if thesis.is_supervisor(actor.id) => Ok(()),
            UserRole::Advisor => Err(HWSystemError::forbidden("只有指导教师可以变更课题状态")),
            UserRole::Student => Err(HWSystemError::forbidden("学生不能变更课题状态")),
        },
        ThesisAction::UpdateFields => match actor.role {
            UserRole::Student => {
                if !thesis.is_author(actor.id) {
                    return Err(HWSystemError::forbidden("只能修改自己的课题"));
                }
                if thesis.status.is_closed() {
                    return Err(HWSystemError::invalid_state(format!(
                        "课题已处于 {} 状态，不能再修改",
                        thesis.status
                    )));
                }
                Ok(())
            }
            // 指导教师不校验是否为本课题导师
            UserRole::Advisor | UserRole::Coordinator => Ok(()),
        },
        ThesisAction::Delete => match actor.role {
            UserRole::Coordinator => Ok(()),
            UserRole::Student => {
                if !thesis.is_author(actor.id) {
                    return Err(HWSystemError::forbidden("只能删除自己的课题"));
                }
                if thesis.status != ThesisStatus::InProgress {
                    return Err(HWSystemError::invalid_state(format!(
                        "只能删除进行中的课题，当前状态为 {}",
                        thesis.status
                    )));
                }
                Ok(())
            }
            UserRole::Advisor => Err(HWSystemError::forbidden("指导教师不能删除课题")),
        },
    }
}

pub fn submission_policy(actor: &User, thesis: &Thesis, action: SubmissionAction) -> Result<()> {
    match action {
        SubmissionAction::Create => {
            match actor.role {
                UserRole::Student if !thesis.is_author(actor.id) => {
                    return Err(HWSystemError::forbidden("只能为自己的课题提交材料"));
                }
                UserRole::Student | UserRole::Advisor | UserRole::Coordinator => {}
            }
            // 只有已提出的课题接受提交
            match thesis.status {
                ThesisStatus::Proposed => Ok(()),
                ThesisStatus::InProgress | ThesisStatus::Concluded | ThesisStatus::Rejected => {
                    Err(HWSystemError::invalid_state(format!(
                        "课题处于 {} 状态，不接受提交",
                        thesis.status
                    )))
                }
            }
        }
        SubmissionAction::View => {
            if is_participant(actor, thesis) {
                Ok(())
            } else {
                Err(not_participant(actor, thesis))
            }
        }
        SubmissionAction::Delete { evaluation_count } => match actor.role {
            UserRole::Coordinator => Ok(()),
            UserRole::Student => {
                if !thesis.is_author(actor.id) {
                    return Err(HWSystemError::forbidden("只能删除自己的提交"));
                }
                if evaluation_count > 0 {
                    return Err(HWSystemError::conflict("提交已有评审，不能删除"));
                }
                Ok(())
            }
            UserRole::Advisor => Err(HWSystemError::forbidden("指导教师不能删除提交")),
        },
    }
}

pub fn evaluation_policy(actor: &User, action: EvaluationAction<'_>) -> Result<()> {
    match action {
        EvaluationAction::Create { thesis } => match actor.role {
            UserRole::Coordinator => Ok(()),
            UserRole::Advisor if thesis.is_supervisor(actor.id) => Ok(()),
            UserRole::Advisor => Err(HWSystemError::forbidden("只有本课题的指导教师可以评审")),
            UserRole::Student => Err(HWSystemError::forbidden("学生不能评审")),
        },
        EvaluationAction::View { thesis } => {
            if is_participant(actor, thesis) {
                Ok(())
            } else {
                Err(not_participant(actor, thesis))
            }
        }
        EvaluationAction::Modify { evaluation } => match actor.role {
            UserRole::Coordinator => Ok(()),
            UserRole::Advisor if evaluation.grader_id == actor.id => Ok(()),
            UserRole::Advisor => Err(HWSystemError::forbidden("只能修改自己的评审")),
            UserRole::Student => Err(HWSystemError::forbidden("学生不能修改评审")),
        },
    }
}
