//! Setup state machine.
//!
//! Defines a pure state transition function for the permission setup flow.

use serde::{Deserialize, Serialize};

use crate::auth::UserRecord;
use crate::permission::{PermissionCapability, PermissionError};
use crate::setup::SetupSession;

/// Events that drive the setup flow.
///
/// 驱动设置流程的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetupEvent {
    /// Authentication returned a user.
    ///
    /// 登录/注册成功。
    Start { user: UserRecord },
    /// The current step's capability was acquired.
    ///
    /// 当前步骤授权成功。
    GrantSucceeded { capability: PermissionCapability },
    /// Acquisition for the current step failed.
    ///
    /// 当前步骤授权失败。
    GrantFailed {
        capability: PermissionCapability,
        error: PermissionError,
    },
    /// The pacing delay scheduled after a grant of step `from_index` elapsed.
    ///
    /// 步骤推进延时结束。
    AdvanceElapsed { from_index: usize },
    /// User confirms "Enter Dashboard".
    ///
    /// 用户确认进入控制台。
    EnterDashboard,
    /// User abandons setup.
    ///
    /// 用户放弃设置。
    Cancel,
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetupAction {
    /// Feed `AdvanceElapsed { from_index }` back after the pacing delay.
    ///
    /// 延时后推进到下一步。
    ScheduleAdvance { from_index: usize },
    /// Drop any scheduled advance.
    ///
    /// 取消已计划的推进。
    CancelPendingAdvance,
    /// Stop and release every acquired resource.
    ///
    /// 释放所有已获取的资源。
    ReleaseResources,
    /// Persist the user and hand over to the authenticated application.
    ///
    /// 持久化用户并进入应用。
    FinalizeSession { user: UserRecord },
}

/// Pure setup state machine.
///
/// 纯状态机：不包含副作用。
pub struct SetupStateMachine;

impl SetupStateMachine {
    pub fn transition(
        session: SetupSession,
        event: SetupEvent,
    ) -> (SetupSession, Vec<SetupAction>) {
        match event {
            SetupEvent::Start { user } => {
                if !user.is_proctor() {
                    return (session, Vec::new());
                }
                let actions = if session.is_started() {
                    vec![
                        SetupAction::CancelPendingAdvance,
                        SetupAction::ReleaseResources,
                    ]
                } else {
                    Vec::new()
                };
                (SetupSession::started(user), actions)
            }
            SetupEvent::GrantSucceeded { capability } if accepts_grant(&session, capability) => {
                let from_index = session.current_step_index;
                let mut next = session;
                next.permissions.grant(capability);
                next.last_error = None;
                next.advance_pending = true;
                (next, vec![SetupAction::ScheduleAdvance { from_index }])
            }
            SetupEvent::GrantFailed { capability, error } if accepts_grant(&session, capability) => {
                let mut next = session;
                next.last_error = Some(error);
                (next, Vec::new())
            }
            SetupEvent::AdvanceElapsed { from_index }
                if session.advance_pending && session.current_step_index == from_index =>
            {
                let mut next = session;
                next.current_step_index += 1;
                next.advance_pending = false;
                (next, Vec::new())
            }
            SetupEvent::EnterDashboard if session.is_complete() => {
                match session.pending_user.clone() {
                    Some(user) => (
                        SetupSession::not_started(),
                        vec![
                            SetupAction::CancelPendingAdvance,
                            SetupAction::FinalizeSession { user },
                        ],
                    ),
                    None => (session, Vec::new()),
                }
            }
            SetupEvent::Cancel if session.is_started() => (
                SetupSession::not_started(),
                vec![
                    SetupAction::CancelPendingAdvance,
                    SetupAction::ReleaseResources,
                ],
            ),
            _ => (session, Vec::new()),
        }
    }
}

/// The session is waiting on exactly this capability.
fn accepts_grant(session: &SetupSession, capability: PermissionCapability) -> bool {
    !session.advance_pending
        && session
            .current_step()
            .is_some_and(|step| step.capability == capability)
}
