use serde::Serialize;

use crate::auth::UserRecord;
use crate::permission::{step_at, step_count, PermissionError, PermissionState, SetupStep};

/// One proctor's walk through the permission catalog.
///
/// `current_step_index` is 1-based; 0 means not started. It may reach
/// `step_count() + 1` once the last step's advance has elapsed.
///
/// 权限设置会话。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SetupSession {
    pub(crate) current_step_index: usize,
    pub(crate) permissions: PermissionState,
    pub(crate) pending_user: Option<UserRecord>,
    pub(crate) last_error: Option<PermissionError>,
    pub(crate) advance_pending: bool,
}

impl SetupSession {
    pub fn not_started() -> Self {
        Self::default()
    }

    pub(crate) fn started(user: UserRecord) -> Self {
        Self {
            current_step_index: 1,
            permissions: PermissionState::default(),
            pending_user: Some(user),
            last_error: None,
            advance_pending: false,
        }
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn permissions(&self) -> &PermissionState {
        &self.permissions
    }

    pub fn pending_user(&self) -> Option<&UserRecord> {
        self.pending_user.as_ref()
    }

    pub fn last_error(&self) -> Option<&PermissionError> {
        self.last_error.as_ref()
    }

    /// A granted step is waiting for its paced advance.
    pub fn advance_pending(&self) -> bool {
        self.advance_pending
    }

    pub fn is_started(&self) -> bool {
        self.current_step_index > 0
    }

    /// All required permissions granted, whatever the step index says.
    pub fn is_complete(&self) -> bool {
        self.permissions.all_required_granted()
    }

    /// The step awaiting a grant; `None` when not started or complete.
    pub fn current_step(&self) -> Option<&'static SetupStep> {
        if !self.is_started() || self.is_complete() {
            return None;
        }
        step_at(self.current_step_index)
    }

    pub fn view(&self) -> SetupView {
        if self.is_complete() {
            return SetupView::Complete {
                permissions: self.permissions,
            };
        }
        match self.current_step() {
            Some(step) => SetupView::AwaitingStep {
                index: self.current_step_index,
                total: step_count(),
                step: step.clone(),
                permissions: self.permissions,
                error: self.last_error.clone(),
                advancing: self.advance_pending,
            },
            None => SetupView::NotStarted,
        }
    }
}

/// What the setup screen renders.
///
/// 设置页面展示状态。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SetupView {
    NotStarted,
    AwaitingStep {
        index: usize,
        total: usize,
        step: SetupStep,
        permissions: PermissionState,
        error: Option<PermissionError>,
        advancing: bool,
    },
    Complete {
        permissions: PermissionState,
    },
}

impl SetupView {
    pub fn is_complete(&self) -> bool {
        matches!(self, SetupView::Complete { .. })
    }
}
