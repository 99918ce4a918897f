//! # Use Cases Accessor
//!
//! `AppRuntime` owns the wired use cases and host adapters. Commands call
//! `runtime.usecases().xxx()` to reach a use case.

use std::sync::Arc;

use pd_app::{AuthenticateUser, CurrentSession, SetupOrchestrator};
use pd_core::config::AppConfig;

use crate::adapters::{BroadcastSetupEventEmitter, HeadlessNavigation};

/// Host adapters the runtime exposes to its shell.
pub struct HostDeps {
    pub events: Arc<BroadcastSetupEventEmitter>,
    pub navigation: Arc<HeadlessNavigation>,
}

pub(crate) struct UseCaseSet {
    pub(crate) setup_orchestrator: Arc<SetupOrchestrator>,
    pub(crate) authenticate_user: Arc<AuthenticateUser>,
    pub(crate) current_session: Arc<CurrentSession>,
}

/// Application runtime with dependencies.
///
/// 应用运行时：持有所有依赖与用例。
pub struct AppRuntime {
    config: AppConfig,
    deps: HostDeps,
    usecases: UseCaseSet,
}

impl AppRuntime {
    pub(crate) fn new(config: AppConfig, deps: HostDeps, usecases: UseCaseSet) -> Self {
        Self {
            config,
            deps,
            usecases,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn deps(&self) -> &HostDeps {
        &self.deps
    }

    pub fn usecases(&self) -> UseCases<'_> {
        UseCases { runtime: self }
    }
}

/// Use cases accessor.
pub struct UseCases<'a> {
    runtime: &'a AppRuntime,
}

impl<'a> UseCases<'a> {
    pub fn setup_orchestrator(&self) -> Arc<SetupOrchestrator> {
        self.runtime.usecases.setup_orchestrator.clone()
    }

    pub fn authenticate_user(&self) -> Arc<AuthenticateUser> {
        self.runtime.usecases.authenticate_user.clone()
    }

    pub fn current_session(&self) -> Arc<CurrentSession> {
        self.runtime.usecases.current_session.clone()
    }
}
