//! Permission step catalog.
//!
//! The ordered list of capabilities a proctor grants before reaching the
//! dashboard. Order determines acquisition order.

use serde::Serialize;

use super::PermissionCapability;

/// One step of the permission setup flow.
///
/// 权限设置流程中的一步。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupStep {
    pub title: &'static str,
    pub description: &'static str,
    pub capability: PermissionCapability,
    pub required: bool,
}

pub static SETUP_STEPS: [SetupStep; 4] = [
    SetupStep {
        title: "Camera Access",
        description: "Your camera is used to monitor candidates during the exam session.",
        capability: PermissionCapability::Camera,
        required: true,
    },
    SetupStep {
        title: "Microphone Access",
        description: "Your microphone is used to communicate with candidates and capture room audio.",
        capability: PermissionCapability::Microphone,
        required: true,
    },
    SetupStep {
        title: "Screen Sharing",
        description: "Screen sharing lets the platform record the proctoring session.",
        capability: PermissionCapability::Screen,
        required: true,
    },
    SetupStep {
        title: "Location Access",
        description: "Your location is recorded to verify where the exam is being supervised.",
        capability: PermissionCapability::Location,
        required: true,
    },
];

/// Step at a 1-based index, `None` when out of range.
pub fn step_at(index: usize) -> Option<&'static SetupStep> {
    index.checked_sub(1).and_then(|i| SETUP_STEPS.get(i))
}

pub fn step_count() -> usize {
    SETUP_STEPS.len()
}

pub fn required_capabilities() -> impl Iterator<Item = PermissionCapability> {
    SETUP_STEPS
        .iter()
        .filter(|step| step.required)
        .map(|step| step.capability)
}
