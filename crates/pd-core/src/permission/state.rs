use serde::{Deserialize, Serialize};

use super::{required_capabilities, PermissionCapability};

/// Grant status per capability for one setup session.
///
/// Flags only ever move from `false` to `true`; there is no revoke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    camera: bool,
    microphone: bool,
    screen: bool,
    location: bool,
}

impl PermissionState {
    pub fn is_granted(&self, capability: PermissionCapability) -> bool {
        match capability {
            PermissionCapability::Camera => self.camera,
            PermissionCapability::Microphone => self.microphone,
            PermissionCapability::Screen => self.screen,
            PermissionCapability::Location => self.location,
        }
    }

    pub fn grant(&mut self, capability: PermissionCapability) {
        let flag = match capability {
            PermissionCapability::Camera => &mut self.camera,
            PermissionCapability::Microphone => &mut self.microphone,
            PermissionCapability::Screen => &mut self.screen,
            PermissionCapability::Location => &mut self.location,
        };
        *flag = true;
    }

    /// True when every required catalog capability is granted.
    pub fn all_required_granted(&self) -> bool {
        required_capabilities().all(|capability| self.is_granted(capability))
    }

    pub fn granted(&self) -> impl Iterator<Item = PermissionCapability> + '_ {
        PermissionCapability::ALL
            .into_iter()
            .filter(|capability| self.is_granted(*capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_grants_nothing() {
        let state = PermissionState::default();
        assert!(PermissionCapability::ALL
            .iter()
            .all(|capability| !state.is_granted(*capability)));
        assert!(!state.all_required_granted());
    }

    #[test]
    fn all_required_granted_needs_all_four() {
        let mut state = PermissionState::default();
        state.grant(PermissionCapability::Camera);
        state.grant(PermissionCapability::Microphone);
        state.grant(PermissionCapability::Screen);
        assert!(!state.all_required_granted());

        state.grant(PermissionCapability::Location);
        assert!(state.all_required_granted());
    }

    #[test]
    fn grant_is_idempotent() {
        let mut state = PermissionState::default();
        state.grant(PermissionCapability::Screen);
        state.grant(PermissionCapability::Screen);
        assert_eq!(
            state.granted().collect::<Vec<_>>(),
            vec![PermissionCapability::Screen]
        );
    }

    #[test]
    fn serializes_as_capability_map() {
        let mut state = PermissionState::default();
        state.grant(PermissionCapability::Camera);
        let value = serde_json::to_value(state).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "camera": true,
                "microphone": false,
                "screen": false,
                "location": false
            })
        );
    }
}
