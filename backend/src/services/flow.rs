//! Per-session flow state machine.
//!
//! A `FlowState` is an immutable value held in the session slot; every
//! transition returns a replacement state instead of mutating in place.
//! Handlers perform the side effects (register, issue, verify) and then ask
//! the state for the legal successor, so sequencing violations surface as
//! errors rather than skipped steps.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Showing the login / signup choice.
    #[default]
    LoggedOut,
    /// User asked for a password reset and must submit an identifier.
    ResetInitiate,
    /// An OTP was dispatched (or pretended to be, for unknown identifiers).
    /// `email` is populated only when the identifier resolved to an account.
    ResetVerify { email: Option<String> },
    /// Password was changed; waiting for the user to acknowledge.
    ResetSuccess,
    LoggedIn { user_id: Uuid },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Already logged in")]
    AlreadyLoggedIn,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("No password reset in progress")]
    NoResetInProgress,
    #[error("Reset flow is not at this step")]
    WrongResetStage,
}

impl FlowState {
    /// LoggedOut -> LoggedIn, used by both login and signup-with-auto-login.
    pub fn log_in(&self, user_id: Uuid) -> Result<FlowState, FlowError> {
        match self {
            FlowState::LoggedOut => Ok(FlowState::LoggedIn { user_id }),
            FlowState::LoggedIn { .. } => Err(FlowError::AlreadyLoggedIn),
            _ => Err(FlowError::WrongResetStage),
        }
    }

    /// Any state -> LoggedOut. Logout must purge all transient fields, which
    /// replacing the whole value does atomically.
    pub fn log_out(&self) -> FlowState {
        FlowState::LoggedOut
    }

    /// LoggedOut -> ResetInitiate ("forgot password").
    pub fn begin_reset(&self) -> Result<FlowState, FlowError> {
        match self {
            FlowState::LoggedOut => Ok(FlowState::ResetInitiate),
            FlowState::LoggedIn { .. } => Err(FlowError::AlreadyLoggedIn),
            _ => Err(FlowError::WrongResetStage),
        }
    }

    /// ResetInitiate -> ResetVerify. Advances whether or not the identifier
    /// resolved, so the response cannot reveal account existence; `email` is
    /// Some only when an OTP was really issued.
    pub fn otp_dispatched(&self, email: Option<String>) -> Result<FlowState, FlowError> {
        match self {
            FlowState::ResetInitiate => Ok(FlowState::ResetVerify { email }),
            FlowState::LoggedOut => Err(FlowError::NoResetInProgress),
            _ => Err(FlowError::WrongResetStage),
        }
    }

    /// ResetVerify -> ResetSuccess, after the OTP verified and the password
    /// was updated. Drops `reset_email`, which must not outlive the verify
    /// stage.
    pub fn complete_reset(&self) -> Result<FlowState, FlowError> {
        match self {
            FlowState::ResetVerify { .. } => Ok(FlowState::ResetSuccess),
            FlowState::LoggedOut => Err(FlowError::NoResetInProgress),
            _ => Err(FlowError::WrongResetStage),
        }
    }

    /// ResetSuccess -> LoggedOut (user acknowledged the confirmation).
    pub fn acknowledge_reset(&self) -> Result<FlowState, FlowError> {
        match self {
            FlowState::ResetSuccess => Ok(FlowState::LoggedOut),
            FlowState::LoggedOut => Err(FlowError::NoResetInProgress),
            _ => Err(FlowError::WrongResetStage),
        }
    }

    /// Abandons an in-progress reset from any of its stages ("back to
    /// login"), clearing the transient email.
    pub fn cancel_reset(&self) -> Result<FlowState, FlowError> {
        match self {
            FlowState::ResetInitiate
            | FlowState::ResetVerify { .. }
            | FlowState::ResetSuccess => Ok(FlowState::LoggedOut),
            FlowState::LoggedOut => Err(FlowError::NoResetInProgress),
            FlowState::LoggedIn { .. } => Err(FlowError::AlreadyLoggedIn),
        }
    }

    /// The email captured at the initiate step, present only during verify.
    pub fn reset_email(&self) -> Option<&str> {
        match self {
            FlowState::ResetVerify { email } => email.as_deref(),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            FlowState::LoggedIn { user_id } => Some(*user_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn login_only_from_logged_out() {
        let id = uid();
        assert_eq!(
            FlowState::LoggedOut.log_in(id),
            Ok(FlowState::LoggedIn { user_id: id })
        );
        assert_eq!(
            FlowState::LoggedIn { user_id: id }.log_in(id),
            Err(FlowError::AlreadyLoggedIn)
        );
        assert_eq!(
            FlowState::ResetInitiate.log_in(id),
            Err(FlowError::WrongResetStage)
        );
    }

    #[test]
    fn full_reset_walkthrough() {
        let state = FlowState::LoggedOut;
        let state = state.begin_reset().unwrap();
        assert_eq!(state, FlowState::ResetInitiate);

        let state = state
            .otp_dispatched(Some("jane.doe22@students.dkut.ac.ke".into()))
            .unwrap();
        assert_eq!(state.reset_email(), Some("jane.doe22@students.dkut.ac.ke"));

        let state = state.complete_reset().unwrap();
        assert_eq!(state, FlowState::ResetSuccess);
        assert_eq!(state.reset_email(), None);

        let state = state.acknowledge_reset().unwrap();
        assert_eq!(state, FlowState::LoggedOut);
    }

    #[test]
    fn unresolved_identifier_still_reaches_verify() {
        let state = FlowState::ResetInitiate.otp_dispatched(None).unwrap();
        assert_eq!(state, FlowState::ResetVerify { email: None });
        assert_eq!(state.reset_email(), None);
    }

    #[test]
    fn verify_stage_cannot_be_skipped() {
        assert_eq!(
            FlowState::ResetInitiate.complete_reset(),
            Err(FlowError::WrongResetStage)
        );
        assert_eq!(
            FlowState::LoggedOut.complete_reset(),
            Err(FlowError::NoResetInProgress)
        );
        assert_eq!(
            FlowState::LoggedOut.otp_dispatched(None),
            Err(FlowError::NoResetInProgress)
        );
    }

    #[test]
    fn cancel_clears_reset_email() {
        let state = FlowState::ResetVerify {
            email: Some("jane.doe22@students.dkut.ac.ke".into()),
        };
        let state = state.cancel_reset().unwrap();
        assert_eq!(state, FlowState::LoggedOut);
        assert_eq!(state.reset_email(), None);
    }

    #[test]
    fn logout_resets_everything() {
        let id = uid();
        assert_eq!(FlowState::LoggedIn { user_id: id }.log_out(), FlowState::LoggedOut);
        assert_eq!(
            FlowState::ResetVerify { email: None }.log_out(),
            FlowState::LoggedOut
        );
    }
}
