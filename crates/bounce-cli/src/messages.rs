//! User-facing messages for the API statuses commands care about.

use reqwest::StatusCode;

pub const UNAUTHORIZED: &str = "Invalid username or password";
pub const SIGNIN_ERROR: &str =
    "Oops! Something went wrong during sign-in. Please try again later.";
pub const NOT_SIGNED_IN: &str = "You are not signed in. Run `bounce login` first.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Run `bounce login` again.";
pub const INVALID_INFO: &str =
    "Please make sure your information meets the specified requirements.";
pub const USERNAME_OR_EMAIL_TAKEN: &str = "We're sorry, that username or email is already taken";
pub const CLUB_NAME_TAKEN: &str = "We're sorry, a club with that name already exists";
pub const FORBIDDEN: &str = "You don't have permission to do that";
pub const UNEXPECTED_ERROR: &str = "Oops! Something went wrong. Please try again later.";

/// What a command was doing, for picking the message of a failed status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SignIn,
    CreateAccount,
    EditAccount,
    CreateClub,
    EditClub,
    Lookup(&'static str),
    Membership,
}

/// Message for a non-2xx status, in the terms of the action that failed
pub fn describe_failure(action: Action, status: StatusCode) -> String {
    match (action, status.as_u16()) {
        (Action::SignIn, 401) => UNAUTHORIZED.to_string(),
        (Action::SignIn, _) => SIGNIN_ERROR.to_string(),
        (_, 401) => SESSION_EXPIRED.to_string(),
        (_, 403) => FORBIDDEN.to_string(),
        (Action::CreateAccount | Action::EditAccount, 400) => INVALID_INFO.to_string(),
        (Action::CreateAccount | Action::EditAccount, 409) => USERNAME_OR_EMAIL_TAKEN.to_string(),
        (Action::CreateClub | Action::EditClub, 400) => INVALID_INFO.to_string(),
        (Action::CreateClub | Action::EditClub, 409) => CLUB_NAME_TAKEN.to_string(),
        (Action::EditClub, 404) => "No such club".to_string(),
        (Action::Lookup(what), 404) => format!("No such {}", what),
        (Action::Membership, 404) => "No such membership".to_string(),
        (Action::Membership, 400) => "No such club or user".to_string(),
        _ => format!("{} (status {})", UNEXPECTED_ERROR, status.as_u16()),
    }
}
