use crate::dto::auth_dto::AuthResponse;
use crate::models::user::Role;

/// Credentials of a logged-in dashboard user.
///
/// Built from the server's signup or login response and passed explicitly to
/// every authenticated call. Path ids are taken from here, so a session can
/// only address its own account.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub role: Role,
    pub name: String,
}

impl Session {
    pub fn is_hr(&self) -> bool {
        self.role == Role::Hr
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user_id: response.user.id,
            role: response.user.role,
            name: response.user.name,
        }
    }
}

/// Ends a session. The token is stateless on the server, so this only drops
/// the local credentials.
pub fn logout(session: Session) {
    tracing::debug!(user_id = session.user_id, "Session closed");
}
