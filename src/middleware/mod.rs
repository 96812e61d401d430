mod auth;

pub use auth::{require_auth, Claims, CurrentAdmin, BAD_TOKEN, NO_TOKEN};
