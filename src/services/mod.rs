mod auth_service;
mod resource_service;

pub use auth_service::{hash_password, verify_password, AuthService};
pub use auth_service::{FIELDS_MISSING, INVALID_CREDENTIALS, NO_ACCOUNT};
pub use resource_service::ResourceService;
pub use resource_service::{
    COLLECTION_EMPTY, CREDENTIAL_FIELDS_MISSING, EMAIL_EXISTS, NO_SEARCH_RESULT,
    PASSWORD_TOO_SHORT, REQUIRED_FIELDS_MISSING,
};
