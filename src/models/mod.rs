mod admin;
mod envelope;
pub mod schema;

pub use admin::{Admin, AdminProfile};
pub use envelope::{Envelope, Pagination, Reply};
pub use schema::{FieldDefault, ResourceSchema};
