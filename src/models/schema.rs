use serde_json::{Map, Value};

/// Default applied when a field is omitted at creation. An explicitly
/// supplied falsy value (false, "", 0) is kept as given.
#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    Bool(bool),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Bool(b) => Value::Bool(b),
            FieldDefault::Text(s) => Value::String(s.to_string()),
        }
    }
}

/// Declarative per-entity field rules consumed by the generic resource
/// service. One validator for all four entities instead of four copies.
#[derive(Debug)]
pub struct ResourceSchema {
    pub collection: &'static str,
    pub required: &'static [&'static str],
    pub defaults: &'static [(&'static str, FieldDefault)],
    /// Fields normalized to trimmed lowercase before persistence.
    pub email_fields: &'static [&'static str],
    /// Fields searched when the request does not name any.
    pub search_fields: &'static [&'static str],
    /// Admin only: unique email, hashed min-8 password, password stripped
    /// from every response payload.
    pub has_credentials: bool,
}

pub static ADMIN: ResourceSchema = ResourceSchema {
    collection: "admin",
    required: &["email", "password", "name", "surname"],
    defaults: &[
        ("enabled", FieldDefault::Bool(true)),
        ("removed", FieldDefault::Bool(false)),
    ],
    email_fields: &["email"],
    search_fields: &["email", "name", "surname"],
    has_credentials: true,
};

pub static CLIENT: ResourceSchema = ResourceSchema {
    collection: "client",
    required: &["company", "name", "surname", "phone"],
    defaults: &[],
    email_fields: &["email"],
    search_fields: &["company", "name", "surname"],
    has_credentials: false,
};

pub static LEAD: ResourceSchema = ResourceSchema {
    collection: "lead",
    required: &["date", "client", "phone", "email"],
    defaults: &[("status", FieldDefault::Text("pending"))],
    email_fields: &["email"],
    search_fields: &["client", "email"],
    has_credentials: false,
};

pub static PRODUCT: ResourceSchema = ResourceSchema {
    collection: "product",
    required: &["productName"],
    defaults: &[
        ("status", FieldDefault::Text("available")),
        ("enabled", FieldDefault::Bool(true)),
    ],
    email_fields: &[],
    search_fields: &["productName"],
    has_credentials: false,
};

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl ResourceSchema {
    /// Required fields absent from `body`. Absent, null, and blank string
    /// values all count as missing.
    pub fn missing_required(&self, body: &Map<String, Value>) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|field| is_missing(body.get(*field)))
            .collect()
    }

    /// Fill in defaults for fields omitted from `body`. Keys that are
    /// present keep their value, even when it is falsy.
    pub fn apply_defaults(&self, body: &mut Map<String, Value>) {
        for (field, default) in self.defaults {
            if !body.contains_key(*field) {
                body.insert((*field).to_string(), default.to_value());
            }
        }
    }

    /// Lowercase and trim every email-bearing field present in `body`.
    pub fn normalize_emails(&self, body: &mut Map<String, Value>) {
        for field in self.email_fields {
            if let Some(Value::String(email)) = body.get_mut(*field) {
                *email = email.trim().to_lowercase();
            }
        }
    }
}
