//! Principle documents
//!
//! A principle is a flat JSON object. Only `title` and `description` are
//! required, and only when the document is created; any other field the
//! client sends is stored as given.

use serde_json::{Map, Value};

use crate::error::{ServiceError, MISSING_FIELDS_MESSAGE};

/// Name of the collection holding principles
pub const COLLECTION: &str = "principles";

/// Key under which a document's identifier is exposed
pub const ID_FIELD: &str = "_id";

/// Fields every new principle must carry
pub const REQUIRED_FIELDS: [&str; 2] = ["title", "description"];

/// Field map of a JSON document
pub type Fields = Map<String, Value>;

/// A creation payload that passed the presence check
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrinciple {
    fields: Fields,
}

impl NewPrinciple {
    /// Validate a parsed request body
    ///
    /// The body must be a JSON object with non-null `title` and
    /// `description` values. A client-supplied `_id` is dropped so the
    /// store always assigns the identifier.
    pub fn from_value(value: Value) -> Result<Self, ServiceError> {
        let Value::Object(mut fields) = value else {
            return Err(ServiceError::validation(MISSING_FIELDS_MESSAGE));
        };

        let complete = REQUIRED_FIELDS
            .iter()
            .all(|name| fields.get(*name).is_some_and(|v| !v.is_null()));
        if !complete {
            return Err(ServiceError::validation(MISSING_FIELDS_MESSAGE));
        }

        fields.remove(ID_FIELD);
        Ok(Self { fields })
    }

    /// Parse and validate a raw request body
    ///
    /// An empty body is reported as missing fields rather than a JSON error.
    pub fn from_slice(body: &[u8]) -> Result<Self, ServiceError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ServiceError::validation(MISSING_FIELDS_MESSAGE));
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

/// A document as held by a store, with its native identifier kept apart
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument<Id> {
    pub id: Id,
    pub fields: Fields,
}

impl<Id> StoredDocument<Id> {
    pub fn new(id: Id, fields: Fields) -> Self {
        Self { id, fields }
    }
}

/// Render a stored document for clients, with `_id` as a string
pub fn serialize_document<Id>(doc: StoredDocument<Id>, render_id: impl Fn(&Id) -> String) -> Fields {
    let StoredDocument { id, fields } = doc;
    let mut out = Map::with_capacity(fields.len() + 1);
    out.insert(ID_FIELD.to_string(), Value::String(render_id(&id)));
    for (key, value) in fields {
        if key != ID_FIELD {
            out.insert(key, value);
        }
    }
    out
}
