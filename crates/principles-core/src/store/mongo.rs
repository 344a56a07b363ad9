//! MongoDB principle store
//!
//! Documents are inserted as given; MongoDB assigns an `ObjectId` under
//! `_id`. Client JSON is converted value by value, so objects that look like
//! extended JSON (`{"$numberLong": "5"}`) are stored literally. On the way
//! out the `_id` is split from the remaining fields, which are converted to
//! relaxed extended JSON.

use bson::{doc, oid::ObjectId, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use serde_json::Value;

use super::{IdCodec, PrincipleStore};
use crate::config::ServiceSettings;
use crate::error::{ServiceError, StoreError, StoreResult};
use crate::model::{Fields, NewPrinciple, StoredDocument, ID_FIELD};

/// Principle store backed by a MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoPrincipleStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
}

impl MongoPrincipleStore {
    /// Connect, ping the deployment and select the configured database
    ///
    /// Fails with `ServiceError::Configuration` when no connection string is
    /// configured and with `ServiceError::StoreOperation` when the
    /// deployment cannot be reached.
    pub async fn connect(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        let uri = settings.require_uri()?;

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self::with_client(client, &settings.database, &settings.collection);
        store
            .ping()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(store)
    }

    /// Wrap an existing client without contacting the server
    pub fn with_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection::<Document>(collection);
        Self {
            client,
            database: database.to_string(),
            collection,
        }
    }

    /// Name of the selected database
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl IdCodec for MongoPrincipleStore {
    type Id = Bson;

    fn parse_id(raw: &str) -> StoreResult<Bson> {
        ObjectId::parse_str(raw)
            .map(Bson::ObjectId)
            .map_err(|e| StoreError::InvalidId(format!("{}: {}", raw, e)))
    }

    fn render_id(id: &Bson) -> String {
        match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PrincipleStore for MongoPrincipleStore {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    async fn insert(&self, principle: NewPrinciple) -> StoreResult<Bson> {
        let document = to_bson_document(principle.fields())?;
        let result = self.collection.insert_one(document, None).await?;
        tracing::debug!(id = %Self::render_id(&result.inserted_id), "Inserted principle");
        Ok(result.inserted_id)
    }

    async fn find_all(&self) -> StoreResult<Vec<StoredDocument<Bson>>> {
        let cursor = self.collection.find(None, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(from_bson_document).collect()
    }

    async fn find_by_id(&self, id: &Bson) -> StoreResult<Option<StoredDocument<Bson>>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.clone() }, None)
            .await?;
        found.map(from_bson_document).transpose()
    }
}

/// Convert client fields into a BSON document for insertion
pub fn to_bson_document(fields: &Fields) -> StoreResult<Document> {
    let mut document = Document::new();
    for (key, value) in fields {
        document.insert(key.clone(), to_bson(value)?);
    }
    Ok(document)
}

/// Convert a JSON value without interpreting extended JSON keys
///
/// Integers become `Int32` when they fit and `Int64` otherwise. Integers
/// beyond the `i64` range cannot be stored.
fn to_bson(value: &Value) -> StoreResult<Bson> {
    let bson = match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32)
            } else if n.is_u64() {
                return Err(StoreError::Serialization(format!(
                    "integer {} exceeds the 64-bit signed range",
                    n
                )));
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => {
            Bson::Array(items.iter().map(to_bson).collect::<StoreResult<_>>()?)
        }
        Value::Object(fields) => Bson::Document(to_bson_document(fields)?),
    };
    Ok(bson)
}

/// Split a stored BSON document into its `_id` and JSON fields
pub fn from_bson_document(mut document: Document) -> StoreResult<StoredDocument<Bson>> {
    let id = document
        .remove(ID_FIELD)
        .ok_or_else(|| StoreError::Serialization("document has no _id".to_string()))?;

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(StoredDocument::new(id, fields)),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
