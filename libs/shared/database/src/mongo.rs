use anyhow::Result;
use mongodb::{
    bson::{doc, Document},
    Client, Collection, Database, IndexModel,
};
use tracing::{debug, info};

use shared_config::AppConfig;

pub const PATIENTS_COLLECTION: &str = "patients";
pub const USERS_COLLECTION: &str = "users";
pub const BLACKLIST_COLLECTION: &str = "blacklist";

/// Handle on the backing document store. The driver's client is pooled
/// internally, so one `MongoStore` is shared across all requests.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        debug!("Connecting to MongoDB at {}", config.mongo_uri);

        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db = client.database(&config.mongo_db);

        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn patients(&self) -> Collection<Document> {
        self.db.collection(PATIENTS_COLLECTION)
    }

    pub fn users(&self) -> Collection<Document> {
        self.db.collection(USERS_COLLECTION)
    }

    pub fn blacklist(&self) -> Collection<Document> {
        self.db.collection(BLACKLIST_COLLECTION)
    }

    /// The proximity query needs a 2dsphere index on the patient
    /// location field; index creation is idempotent.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let geo_index = IndexModel::builder()
            .keys(doc! { "location": "2dsphere" })
            .build();

        self.patients().create_index(geo_index).await?;
        info!("Ensured 2dsphere index on patients.location");

        Ok(())
    }
}
