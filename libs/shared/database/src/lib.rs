pub mod ledger;
pub mod mongo;

use std::sync::Arc;

use shared_config::AppConfig;

pub use ledger::{MemoryTokenLedger, MongoTokenLedger, TokenLedger};
pub use mongo::MongoStore;

/// Shared per-process state handed to every router.
pub struct AppState {
    pub config: AppConfig,
    pub store: MongoStore,
    pub ledger: Arc<dyn TokenLedger>,
}
