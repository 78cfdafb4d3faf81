pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::ml::{FeatureEncoder, Model};
use crate::protocols::ProtocolCatalog;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<RwLock<Box<dyn Model>>>,
    pub encoder: Arc<FeatureEncoder>,
    pub catalog: ProtocolCatalog,
}

impl AppState {
    pub fn new(model: Box<dyn Model>) -> Self {
        Self {
            model: Arc::new(RwLock::new(model)),
            encoder: Arc::new(FeatureEncoder::new()),
            catalog: ProtocolCatalog::new(),
        }
    }
}
