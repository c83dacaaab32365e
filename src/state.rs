use std::sync::Arc;

use crate::db::OrmConn;

/// Shared handles injected into every handler and service call.
#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            orm,
            jwt_secret: jwt_secret.into(),
        }
    }
}
