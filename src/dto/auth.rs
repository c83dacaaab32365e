use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims of a bearer token issued by the external auth service.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}
