use serde::{Deserialize, Serialize};

/// JWT payload: `sub` carries the user id. The token is the only proof of
/// authentication; nothing is kept server-side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}
