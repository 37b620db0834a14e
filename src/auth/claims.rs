use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication. Tokens are issued by the account
/// service; this service only needs to recover the principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
