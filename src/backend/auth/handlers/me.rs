/**
 * Get Current Identity Handler
 *
 * GET /api/auth/me returns the identity the auth middleware resolved for
 * this request. Clients use it to learn their own id and role before
 * opening a room.
 */

use axum::response::Json;

use crate::backend::middleware::AuthUser;
use crate::shared::chat::Identity;

/// Get current identity handler
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "username": "alice",
///   "full_name": "Alice Smith",
///   "role": "user"
/// }
/// ```
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<Identity> {
    tracing::debug!("[Auth] /me for {}", identity.id);
    Json(identity)
}
