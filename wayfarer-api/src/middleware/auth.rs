use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Hotel,
    Cab,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

pub const ADMIN: &[Role] = &[Role::Admin];
pub const USER: &[Role] = &[Role::User];
pub const HOTEL_STAFF: &[Role] = &[Role::Hotel, Role::Admin];
pub const CAB_STAFF: &[Role] = &[Role::Cab, Role::Admin];
pub const CAB_EDITORS: &[Role] = &[Role::Admin, Role::Cab, Role::User];

/// Verifies the bearer token and stores its claims in the request extensions.
pub async fn protect(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Not authorized, no token".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        tracing::debug!("Rejected bearer token: {}", err);
        AppError::AuthenticationError("Not authorized, token failed".to_string())
    })?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Lets the request through only when the caller's role is in `allowed`.
/// Must run after [`protect`].
pub async fn access_role(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::AuthenticationError("Not authorized".to_string()))?;

    if !allowed.contains(&claims.role) {
        return Err(AppError::AuthorizationError(format!(
            "Role {:?} is not allowed to access this resource",
            claims.role
        )));
    }
    Ok(next.run(req).await)
}

/// Puts every route of `router` behind `protect`, then the role check.
/// An empty `allowed` list admits any authenticated caller.
pub fn guarded(state: &AppState, allowed: &'static [Role], router: Router<AppState>) -> Router<AppState> {
    let router = if allowed.is_empty() {
        router
    } else {
        router.route_layer(from_fn_with_state(allowed, access_role))
    };
    router.route_layer(from_fn_with_state(state.clone(), protect))
}

/// Caller must be `id` themself.
pub fn ensure_self(claims: &Claims, id: Uuid) -> Result<(), AppError> {
    if claims.sub != id {
        return Err(AppError::AuthorizationError(
            "You can only access your own bookings".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_use_lowercase_names() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": Uuid::nil(),
            "name": "Asha",
            "role": "hotel",
            "exp": 0
        }))
        .unwrap();
        assert!(claims.is(Role::Hotel));
        assert!(HOTEL_STAFF.contains(&claims.role));
        assert!(!CAB_STAFF.contains(&claims.role));
    }

    #[test]
    fn test_ensure_self() {
        let me = Uuid::new_v4();
        let claims = Claims {
            sub: me,
            name: "Asha".into(),
            role: Role::User,
            exp: 0,
        };
        assert!(ensure_self(&claims, me).is_ok());
        assert!(matches!(
            ensure_self(&claims, Uuid::new_v4()),
            Err(AppError::AuthorizationError(_))
        ));
    }
}
