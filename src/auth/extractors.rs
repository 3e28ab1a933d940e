use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use crate::config::JwtConfig;
use crate::state::AppState;

/// Extracts and validates the bearer JWT, returning the owning user ID.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

pub(crate) fn verify_access(token: &str, cfg: &JwtConfig) -> Result<Uuid, &'static str> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());

    let data = decode::<Claims>(token, &decoding, &validation)
        .map_err(|_| "invalid or expired token")?;
    if data.claims.kind != TokenKind::Access {
        return Err("access token required");
    }
    debug!(user_id = %data.claims.sub, "jwt verified");
    Ok(data.claims.sub)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let user_id = verify_access(token, &state.config.jwt).map_err(|msg| {
            warn!(reason = msg, "rejected token");
            (StatusCode::UNAUTHORIZED, msg.to_string())
        })?;

        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    fn token(state: &AppState, sub: Uuid, kind: TokenKind, issuer: &str) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub,
            iat: now,
            exp: now + 300,
            iss: issuer.into(),
            aud: state.config.jwt.audience.clone(),
            kind,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        )
        .expect("sign")
    }

    async fn extract(state: &AppState, header: Option<String>) -> Result<AuthUser, (StatusCode, String)> {
        let mut builder = Request::builder().uri("/api/v1/profile");
        if let Some(h) = header {
            builder = builder.header("authorization", h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn accepts_valid_access_token() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let t = token(&state, user_id, TokenKind::Access, "test-issuer");
        let AuthUser(got) = extract(&state, Some(format!("Bearer {t}"))).await.expect("auth");
        assert_eq!(got, user_id);
    }

    #[tokio::test]
    async fn rejects_missing_header_and_bad_scheme() {
        let state = AppState::fake();
        let err = extract(&state, None).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);

        let err = extract(&state, Some("Basic abc".into())).await.unwrap_err();
        assert_eq!(err.1, "invalid auth scheme");
    }

    #[tokio::test]
    async fn rejects_refresh_token_and_foreign_issuer() {
        let state = AppState::fake();
        let t = token(&state, Uuid::new_v4(), TokenKind::Refresh, "test-issuer");
        let err = extract(&state, Some(format!("Bearer {t}"))).await.unwrap_err();
        assert_eq!(err.1, "access token required");

        let t = token(&state, Uuid::new_v4(), TokenKind::Access, "someone-else");
        let err = extract(&state, Some(format!("Bearer {t}"))).await.unwrap_err();
        assert_eq!(err.1, "invalid or expired token");
    }
}
