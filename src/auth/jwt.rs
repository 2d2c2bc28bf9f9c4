use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, Identity},
    config::JwtConfig,
    state::AppState,
    users::User,
};

/// Signing and verification keys built once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        self.issue_at(user, OffsetDateTime::now_utc())
    }

    /// Signs a token as if issued at `now`.
    pub fn issue_at(&self, user: &User, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            name: user.username.clone(),
            role: user.role,
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, role = %user.role, "jwt signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and expiry, with no clock leeway.
    pub fn verify(&self, token: &str) -> anyhow::Result<Identity> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, role = %data.claims.role, "jwt verified");
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;
    use uuid::Uuid;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    fn make_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "unused".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let user = make_user(Role::Manager);
        let token = keys.issue(&user).expect("issue token");
        let identity = keys.verify(&token).expect("verify token");
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Manager);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let user = make_user(Role::Employee);
        let issued = OffsetDateTime::now_utc() - TimeDuration::minutes(6);
        let token = keys.issue_at(&user, issued).expect("issue token");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = make_keys("secret-one", "iss", "aud");
        let theirs = make_keys("secret-two", "iss", "aud");
        let token = theirs.issue(&make_user(Role::Manager)).unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let other_iss = make_keys("same-secret", "bad-iss", "good-aud");
        let other_aud = make_keys("same-secret", "good-iss", "bad-aud");
        let token = good.issue(&make_user(Role::Employee)).unwrap();
        assert!(other_iss.verify(&token).is_err());
        assert!(other_aud.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue(&make_user(Role::Employee)).unwrap();
        let idx = token.len() - 10;
        let replacement = if &token[idx..idx + 1] == "A" { "B" } else { "A" };
        let mut tampered = token.clone();
        tampered.replace_range(idx..idx + 1, replacement);
        assert!(keys.verify(&tampered).is_err());
        assert!(keys.verify("not.a.jwt").is_err());
    }
}
