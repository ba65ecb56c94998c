use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::AuthError;
use crate::auth::jwt::Claims;

const JWKS_URL_TEMPLATE: &str = "https://{}.supabase.co/auth/v1/.well-known/jwks.json";

/// Public key material of one JWK.
#[derive(Clone)]
enum KeyMaterial {
    Ec { x: String, y: String },
    Rsa { n: String, e: String },
}

#[derive(Clone)]
struct JwksKey {
    material: KeyMaterial,
    algorithm: Algorithm,
}

impl JwksKey {
    fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        let key = match &self.material {
            KeyMaterial::Ec { x, y } => DecodingKey::from_ec_components(x, y)?,
            KeyMaterial::Rsa { n, e } => DecodingKey::from_rsa_components(n, e)?,
        };
        Ok(key)
    }
}

/// Supabase signing keys, fetched on demand and cached by `kid` for an hour.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: JWKS_URL_TEMPLATE.replace("{}", project_ref),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, AuthError> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| AuthError::KeyUnavailable(format!("failed to fetch JWKS: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyUnavailable(format!(
                "failed to fetch JWKS: HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::KeyUnavailable(format!("failed to parse JWKS: {e}")))
    }

    async fn get_key(&self, kid: &str) -> Result<JwksKey, AuthError> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let entry = jwks["keys"]
            .as_array()
            .and_then(|keys| keys.iter().find(|k| k["kid"].as_str() == Some(kid)))
            .ok_or_else(|| AuthError::KeyUnavailable(format!("kid={kid} not found in JWKS")))?;

        let key = parse_jwk(entry)?;
        self.cache.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidClaims("no 'kid' in token header".to_string()))?;

        let key = self.get_key(&kid).await?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key.decoding_key()?, &validation)?;
        Ok(data.claims)
    }
}

fn parse_jwk(entry: &serde_json::Value) -> Result<JwksKey, AuthError> {
    let field = |name: &str| {
        entry[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AuthError::KeyUnavailable(format!("missing '{name}' in JWK")))
    };

    let algorithm = match entry["alg"].as_str() {
        Some("ES384") => Algorithm::ES384,
        Some("RS256") => Algorithm::RS256,
        _ => Algorithm::ES256,
    };

    let material = match algorithm {
        Algorithm::RS256 => KeyMaterial::Rsa {
            n: field("n")?,
            e: field("e")?,
        },
        _ => KeyMaterial::Ec {
            x: field("x")?,
            y: field("y")?,
        },
    };

    Ok(JwksKey {
        material,
        algorithm,
    })
}
