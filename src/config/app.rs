use axum::http::HeaderValue;
use wallet_core::config::ConfigBuilder;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://digitalwallet-tkg4.onrender.com";
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// The single origin allowed by CORS.
    pub allowed_origin: String,
    /// Where the API is reachable from outside; the OpenAPI server entry is
    /// `<public_url>/api`.
    pub public_url: String,
    pub body_limit: usize,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = parse_port(lookup("PORT").as_deref());

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("cannot read `DATABASE_URL`"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .map(|raw| {
                raw.trim().parse().map_err(|err| {
                    anyhow::anyhow!("cannot parse `DATABASE_MAX_CONNECTIONS`: {:?}", err)
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let allowed_origin = lookup("ALLOWED_ORIGIN")
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into());
        HeaderValue::from_str(&allowed_origin)
            .map_err(|err| anyhow::anyhow!("`ALLOWED_ORIGIN` is not a valid origin: {:?}", err))?;

        let public_url = resolve_public_url(&lookup);

        let body_limit = lookup("BODY_LIMIT_BYTES")
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|err| anyhow::anyhow!("cannot parse `BODY_LIMIT_BYTES`: {:?}", err))
            })
            .transpose()?
            .unwrap_or(DEFAULT_BODY_LIMIT);

        Ok(AppConfig {
            port,
            database_url,
            database_max_connections,
            allowed_origin,
            public_url,
            body_limit,
        })
    }

    /// Where the Swagger UI is served from the outside.
    pub fn docs_url(&self) -> String {
        format!("{}/", self.public_url)
    }
}

impl ConfigBuilder for AppConfig {
    fn build() -> anyhow::Result<Self> {
        AppConfig::from_lookup(env_lookup)
    }
}

/// Process environment lookup; a variable set to an empty value counts as
/// unset.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// `PORT` unset or empty falls back to 3000.
pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        tracing::warn!("cannot read `PORT` defaulting to `{}`", DEFAULT_PORT);
        return DEFAULT_PORT;
    };

    raw.parse().unwrap_or_else(|err| {
        tracing::error!("cannot parse `PORT`. defaulting to {} {:?}", DEFAULT_PORT, err);
        DEFAULT_PORT
    })
}

/// `PUBLIC_URL`, else `ALLOWED_ORIGIN`, else the default deployment origin.
pub fn resolve_public_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| {
        lookup(name)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    };

    lookup("PUBLIC_URL")
        .or_else(|| lookup("ALLOWED_ORIGIN"))
        .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into())
        .trim_end_matches('/')
        .to_string()
}
