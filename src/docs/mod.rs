use std::path::Path;

use tokio::io::AsyncWriteExt;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::openapi::server::ServerBuilder;
use utoipa::{Modify, OpenApi};
use wallet_core::response::{ErrorBody, MessageResponse};

use crate::app::controller::{AuthControllerApi, ProductControllerApi, WalletControllerApi};

pub const BASIC_AUTH_SCHEME: &str = "basicAuth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Digital Wallet API",
        version = "1.0.0",
        description = "API for digital wallet operations including user registration, transactions, and product management"
    ),
    modifiers(&SecurityAddon),
    components(schemas(ErrorBody, MessageResponse))
)]
pub struct MainApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BASIC_AUTH_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// The full document: static metadata, the paths of every controller and
/// one server entry at `<public_url>/api`. Built once at startup.
pub fn openapi(public_url: &str) -> utoipa::openapi::OpenApi {
    let mut docs = MainApiDoc::openapi();
    docs.merge(AuthControllerApi::openapi());
    docs.merge(WalletControllerApi::openapi());
    docs.merge(ProductControllerApi::openapi());

    docs.servers = Some(vec![
        ServerBuilder::new()
            .url(format!("{}/api", public_url.trim_end_matches('/')))
            .description(Some("Deployed server"))
            .build(),
    ]);

    docs
}

pub async fn generate_docs(public_url: &str, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    let docs = openapi(public_url).to_pretty_json()?;

    file.write_all(docs.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_entry_points_at_the_api_prefix() {
        let docs = openapi("https://wallet.example.com/");
        let servers = docs.servers.unwrap();

        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].url, "https://wallet.example.com/api");
    }

    #[test]
    fn declares_basic_auth() {
        let docs = openapi("https://wallet.example.com");
        let components = docs.components.unwrap();

        let scheme = components.security_schemes.get(BASIC_AUTH_SCHEME).unwrap();
        assert!(matches!(scheme, SecurityScheme::Http(_)));
        assert!(components.schemas.contains_key("ErrorBody"));
    }

    #[test]
    fn contains_every_route_group() {
        let docs = openapi("https://wallet.example.com");
        let paths = &docs.paths.paths;

        for path in ["/register", "/me", "/fund", "/pay", "/bal", "/stmt", "/product", "/buy"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert_eq!(docs.info.title, "Digital Wallet API");
        assert_eq!(docs.info.version, "1.0.0");
    }
}
