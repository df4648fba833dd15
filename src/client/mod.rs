//! PokeAPI client for the single `pokemon/{name}` resource
//!
//! Architecture: Infrastructure Adapter - Translates HTTP responses into domain outcomes
//! - One GET per lookup, no retries and no caching
//! - Status codes map onto PokedexError variants at this boundary

use crate::config::ApiConfig;
use crate::domain::pokemon::Pokemon;
use crate::domain::validation::{PokedexError, PokedexResult};
use reqwest::StatusCode;
use std::time::Duration;

/// HTTP client bound to one PokeAPI base URL
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a client with the configured timeout and user agent
    pub fn new(config: &ApiConfig) -> PokedexResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the `pokemon` resource for an already sanitized name
    pub fn pokemon_url(&self, name: &str) -> String {
        format!("{}pokemon/{}", self.base_url, name)
    }

    /// Fetch a Pokémon by sanitized name
    pub async fn fetch_pokemon(&self, name: &str) -> PokedexResult<Pokemon> {
        let url = self.pokemon_url(name);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        match status {
            StatusCode::OK => {
                let pokemon: Pokemon = response.json().await?;
                tracing::info!("Retrieved {} ({})", pokemon.name, pokemon.dex_number());
                Ok(pokemon)
            }
            StatusCode::NOT_FOUND => Err(PokedexError::NotFound { name: name.to_string() }),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unexpected status").to_string()
                } else {
                    body.trim().to_string()
                };
                Err(PokedexError::Api { status: status.as_u16(), message })
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::serve_once;
    use super::*;
    use crate::domain::pokemon::fixtures::PIKACHU_JSON;

    fn client_for(base_url: &str) -> PokeApiClient {
        PokeApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            user_agent: "pokedex-guard-tests".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_pokemon_url_normalizes_trailing_slash() {
        let with_slash = client_for("https://pokeapi.co/api/v2/");
        let without_slash = client_for("https://pokeapi.co/api/v2");

        assert_eq!(with_slash.pokemon_url("pikachu"), "https://pokeapi.co/api/v2/pokemon/pikachu");
        assert_eq!(without_slash.pokemon_url("pikachu"), with_slash.pokemon_url("pikachu"));
    }

    #[tokio::test]
    async fn test_fetch_pokemon_decodes_body() {
        let (base_url, request) = serve_once("200 OK", PIKACHU_JSON.to_string()).await;

        let pokemon = client_for(&base_url).fetch_pokemon("pikachu").await.unwrap();

        assert_eq!(pokemon.id, 25);
        assert_eq!(pokemon.display_name(), "Pikachu");
        assert_eq!(request.await.unwrap(), "GET /api/v2/pokemon/pikachu HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_pokemon_not_found() {
        let (base_url, _request) = serve_once("404 Not Found", "Not Found".to_string()).await;

        let err = client_for(&base_url).fetch_pokemon("missingno").await.unwrap_err();

        assert!(matches!(err, PokedexError::NotFound { ref name } if name == "missingno"));
        assert_eq!(err.to_string(), "Pokémon 'missingno' not found");
    }

    #[tokio::test]
    async fn test_fetch_pokemon_other_status() {
        let (base_url, _request) =
            serve_once("503 Service Unavailable", String::new()).await;

        let err = client_for(&base_url).fetch_pokemon("pikachu").await.unwrap_err();

        match err {
            PokedexError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_http_error() {
        let (base_url, _request) = serve_once("200 OK", "{\"id\": \"oops\"}".to_string()).await;

        let err = client_for(&base_url).fetch_pokemon("pikachu").await.unwrap_err();

        assert!(matches!(err, PokedexError::Http(_)));
    }
}
