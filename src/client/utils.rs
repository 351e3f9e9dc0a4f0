use secrecy::ExposeSecret;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use crate::client::config::Config;
use crate::client::consts::{BIDI_GENERATE_CONTENT_PATH, CONTENT_TYPE_HEADER};

pub fn build_request(config: &Config) -> tokio_tungstenite::tungstenite::Result<Request> {
    let mut request = format!(
        "{}/{}?key={}",
        config.base_url(),
        BIDI_GENERATE_CONTENT_PATH,
        config.api_key().expose_secret()
    )
    .into_client_request()?;
    request
        .headers_mut()
        .insert(CONTENT_TYPE_HEADER, "application/json".parse()?);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_key_and_service_path() {
        let config = Config::builder()
            .with_base_url("wss://example.test/ws")
            .with_api_key("secret-key")
            .build();
        let request = build_request(&config).unwrap();

        let uri = request.uri().to_string();
        assert!(uri.starts_with("wss://example.test/ws/"));
        assert!(uri.contains(BIDI_GENERATE_CONTENT_PATH));
        assert!(uri.ends_with("?key=secret-key"));
        assert_eq!(
            request.headers().get(CONTENT_TYPE_HEADER).unwrap(),
            "application/json"
        );
    }
}
