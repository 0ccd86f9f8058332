// ═══════════════════════════════════════════════════════════════════
// Provider Tests — price extraction from page markup, CoinMarketCap setup
// ═══════════════════════════════════════════════════════════════════

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use value_tracker_core::errors::CoreError;
use value_tracker_core::models::settings::PriceSourceSettings;
use value_tracker_core::providers::coinmarketcap::{extract_price, parse_selectors, CoinMarketCapProvider};
use value_tracker_core::providers::traits::PriceProvider;

fn default_selectors() -> Vec<scraper::Selector> {
    parse_selectors(&PriceSourceSettings::default().price_selectors).unwrap()
}

fn page(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>Price</title></head><body>{body}</body></html>")
}

/// Serve one canned HTTP response on a local port; returns the base URL.
async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/currencies")
}

fn local_provider(base_url: String) -> CoinMarketCapProvider {
    let settings = PriceSourceSettings {
        base_url,
        timeout_secs: 5,
        ..PriceSourceSettings::default()
    };
    CoinMarketCapProvider::new(&settings).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// extract_price
// ═══════════════════════════════════════════════════════════════════

mod extract {
    use super::*;

    #[test]
    fn first_selector() {
        let html = page(r#"<div><span class="sc-d1ede7e3-0 hSTakI base-text">$97,123.45</span></div>"#);
        let price = extract_price(&html, &default_selectors(), "bitcoin").unwrap();
        assert_eq!(price, 97_123.45);
    }

    #[test]
    fn falls_back_to_second_selector() {
        let html = page(r#"<span class="sc-d1ede7e3-0 fsQm base-text">$0.5123</span>"#);
        let price = extract_price(&html, &default_selectors(), "cardano").unwrap();
        assert_eq!(price, 0.5123);
    }

    #[test]
    fn first_matching_selector_wins() {
        let html = page(
            r#"<span class="sc-d1ede7e3-0 fsQm base-text">$2.00</span>
               <span class="sc-d1ede7e3-0 hSTakI base-text">$1.00</span>"#,
        );
        let price = extract_price(&html, &default_selectors(), "xrp").unwrap();
        assert_eq!(price, 1.0);
    }

    #[test]
    fn strips_whitespace_and_nested_markup() {
        let html = page(r#"<span class="sc-d1ede7e3-0 hSTakI base-text">
            $<b>1,234</b>.50
        </span>"#);
        let price = extract_price(&html, &default_selectors(), "solana").unwrap();
        assert_eq!(price, 1234.5);
    }

    #[test]
    fn no_matching_element() {
        let html = page(r#"<span class="price">$10</span>"#);
        let err = extract_price(&html, &default_selectors(), "solana").unwrap_err();
        assert!(matches!(err, CoreError::PriceParse { ref asset, .. } if asset == "solana"));
        assert!(err.is_fetch_error());
    }

    #[test]
    fn non_numeric_text() {
        let html = page(r#"<span class="sc-d1ede7e3-0 hSTakI base-text">N/A</span>"#);
        let err = extract_price(&html, &default_selectors(), "bitcoin").unwrap_err();
        assert!(err.to_string().contains("N/A"));
    }

    #[test]
    fn custom_selector() {
        let selectors = parse_selectors(&["div#price".to_string()]).unwrap();
        let html = page(r#"<div id="price">$2.75</div>"#);
        assert_eq!(extract_price(&html, &selectors, "pi").unwrap(), 2.75);
    }

    #[test]
    fn empty_document() {
        assert!(extract_price("", &default_selectors(), "bitcoin").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Selectors & provider construction
// ═══════════════════════════════════════════════════════════════════

mod provider {
    use super::*;

    #[test]
    fn invalid_selector_is_config_error() {
        let err = parse_selectors(&["span[".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn name() {
        let p = CoinMarketCapProvider::new(&PriceSourceSettings::default()).unwrap();
        assert_eq!(p.name(), "CoinMarketCap");
    }

    #[test]
    fn page_url_uses_base_and_asset_id() {
        let p = CoinMarketCapProvider::new(&PriceSourceSettings::default()).unwrap();
        assert_eq!(p.page_url("bitcoin"), "https://coinmarketcap.com/currencies/bitcoin/");
    }

    #[test]
    fn page_url_trims_trailing_slash() {
        let settings = PriceSourceSettings {
            base_url: "http://localhost:8080/currencies/".into(),
            ..PriceSourceSettings::default()
        };
        let p = CoinMarketCapProvider::new(&settings).unwrap();
        assert_eq!(p.page_url("xrp"), "http://localhost:8080/currencies/xrp/");
    }

    #[test]
    fn construction_rejects_bad_selectors() {
        let settings = PriceSourceSettings {
            price_selectors: vec!["::::".into()],
            ..PriceSourceSettings::default()
        };
        assert!(CoinMarketCapProvider::new(&settings).is_err());
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error() {
        // Port 9 on localhost (discard) is not expected to serve HTTP.
        let settings = PriceSourceSettings {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..PriceSourceSettings::default()
        };
        let p = CoinMarketCapProvider::new(&settings).unwrap();
        let err = p.get_current_price("bitcoin").await.unwrap_err();
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let base = serve_once("404 Not Found", "not here".into()).await;
        let err = local_provider(base).get_current_price("bitcoin").await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Api { ref provider, ref message }
                if provider == "CoinMarketCap" && message.contains("404") && message.contains("bitcoin")
        ));
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn success_response_is_parsed() {
        let body = page(r#"<span class="sc-d1ede7e3-0 hSTakI base-text">$64,250.10</span>"#);
        let base = serve_once("200 OK", body).await;
        let price = local_provider(base).get_current_price("bitcoin").await.unwrap();
        assert_eq!(price, 64_250.10);
    }
}
