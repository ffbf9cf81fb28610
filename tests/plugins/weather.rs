use pocketdesk::core::config::WeatherConfig;
use pocketdesk::core::error::DeskError;
use pocketdesk::core::store::Store;
use pocketdesk::plugins::weather::{
    WeatherReport, fetch_weather, load_history, parse_report, record_lookup,
};
use serde_json::json;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

/// Serve exactly one HTTP response on a local port and return the URL.
fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://127.0.0.1:{}/data/2.5/weather", port)
}

fn config_for(url: String) -> WeatherConfig {
    WeatherConfig {
        api_key: Some("test-key".to_string()),
        api_url: url,
        timeout_secs: 5,
        history_limit: 5,
    }
}

fn report(city: &str) -> WeatherReport {
    WeatherReport {
        city: city.to_string(),
        temperature_c: 21.5,
        humidity_pct: 60,
        sky: "Clear Sky".to_string(),
    }
}

#[test]
fn test_parse_report_extracts_fields() {
    let body = json!({
        "name": "Pune",
        "main": { "temp": 27.4, "humidity": 48 },
        "weather": [{ "description": "scattered clouds" }]
    });
    let parsed = parse_report(&body).unwrap();
    assert_eq!(parsed.city, "Pune");
    assert_eq!(parsed.temperature_c, 27.4);
    assert_eq!(parsed.humidity_pct, 48);
    assert_eq!(parsed.sky, "Scattered Clouds");
}

#[test]
fn test_parse_report_rejects_missing_fields() {
    let body = json!({ "name": "Pune", "main": { "temp": 27.4 }, "weather": [] });
    assert!(matches!(
        parse_report(&body),
        Err(DeskError::MalformedResponse(_))
    ));
}

#[test]
fn test_fetch_without_api_key_is_a_config_error() {
    let config = WeatherConfig::default();
    assert!(matches!(
        fetch_weather(&config, "Pune"),
        Err(DeskError::ConfigError(_))
    ));
}

#[test]
fn test_fetch_blank_city_is_rejected() {
    let config = config_for("http://127.0.0.1:9/".to_string());
    assert!(matches!(
        fetch_weather(&config, "  "),
        Err(DeskError::ValidationError(_))
    ));
}

#[test]
fn test_fetch_success() {
    let url = one_shot_server(
        "200 OK",
        r#"{"name":"Oslo","main":{"temp":3.0,"humidity":81},"weather":[{"description":"light snow"}]}"#,
    );
    let fetched = fetch_weather(&config_for(url), "oslo").unwrap();
    assert_eq!(
        fetched,
        WeatherReport {
            city: "Oslo".to_string(),
            temperature_c: 3.0,
            humidity_pct: 81,
            sky: "Light Snow".to_string(),
        }
    );
}

#[test]
fn test_fetch_unknown_city() {
    let url = one_shot_server("404 Not Found", r#"{"cod":"404","message":"city not found"}"#);
    assert!(matches!(
        fetch_weather(&config_for(url), "Atlantis"),
        Err(DeskError::CityNotFound(city)) if city == "Atlantis"
    ));
}

#[test]
fn test_fetch_other_http_status() {
    let url = one_shot_server("500 Internal Server Error", "{}");
    assert!(matches!(
        fetch_weather(&config_for(url), "Oslo"),
        Err(DeskError::HttpStatus(500))
    ));
}

#[test]
fn test_fetch_malformed_body() {
    let url = one_shot_server("200 OK", "not json");
    assert!(matches!(
        fetch_weather(&config_for(url), "Oslo"),
        Err(DeskError::MalformedResponse(_))
    ));
}

#[test]
fn test_fetch_unreachable_service() {
    // Bind then drop to get a port nobody is listening on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = config_for(format!("http://127.0.0.1:{}/", port));
    assert!(matches!(
        fetch_weather(&config, "Oslo"),
        Err(DeskError::ServiceUnavailable(_))
    ));
}

#[test]
fn test_history_keeps_newest_five() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    assert!(load_history(&store).unwrap().is_empty());

    for city in ["A", "B", "C", "D", "E", "F", "G"] {
        record_lookup(&store, &report(city), 5).unwrap();
    }

    let cities: Vec<String> = load_history(&store).unwrap().into_iter().map(|r| r.city).collect();
    assert_eq!(cities, vec!["G", "F", "E", "D", "C"]);
}

#[test]
fn test_history_file_uses_display_labels() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    record_lookup(&store, &report("Lima"), 5).unwrap();

    let raw = fs::read_to_string(store.weather_history().path()).unwrap();
    assert!(raw.contains("\"City\": \"Lima\""));
    assert!(raw.contains("\"Temperature (°C)\": 21.5"));
    assert!(raw.contains("\"Humidity (%)\": 60"));
    assert!(raw.contains("\"Sky\": \"Clear Sky\""));
}
