//! Shared fixtures: canned API payloads and a one-shot local HTTP server.
#![allow(dead_code)]

use covid_tracker::Client;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub const GLOBAL_JSON: &str = r#"{
  "updated": 1700000000000,
  "cases": 1234567,
  "todayCases": 12,
  "deaths": 7654,
  "todayDeaths": 0,
  "recovered": 1100000,
  "todayRecovered": 3,
  "active": 126913,
  "critical": 4321,
  "casesPerOneMillion": 90057.1,
  "deathsPerOneMillion": 891.6,
  "tests": 7000000000,
  "testsPerOneMillion": 880000.25,
  "population": 7900000000,
  "oneCasePerPeople": 0,
  "oneDeathPerPeople": 0,
  "oneTestPerPeople": 0,
  "activePerOneMillion": 16.1,
  "recoveredPerOneMillion": 139.4,
  "criticalPerOneMillion": 0.55,
  "affectedCountries": 231
}"#;

pub const COUNTRIES_JSON: &str = r#"[
  {
    "updated": 1700000000000,
    "country": "Afghanistan",
    "countryInfo": {"_id": 4, "iso2": "AF", "iso3": "AFG", "lat": 33, "long": 65, "flag": "https://disease.sh/assets/img/flags/af.png"},
    "cases": 230000, "todayCases": 0, "deaths": 7896, "todayDeaths": 0,
    "recovered": 211000, "todayRecovered": 0, "active": 11104, "critical": 1124,
    "casesPerOneMillion": 5675, "deathsPerOneMillion": 195, "tests": 1400000,
    "testsPerOneMillion": 34552, "population": 40754388, "continent": "Asia",
    "activePerOneMillion": 272.46, "recoveredPerOneMillion": 5177.4, "criticalPerOneMillion": 27.58
  },
  {
    "updated": 1700000000000,
    "country": "USA",
    "countryInfo": {"_id": 840, "iso2": "US", "iso3": "USA", "lat": 38, "long": -97, "flag": "https://disease.sh/assets/img/flags/us.png"},
    "cases": 111820082, "todayCases": 0, "deaths": 1219487, "todayDeaths": 0,
    "recovered": 109814428, "todayRecovered": 0, "active": 786167, "critical": 940,
    "casesPerOneMillion": 333985, "deathsPerOneMillion": 3642, "tests": 1186851502,
    "testsPerOneMillion": 3544901, "population": 334805269, "continent": "North America",
    "activePerOneMillion": 2348.1, "recoveredPerOneMillion": 327995.3, "criticalPerOneMillion": 2.81
  },
  {
    "updated": 1700000000000,
    "country": "MS Zaandam",
    "countryInfo": {"_id": null, "iso2": null, "iso3": null, "lat": 0, "long": 0, "flag": "https://disease.sh/assets/img/flags/unknown.png"},
    "cases": 9, "todayCases": 0, "deaths": 2, "todayDeaths": 0,
    "recovered": 7, "todayRecovered": 0, "active": 0, "critical": 0,
    "casesPerOneMillion": 0, "deathsPerOneMillion": 0, "tests": 0,
    "testsPerOneMillion": 0, "population": 0, "continent": "",
    "activePerOneMillion": 0, "recoveredPerOneMillion": null, "criticalPerOneMillion": 0
  }
]"#;

pub const HISTORICAL_JSON: &str = r#"{
  "cases": {"12/30/22": 660000000, "12/31/22": 660500000, "1/1/23": 661000000},
  "deaths": {"12/30/22": 6690000, "12/31/22": 6691000, "1/1/23": 6692000},
  "recovered": {"12/30/22": 0, "12/31/22": 0, "1/1/23": 0}
}"#;

/// Serve `responses` (status, body) to successive connections on 127.0.0.1,
/// one response per connection. The receiver yields each request line
/// (`GET /path HTTP/1.1`) as it arrives.
pub fn serve(responses: Vec<(u16, String)>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                return;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) => break,
                    Ok(_) if header == "\r\n" || header == "\n" => break,
                    Ok(_) => continue,
                    Err(_) => return,
                }
            }
            tx.send(request_line.trim_end().to_string()).ok();
            let reason = if status == 200 { "OK" } else { "Error" };
            let _ = write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.flush();
        }
    });
    (format!("http://{addr}"), rx)
}

/// Client for a local test server, bypassing any proxy configured in the environment.
pub fn local_client(base_url: &str) -> Client {
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("reqwest client build");
    Client::from_http(base_url, http)
}

/// A base URL nobody listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
