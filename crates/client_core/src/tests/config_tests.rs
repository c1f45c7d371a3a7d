use super::{apply_env_overrides, apply_file_overrides, ClientSettings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("scan_client_{tag}_{suffix}.toml"))
}

#[test]
fn defaults_point_at_local_service_without_timeout() {
    let settings = ClientSettings::default();

    assert_eq!(settings.service_url, "http://127.0.0.1:5000");
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let settings = ClientSettings {
        request_timeout_secs: Some(0),
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout(), None);

    let settings = ClientSettings {
        request_timeout_secs: Some(30),
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn settings_file_overrides_defaults() {
    let path = temp_settings_path("file");
    fs::write(
        &path,
        "service_url = \"http://analysis.lab:8080\"\nrequest_timeout_secs = 45\n",
    )
    .expect("write settings");

    let mut settings = ClientSettings::default();
    apply_file_overrides(&mut settings, &path);

    assert_eq!(settings.service_url, "http://analysis.lab:8080");
    assert_eq!(settings.request_timeout_secs, Some(45));
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn missing_or_malformed_file_keeps_defaults() {
    let mut settings = ClientSettings::default();
    apply_file_overrides(&mut settings, &temp_settings_path("missing"));
    assert_eq!(settings, ClientSettings::default());

    let path = temp_settings_path("malformed");
    fs::write(&path, "service_url = [").expect("write settings");
    apply_file_overrides(&mut settings, &path);
    assert_eq!(settings, ClientSettings::default());
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = ClientSettings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("SCAN_SERVICE_URL", "http://plain:5000"),
            ("APP__SERVICE_URL", "http://prefixed:5000"),
            ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ]),
    );

    assert_eq!(settings.service_url, "http://prefixed:5000");
    assert_eq!(settings.request_timeout_secs, Some(12));
}

#[test]
fn non_numeric_timeout_env_is_ignored() {
    let mut settings = ClientSettings {
        request_timeout_secs: Some(9),
        ..ClientSettings::default()
    };
    apply_env_overrides(
        &mut settings,
        lookup_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    );

    assert_eq!(settings.request_timeout_secs, Some(9));
}
