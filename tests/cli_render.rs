use predicates::prelude::*;

const ENV_VARS: &[&str] = &[
    "INVOICE_LANDING_PUBLIC_URL",
    "INVOICE_LANDING_GOOGLE_SITE_VERIFICATION",
    "INVOICE_LANDING_GA_MEASUREMENT_ID",
    "INVOICE_LANDING_ENV",
];

fn landing_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("invoice-landing");
    for key in ENV_VARS {
        cmd.env_remove(key);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_with_unset_environment_uses_defaults() {
    landing_cmd()
        .args(["render"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<title>Free Invoice Generator: Create &amp; Send Professional Invoices in Minutes</title>",
        ))
        .stdout(predicate::str::contains(
            "<link rel=\"canonical\" href=\"https://example.com/\">",
        ))
        .stdout(predicate::str::contains("googletagmanager").not())
        .stdout(predicate::str::contains("google-analytics").not());
}

#[test]
fn render_in_production_orders_analytics_config_before_loader() {
    landing_cmd()
        .env("INVOICE_LANDING_ENV", "production")
        .env("INVOICE_LANDING_GA_MEASUREMENT_ID", "G-TEST123")
        .args(["render"])
        .assert()
        .success()
        .stdout(predicate::str::contains("G-TEST123"))
        .stdout(predicate::function(|html: &str| {
            let config_at = html.find("\"id\":\"google-analytics-config\"");
            let loader_at = html.find("\"id\":\"google-analytics\"");
            matches!((config_at, loader_at), (Some(c), Some(l)) if c < l)
        }));
}

#[test]
fn render_with_page_title_applies_template() {
    landing_cmd()
        .args(["render", "--title", "Pricing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<title>Pricing | Invoice Generator Pro</title>",
        ));
}

#[test]
fn malformed_public_url_falls_back() {
    landing_cmd()
        .env("INVOICE_LANDING_PUBLIC_URL", "not a url")
        .args(["render"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<meta property=\"og:url\" content=\"https://example.com/\">",
        ))
        .stderr(predicate::str::contains("using fallback"));
}

#[test]
fn render_writes_out_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site").join("index.html");

    landing_cmd()
        .args(["render", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert_eq!(html.matches("href=\"/new\"").count(), 2);
}

#[test]
fn metadata_prints_merged_json() {
    let output = landing_cmd()
        .env("INVOICE_LANDING_PUBLIC_URL", "https://invoices.example.org")
        .env("INVOICE_LANDING_GOOGLE_SITE_VERIFICATION", "token-1")
        .args(["metadata", "--title", "Pricing"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"]["page"], "Pricing");
    assert_eq!(json["title"]["template"], "%s | Invoice Generator Pro");
    assert_eq!(json["metadata_base"], "https://invoices.example.org/");
    assert_eq!(json["verification"], "token-1");
    assert_eq!(json["robots"]["google_bot"]["max_image_preview"], "large");
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    landing_cmd()
        .env("RUST_LOG", "debug")
        .args(["render"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}
