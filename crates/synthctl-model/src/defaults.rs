//! Default sub-documents for each synthetic test variant.
//!
//! Each function builds a fresh map on every call. The defaults are
//! templates copied per builder construction; handing out a shared mutable
//! instance would let one builder's setters bleed into the next.

use crate::variant::SyntheticType;
use serde_json::{json, Map, Value};

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("variant defaults are object literals"),
    }
}

/// Top-level skeleton shared by every variant.
///
/// `testFrequency` defaults to 15 minutes; SSL certificate builders override
/// it to 1440 at construction. `configuration` starts with the fields common
/// to all variants and is then merged with the variant defaults.
pub fn base_test_config() -> Map<String, Value> {
    obj(json!({
        "label": "default-test-label",
        "description": "This is a Synthetic test",
        "active": true,
        "applicationId": null,
        "customProperties": {},
        "locations": [],
        "playbackMode": "Simultaneous",
        "testFrequency": 15,
        "configuration": {
            "markSyntheticCall": true,
            "retries": 0,
            "retryInterval": 1,
            "timeout": ""
        }
    }))
}

fn http_action() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "HTTPAction",
        "url": "",
        "operation": "GET",
        "headers": {},
        "body": "",
        "validationString": "",
        "followRedirect": true,
        "allowInsecure": true,
        "expectStatus": null,
        "expectJson": {},
        "expectMatch": "",
        "expectExists": null,
        "expectNotEmpty": null
    }))
}

fn http_script() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "HTTPScript",
        "script": "",
        "retries": 0,
        "retryInterval": 5,
        "scriptType": "Basic"
    }))
}

fn http_bundle() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "HTTPScript",
        "scripts": {
            "scriptFile": "index.js",
            "bundle": ""
        },
        "retries": 0,
        "retryInterval": 5,
        "scriptType": "Basic"
    }))
}

fn browser_script() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "BrowserScript",
        "script": "",
        "retries": 0,
        "retryInterval": 5,
        "scriptType": "Basic"
    }))
}

fn browser_bundle() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "BrowserScript",
        "scripts": {
            "scriptFile": "index.js",
            "bundle": ""
        },
        "browser": "firefox"
    }))
}

fn webpage_script() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "WebpageScript",
        "script": "",
        "browser": "chrome",
        "recordVideo": false
    }))
}

fn webpage_action() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "WebpageAction",
        "browser": "chrome",
        "recordVideo": false
    }))
}

fn ssl_certificate() -> Map<String, Value> {
    obj(json!({
        "syntheticType": "SSLCertificate",
        "hostname": ""
    }))
}

/// Variant default sub-document, keyed by the cross-product of variant
/// family and bundle flag. The bundle flag only changes the shape for
/// bundle-capable kinds.
pub fn variant_defaults(syn_type: SyntheticType, bundle: bool) -> Map<String, Value> {
    match (syn_type, bundle) {
        (SyntheticType::HttpAction, _) => http_action(),
        (SyntheticType::HttpScript, false) => http_script(),
        (SyntheticType::HttpScript, true) => http_bundle(),
        (SyntheticType::BrowserScript, false) => browser_script(),
        (SyntheticType::BrowserScript, true) => browser_bundle(),
        (SyntheticType::WebpageScript, _) => webpage_script(),
        (SyntheticType::WebpageAction, _) => webpage_action(),
        (SyntheticType::SslCertificate, _) => ssl_certificate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fresh_per_call() {
        let mut first = variant_defaults(SyntheticType::HttpAction, false);
        first.insert("url".into(), json!("https://mutated.example.com"));
        let second = variant_defaults(SyntheticType::HttpAction, false);
        assert_eq!(second["url"], json!(""));
    }

    #[test]
    fn bundle_flag_selects_scripts_shape() {
        let inline = variant_defaults(SyntheticType::HttpScript, false);
        assert!(inline.contains_key("script"));
        assert!(!inline.contains_key("scripts"));

        let bundled = variant_defaults(SyntheticType::HttpScript, true);
        assert!(!bundled.contains_key("script"));
        assert_eq!(bundled["scripts"]["scriptFile"], json!("index.js"));
        assert_eq!(bundled["scripts"]["bundle"], json!(""));
    }

    #[test]
    fn synthetic_type_mirrors_family() {
        for syn_type in SyntheticType::ALL {
            for bundle in [false, true] {
                let conf = variant_defaults(syn_type, bundle);
                assert_eq!(conf["syntheticType"], json!(syn_type.as_str()));
            }
        }
    }

    #[test]
    fn browser_bundle_defaults_to_firefox() {
        let conf = variant_defaults(SyntheticType::BrowserScript, true);
        assert_eq!(conf["browser"], json!("firefox"));
        let webpage = variant_defaults(SyntheticType::WebpageScript, false);
        assert_eq!(webpage["browser"], json!("chrome"));
    }
}
