use crate::defaults::{base_test_config, variant_defaults};
use crate::error::ModelError;
use crate::merge;
use crate::variant::SyntheticType;
use serde_json::{json, Map, Value};
use tracing::warn;

/// HTTP methods accepted by `set_ping_operation`.
const VALID_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Builder for the synthetic test configuration document.
///
/// Created with a variant tag and a bundle flag, mutated field-by-field by
/// setters (order-independent), and consumed once via [`to_json`]. Each
/// setter enforces its own policy: strict fields return [`ModelError`],
/// permissive fields fall back to a default or ignore the input. The
/// document-level invariants (non-empty locations, non-empty script or
/// bundle) are checked at finalize time.
///
/// [`to_json`]: TestConfigBuilder::to_json
#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    syn_type: SyntheticType,
    bundle: bool,
    doc: Map<String, Value>,
}

impl TestConfigBuilder {
    /// Build the default document for the given variant.
    ///
    /// The variant defaults are merged into `configuration` wholesale, then
    /// `syntheticType` is set as the final step so it always mirrors the
    /// variant family regardless of what the merge left behind.
    pub fn new(syn_type: SyntheticType, bundle: bool) -> Self {
        let mut doc = base_test_config();
        let conf = doc
            .get_mut("configuration")
            .and_then(Value::as_object_mut)
            .expect("base document always has a configuration object");
        merge::merge(conf, variant_defaults(syn_type, bundle));
        conf.insert("syntheticType".into(), json!(syn_type.as_str()));

        if syn_type == SyntheticType::SslCertificate {
            doc.insert("testFrequency".into(), json!(1440));
        }

        Self {
            syn_type,
            bundle,
            doc,
        }
    }

    pub fn synthetic_type(&self) -> SyntheticType {
        self.syn_type
    }

    pub fn is_bundle(&self) -> bool {
        self.bundle
    }

    fn configuration_mut(&mut self) -> &mut Map<String, Value> {
        self.doc
            .get_mut("configuration")
            .and_then(Value::as_object_mut)
            .expect("configuration object is never removed")
    }

    /// Empty labels are ignored, keeping the default.
    pub fn set_label(&mut self, label: &str) {
        if !label.is_empty() {
            self.doc.insert("label".into(), json!(label));
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if !description.is_empty() {
            self.doc.insert("description".into(), json!(description));
        }
    }

    pub fn set_locations(&mut self, locations: &[String]) {
        if !locations.is_empty() {
            self.doc.insert("locations".into(), json!(locations));
        }
    }

    pub fn set_applications(&mut self, applications: &[String]) {
        if !applications.is_empty() {
            self.doc.insert("applications".into(), json!(applications));
        }
    }

    pub fn set_websites(&mut self, websites: &[String]) {
        if !websites.is_empty() {
            self.doc.insert("websites".into(), json!(websites));
        }
    }

    pub fn set_mobile_apps(&mut self, mobile_apps: &[String]) {
        if !mobile_apps.is_empty() {
            self.doc.insert("mobileApps".into(), json!(mobile_apps));
        }
    }

    pub fn set_custom_properties(&mut self, custom_properties: Map<String, Value>) {
        self.doc
            .insert("customProperties".into(), Value::Object(custom_properties));
    }

    /// Out-of-range frequencies silently reset to the variant default
    /// (15 minutes, or 1440 for SSL certificate tests). Permissive on
    /// purpose: the CLI proceeds with the default rather than aborting.
    pub fn set_frequency(&mut self, frequency: u32) {
        let accepted = if frequency > 0 && frequency <= self.syn_type.max_frequency() {
            frequency
        } else {
            self.syn_type.default_frequency()
        };
        self.doc.insert("testFrequency".into(), json!(accepted));
    }

    /// Retries outside [0, 2] are a hard failure, unlike the retry interval.
    pub fn set_retries(&mut self, retries: i64) -> Result<(), ModelError> {
        if !(0..=2).contains(&retries) {
            return Err(ModelError::RetryOutOfRange);
        }
        self.configuration_mut().insert("retries".into(), json!(retries));
        Ok(())
    }

    /// `None` defaults to 1; values outside (0, 10) keep the prior value.
    pub fn set_retry_interval(&mut self, interval: Option<i64>) {
        let interval = interval.unwrap_or(1);
        if interval > 0 && interval < 10 {
            self.configuration_mut()
                .insert("retryInterval".into(), json!(interval));
        }
    }

    /// `<number>(ms|s|m)`, passed through verbatim.
    pub fn set_timeout(&mut self, timeout: &str) {
        self.configuration_mut().insert("timeout".into(), json!(timeout));
    }

    /// Only the literal strings "true"/"false" (case-insensitive) are
    /// recognized; anything else is a no-op.
    pub fn set_follow_redirect(&mut self, follow_redirect: &str) {
        match follow_redirect.to_ascii_lowercase().as_str() {
            "true" => {
                self.configuration_mut()
                    .insert("followRedirect".into(), json!(true));
            }
            "false" => {
                self.configuration_mut()
                    .insert("followRedirect".into(), json!(false));
            }
            _ => {}
        }
    }

    /// `None` clears to null, non-positive values reset to 200.
    pub fn set_expect_status(&mut self, expect_status: Option<i64>) {
        let value = match expect_status {
            None => Value::Null,
            Some(n) if n > 0 => json!(n),
            Some(_) => json!(200),
        };
        self.configuration_mut().insert("expectStatus".into(), value);
    }

    pub fn set_expect_json(&mut self, expect_json: Map<String, Value>) {
        if !expect_json.is_empty() {
            self.configuration_mut()
                .insert("expectJson".into(), Value::Object(expect_json));
        }
    }

    pub fn set_expect_match(&mut self, expect_match: &str) {
        if !expect_match.is_empty() {
            self.configuration_mut()
                .insert("expectMatch".into(), json!(expect_match));
        }
    }

    pub fn set_expect_exists(&mut self, expect_exists: &[String]) {
        if !expect_exists.is_empty() {
            self.configuration_mut()
                .insert("expectExists".into(), json!(expect_exists));
        }
    }

    pub fn set_expect_not_empty(&mut self, expect_not_empty: &[String]) {
        if !expect_not_empty.is_empty() {
            self.configuration_mut()
                .insert("expectNotEmpty".into(), json!(expect_not_empty));
        }
    }

    pub fn set_validation_string(&mut self, validation_string: &str) {
        if !validation_string.is_empty() {
            self.configuration_mut()
                .insert("validationString".into(), json!(validation_string));
        }
    }

    /// `None` means allow; unrecognized strings are ignored.
    pub fn set_allow_insecure(&mut self, allow_insecure: Option<&str>) {
        match allow_insecure {
            None => {
                self.configuration_mut()
                    .insert("allowInsecure".into(), json!(true));
            }
            Some("true") => {
                self.configuration_mut()
                    .insert("allowInsecure".into(), json!(true));
            }
            Some("false") => {
                self.configuration_mut()
                    .insert("allowInsecure".into(), json!(false));
            }
            Some(_) => {}
        }
    }

    /// URL for ping-style tests; only HTTPAction and WebpageAction carry it.
    pub fn set_ping_url(&mut self, url: &str) {
        if self.syn_type.is_action_kind() && !url.is_empty() {
            self.configuration_mut().insert("url".into(), json!(url));
        }
    }

    /// HTTP method, normalized to upper case. Invalid methods are logged
    /// and dropped rather than failing the command.
    pub fn set_ping_operation(&mut self, method: &str) {
        let upper = method.to_ascii_uppercase();
        if VALID_METHODS.contains(&upper.as_str()) {
            self.configuration_mut().insert("operation".into(), json!(upper));
        } else {
            warn!(method, "HTTP method is not allowed, keeping default");
        }
    }

    pub fn set_ping_headers(&mut self, headers: Map<String, Value>) {
        self.configuration_mut()
            .insert("headers".into(), Value::Object(headers));
    }

    pub fn set_ping_body(&mut self, body: &str) {
        if !body.is_empty() {
            self.configuration_mut().insert("body".into(), json!(body));
        }
    }

    /// Inline script text. A missing script is a hard failure; an empty
    /// string or non-script variant leaves the document unchanged.
    pub fn set_api_script_script(&mut self, script: Option<&str>) -> Result<(), ModelError> {
        let script = script.ok_or(ModelError::MissingScriptContent)?;
        if self.syn_type.is_script_kind() && !script.is_empty() {
            self.configuration_mut().insert("script".into(), json!(script));
        }
        Ok(())
    }

    /// Bundle content (base64) and entry file, populated atomically.
    /// Applies only to bundle builders of bundle-capable kinds.
    pub fn set_api_bundle_script(
        &mut self,
        content: Option<&str>,
        script_file: &str,
    ) -> Result<(), ModelError> {
        let content = content.ok_or(ModelError::MissingBundleContent)?;
        if self.bundle && self.syn_type.is_bundle_capable() {
            self.configuration_mut().insert(
                "scripts".into(),
                json!({
                    "bundle": content,
                    "scriptFile": script_file,
                }),
            );
        }
        Ok(())
    }

    pub fn set_browser_type(&mut self, browser: &str) {
        if !browser.is_empty() {
            self.configuration_mut().insert("browser".into(), json!(browser));
        }
    }

    pub fn set_record_video(&mut self, record_video: Option<bool>) {
        if let Some(record) = record_video {
            self.configuration_mut()
                .insert("recordVideo".into(), json!(record));
        }
    }

    /// SSL certificate check: hostname under test.
    pub fn set_host(&mut self, hostname: Option<&str>) {
        if let Some(hostname) = hostname {
            self.configuration_mut()
                .insert("hostname".into(), json!(hostname));
        }
    }

    pub fn set_port(&mut self, port: Option<u16>) {
        if let Some(port) = port {
            self.configuration_mut().insert("port".into(), json!(port));
        }
    }

    pub fn set_remaining_days(&mut self, remaining_days: Option<u32>) {
        if let Some(days) = remaining_days {
            self.configuration_mut()
                .insert("daysRemainingCheck".into(), json!(days));
        }
    }

    /// Replace the whole document with a payload loaded from a JSON file.
    pub fn load_from_json_file(&mut self, path: &str) -> Result<(), ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::FileRead {
            path: path.to_string(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text)?;
        match value {
            Value::Object(map) => {
                self.doc = map;
                Ok(())
            }
            _ => Err(ModelError::NotAnObject),
        }
    }

    fn ensure_script_not_empty(&self) -> Result<(), ModelError> {
        let conf = self.doc.get("configuration").and_then(Value::as_object);
        if let Some(conf) = conf {
            if let Some(script) = conf.get("script") {
                if script.is_null() || script.as_str() == Some("") {
                    return Err(ModelError::EmptyScript);
                }
            }
            if let Some(scripts) = conf.get("scripts") {
                let bundle = scripts.get("bundle");
                if bundle.is_none()
                    || bundle.is_some_and(|b| b.is_null() || b.as_str() == Some(""))
                {
                    return Err(ModelError::EmptyBundleScript);
                }
            }
        }
        Ok(())
    }

    /// Validate and return the document as a `Value`.
    pub fn to_value(&self) -> Result<Value, ModelError> {
        let empty_locations = self
            .doc
            .get("locations")
            .and_then(Value::as_array)
            .is_none_or(|l| l.is_empty());
        if empty_locations {
            return Err(ModelError::EmptyLocations);
        }
        self.ensure_script_not_empty()?;
        Ok(Value::Object(self.doc.clone()))
    }

    /// Finalize: enforce the document invariants and serialize.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(self.to_value()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_location(mut builder: TestConfigBuilder) -> TestConfigBuilder {
        builder.set_locations(&["loc-1".to_string()]);
        builder
    }

    #[test]
    fn finalize_fails_without_locations_for_every_variant() {
        for syn_type in SyntheticType::ALL {
            for bundle in [false, true] {
                let builder = TestConfigBuilder::new(syn_type, bundle);
                assert!(
                    matches!(builder.to_json(), Err(ModelError::EmptyLocations)),
                    "{syn_type} bundle={bundle} must fail without locations"
                );
            }
        }
    }

    #[test]
    fn http_action_frequency_in_range_is_kept() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_frequency(5);
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["testFrequency"], json!(5));
    }

    #[test]
    fn http_action_frequency_out_of_range_resets_to_default() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_frequency(500);
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["testFrequency"], json!(15));
    }

    #[test]
    fn ssl_frequency_bounds() {
        let mut builder =
            with_location(TestConfigBuilder::new(SyntheticType::SslCertificate, false));
        builder.set_frequency(2000);
        assert_eq!(builder.to_value().unwrap()["testFrequency"], json!(1440));

        builder.set_frequency(30);
        assert_eq!(builder.to_value().unwrap()["testFrequency"], json!(30));
    }

    #[test]
    fn ssl_builder_defaults_to_1440() {
        let builder = with_location(TestConfigBuilder::new(SyntheticType::SslCertificate, false));
        assert_eq!(builder.to_value().unwrap()["testFrequency"], json!(1440));
    }

    #[test]
    fn retries_validation_is_strict() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        assert!(matches!(
            builder.set_retries(3),
            Err(ModelError::RetryOutOfRange)
        ));
        assert!(builder.set_retries(2).is_ok());
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["configuration"]["retries"], json!(2));
    }

    #[test]
    fn retry_interval_is_permissive() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_retry_interval(Some(12));
        let doc = builder.to_value().unwrap();
        // Out of range: prior value (the default) is retained.
        assert_eq!(doc["configuration"]["retryInterval"], json!(1));

        builder.set_retry_interval(Some(7));
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["retryInterval"],
            json!(7)
        );

        builder.set_retry_interval(None);
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["retryInterval"],
            json!(1)
        );
    }

    #[test]
    fn follow_redirect_accepts_only_boolean_literals() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_follow_redirect("FALSE");
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["followRedirect"],
            json!(false)
        );
        builder.set_follow_redirect("yes");
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["followRedirect"],
            json!(false)
        );
        builder.set_follow_redirect("true");
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["followRedirect"],
            json!(true)
        );
    }

    #[test]
    fn expect_status_policies() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_expect_status(Some(404));
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["expectStatus"],
            json!(404)
        );
        builder.set_expect_status(Some(0));
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["expectStatus"],
            json!(200)
        );
        builder.set_expect_status(None);
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["expectStatus"],
            Value::Null
        );
    }

    #[test]
    fn ping_fields_only_apply_to_action_kinds() {
        let mut script = with_location(TestConfigBuilder::new(SyntheticType::HttpScript, false));
        script.set_ping_url("https://example.com");
        script.set_api_script_script(Some("$http.get('...')")).unwrap();
        let doc = script.to_value().unwrap();
        assert!(doc["configuration"].get("url").is_none());

        let mut action = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        action.set_ping_url("https://example.com");
        assert_eq!(
            action.to_value().unwrap()["configuration"]["url"],
            json!("https://example.com")
        );
    }

    #[test]
    fn invalid_http_method_is_dropped() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_ping_operation("FETCH");
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["operation"],
            json!("GET")
        );
        builder.set_ping_operation("post");
        assert_eq!(
            builder.to_value().unwrap()["configuration"]["operation"],
            json!("POST")
        );
    }

    #[test]
    fn bundle_script_finalize_round_trip() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpScript, true));
        builder
            .set_api_bundle_script(Some("UEsDBBQACAg="), "index.js")
            .unwrap();
        let doc = builder.to_value().unwrap();
        assert_eq!(
            doc["configuration"]["scripts"],
            json!({"bundle": "UEsDBBQACAg=", "scriptFile": "index.js"})
        );
        assert!(doc["configuration"].get("script").is_none());
    }

    #[test]
    fn empty_inline_script_is_a_hard_failure() {
        let builder = with_location(TestConfigBuilder::new(SyntheticType::HttpScript, false));
        assert!(matches!(builder.to_json(), Err(ModelError::EmptyScript)));
    }

    #[test]
    fn empty_bundle_is_a_hard_failure() {
        let builder = with_location(TestConfigBuilder::new(SyntheticType::BrowserScript, true));
        assert!(matches!(
            builder.to_json(),
            Err(ModelError::EmptyBundleScript)
        ));
    }

    #[test]
    fn missing_script_content_fails_closed() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpScript, false));
        assert!(matches!(
            builder.set_api_script_script(None),
            Err(ModelError::MissingScriptContent)
        ));
    }

    #[test]
    fn empty_label_keeps_default() {
        let mut builder = with_location(TestConfigBuilder::new(SyntheticType::HttpAction, false));
        builder.set_label("");
        assert_eq!(
            builder.to_value().unwrap()["label"],
            json!("default-test-label")
        );
        builder.set_label("simple-ping");
        assert_eq!(builder.to_value().unwrap()["label"], json!("simple-ping"));
    }

    #[test]
    fn synthetic_type_set_last_overrides_merge() {
        let builder = TestConfigBuilder::new(SyntheticType::WebpageAction, false);
        // SSL defaults reuse another family's sub-document shape in parts;
        // the constructor always pins syntheticType to the requested family.
        let conf = &builder.doc["configuration"];
        assert_eq!(conf["syntheticType"], json!("WebpageAction"));
    }

    #[test]
    fn ssl_fields_apply_unconditionally_once_set() {
        let mut builder =
            with_location(TestConfigBuilder::new(SyntheticType::SslCertificate, false));
        builder.set_host(Some("example.com"));
        builder.set_port(Some(443));
        builder.set_remaining_days(Some(30));
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["configuration"]["hostname"], json!("example.com"));
        assert_eq!(doc["configuration"]["port"], json!(443));
        assert_eq!(doc["configuration"]["daysRemainingCheck"], json!(30));
    }
}
