use crate::bundle;
use crate::error::ModelError;
use crate::variant::SyntheticType;
use serde_json::{json, Map, Value};

/// Field-level updater for a test payload fetched from the server.
///
/// Unlike [`TestConfigBuilder`](crate::TestConfigBuilder), where several
/// fields silently fall back to defaults, an explicit update request with an
/// out-of-range value is always a hard failure: the user asked for a change
/// and did not get it.
#[derive(Debug, Clone)]
pub struct TestUpdater {
    doc: Map<String, Value>,
}

impl TestUpdater {
    /// Wrap a payload previously fetched from the server.
    pub fn new(payload: Value) -> Result<Self, ModelError> {
        match payload {
            Value::Object(doc) => Ok(Self { doc }),
            _ => Err(ModelError::NotAnObject),
        }
    }

    /// Variant family recorded in the payload, if recognizable.
    pub fn synthetic_type(&self) -> Option<SyntheticType> {
        self.doc
            .get("configuration")
            .and_then(|c| c.get("syntheticType"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    fn configuration_mut(&mut self) -> &mut Map<String, Value> {
        self.doc
            .entry("configuration")
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .expect("configuration entry is an object")
    }

    pub fn update_label(&mut self, label: &str) -> Result<(), ModelError> {
        if label.is_empty() {
            return Err(ModelError::InvalidValue("no label".into()));
        }
        self.doc.insert("label".into(), json!(label));
        Ok(())
    }

    pub fn update_description(&mut self, description: &str) -> Result<(), ModelError> {
        if description.is_empty() {
            return Err(ModelError::InvalidValue("no description".into()));
        }
        self.doc.insert("description".into(), json!(description));
        Ok(())
    }

    pub fn update_active(&mut self, active: bool) {
        self.doc.insert("active".into(), json!(active));
    }

    /// [1,120] for every variant except SSL certificate tests, which allow
    /// up to 1440. Out of range is a hard failure here.
    pub fn update_frequency(&mut self, frequency: u32) -> Result<(), ModelError> {
        let is_ssl = self.synthetic_type() == Some(SyntheticType::SslCertificate);
        if (1..=120).contains(&frequency) || (is_ssl && (1..=1440).contains(&frequency)) {
            self.doc.insert("testFrequency".into(), json!(frequency));
            Ok(())
        } else if is_ssl {
            Err(ModelError::InvalidValue(
                "frequency is not valid, it should be in [1,1440]".into(),
            ))
        } else {
            Err(ModelError::InvalidValue(
                "frequency is not valid, it should be in [1,120]".into(),
            ))
        }
    }

    pub fn update_locations(&mut self, locations: &[String]) -> Result<(), ModelError> {
        if locations.is_empty() {
            return Err(ModelError::EmptyLocations);
        }
        self.doc.insert("locations".into(), json!(locations));
        Ok(())
    }

    pub fn update_timeout(&mut self, timeout: &str) -> Result<(), ModelError> {
        if timeout.is_empty() {
            return Err(ModelError::InvalidValue("timeout should not be empty".into()));
        }
        self.configuration_mut().insert("timeout".into(), json!(timeout));
        Ok(())
    }

    pub fn update_retries(&mut self, retries: i64) -> Result<(), ModelError> {
        if !(0..=2).contains(&retries) {
            return Err(ModelError::RetryOutOfRange);
        }
        self.configuration_mut().insert("retries".into(), json!(retries));
        Ok(())
    }

    /// Strict on update, in contrast to the builder's silent ignore.
    pub fn update_retry_interval(&mut self, interval: i64) -> Result<(), ModelError> {
        if !(1..=10).contains(&interval) {
            return Err(ModelError::InvalidValue(
                "retryInterval should be in [1,10]".into(),
            ));
        }
        self.configuration_mut()
            .insert("retryInterval".into(), json!(interval));
        Ok(())
    }

    pub fn update_operation(&mut self, method: &str) -> Result<(), ModelError> {
        let upper = method.to_ascii_uppercase();
        let valid = [
            "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
        ];
        if !valid.contains(&upper.as_str()) {
            return Err(ModelError::InvalidValue(format!("{method} is not allowed")));
        }
        self.configuration_mut().insert("operation".into(), json!(upper));
        Ok(())
    }

    pub fn update_mark_synthetic_call(&mut self, mark: bool) {
        self.configuration_mut()
            .insert("markSyntheticCall".into(), json!(mark));
    }

    pub fn update_url(&mut self, url: &str) -> Result<(), ModelError> {
        if url.is_empty() {
            return Err(ModelError::InvalidValue("url should not be empty".into()));
        }
        self.configuration_mut().insert("url".into(), json!(url));
        Ok(())
    }

    pub fn update_applications(&mut self, applications: &[String]) {
        if !applications.is_empty() {
            self.doc.insert("applications".into(), json!(applications));
        }
    }

    pub fn update_websites(&mut self, websites: &[String]) {
        if !websites.is_empty() {
            self.doc.insert("websites".into(), json!(websites));
        }
    }

    pub fn update_mobile_apps(&mut self, mobile_apps: &[String]) {
        if !mobile_apps.is_empty() {
            self.doc.insert("mobileApps".into(), json!(mobile_apps));
        }
    }

    pub fn update_follow_redirect(&mut self, follow_redirect: bool) {
        self.configuration_mut()
            .insert("followRedirect".into(), json!(follow_redirect));
    }

    pub fn update_allow_insecure(&mut self, allow_insecure: bool) {
        self.configuration_mut()
            .insert("allowInsecure".into(), json!(allow_insecure));
    }

    /// Replace the script with the contents of a local file.
    pub fn update_script_from_file(&mut self, path: &str) -> Result<(), ModelError> {
        let script = bundle::read_script_file(path)?;
        self.configuration_mut().insert("script".into(), json!(script));
        Ok(())
    }

    /// Replace the bundle: a `.zip` path is read and base64-encoded,
    /// anything else is assumed to be base64 text already.
    pub fn update_bundle(&mut self, bundle_arg: &str) -> Result<(), ModelError> {
        let encoded = if bundle::is_zip_file(bundle_arg) {
            bundle::read_zip_file_to_base64(bundle_arg)?
        } else {
            bundle_arg.to_string()
        };
        let scripts = self
            .configuration_mut()
            .entry("scripts")
            .or_insert_with(|| json!({}));
        if let Some(scripts) = scripts.as_object_mut() {
            scripts.insert("bundle".into(), json!(encoded));
        }
        Ok(())
    }

    pub fn update_bundle_entry_file(&mut self, entry_file: &str) -> Result<(), ModelError> {
        if entry_file.is_empty() {
            return Err(ModelError::InvalidValue(
                "script file should not be empty".into(),
            ));
        }
        let scripts = self
            .configuration_mut()
            .entry("scripts")
            .or_insert_with(|| json!({}));
        if let Some(scripts) = scripts.as_object_mut() {
            scripts.insert("scriptFile".into(), json!(entry_file));
        }
        Ok(())
    }

    pub fn update_expect_status(&mut self, expect_status: i64) {
        self.configuration_mut()
            .insert("expectStatus".into(), json!(expect_status));
    }

    pub fn update_expect_json(&mut self, expect_json: &str) -> Result<(), ModelError> {
        let value: Value = serde_json::from_str(expect_json)?;
        self.configuration_mut().insert("expectJson".into(), value);
        Ok(())
    }

    pub fn update_expect_match(&mut self, expect_match: &str) {
        self.configuration_mut()
            .insert("expectMatch".into(), json!(expect_match));
    }

    pub fn update_expect_exists(&mut self, expect_exists: &str) -> Result<(), ModelError> {
        let value: Value = serde_json::from_str(expect_exists)?;
        self.configuration_mut().insert("expectExists".into(), value);
        Ok(())
    }

    pub fn update_expect_not_empty(&mut self, expect_not_empty: &str) -> Result<(), ModelError> {
        let value: Value = serde_json::from_str(expect_not_empty)?;
        self.configuration_mut()
            .insert("expectNotEmpty".into(), value);
        Ok(())
    }

    pub fn update_validation_string(&mut self, validation_string: &str) -> Result<(), ModelError> {
        if validation_string.is_empty() {
            return Err(ModelError::InvalidValue(
                "validation string should not be empty".into(),
            ));
        }
        self.configuration_mut()
            .insert("validationString".into(), json!(validation_string));
        Ok(())
    }

    /// Merge `key=value` pairs into the existing custom properties.
    pub fn update_custom_properties(
        &mut self,
        properties: &[(String, String)],
    ) -> Result<(), ModelError> {
        for (key, value) in properties {
            if key.is_empty() || value.is_empty() {
                return Err(ModelError::InvalidValue(
                    "custom property should be <key>=<value>".into(),
                ));
            }
        }
        let map = self
            .doc
            .entry("customProperties")
            .or_insert_with(|| json!({}));
        if let Some(map) = map.as_object_mut() {
            for (key, value) in properties {
                map.insert(key.clone(), json!(value));
            }
        }
        Ok(())
    }

    /// Merge `header=value` pairs into the existing headers.
    pub fn update_headers(&mut self, headers: &[(String, String)]) -> Result<(), ModelError> {
        for (key, value) in headers {
            if key.is_empty() || value.is_empty() {
                return Err(ModelError::InvalidValue(
                    "headers should be <header>=<value>".into(),
                ));
            }
        }
        let map = self
            .configuration_mut()
            .entry("headers")
            .or_insert_with(|| json!({}));
        if let Some(map) = map.as_object_mut() {
            for (key, value) in headers {
                map.insert(key.clone(), json!(value));
            }
        }
        Ok(())
    }

    pub fn update_body(&mut self, body: &str) -> Result<(), ModelError> {
        if body.is_empty() {
            return Err(ModelError::InvalidValue("no body".into()));
        }
        self.configuration_mut().insert("body".into(), json!(body));
        Ok(())
    }

    pub fn update_browser(&mut self, browser: &str) -> Result<(), ModelError> {
        if !browser.eq_ignore_ascii_case("chrome") && !browser.eq_ignore_ascii_case("firefox") {
            return Err(ModelError::InvalidValue(
                "browser should be chrome or firefox".into(),
            ));
        }
        self.configuration_mut()
            .insert("browser".into(), json!(browser.to_ascii_lowercase()));
        Ok(())
    }

    pub fn update_record_video(&mut self, record_video: bool) {
        self.configuration_mut()
            .insert("recordVideo".into(), json!(record_video));
    }

    pub fn update_host(&mut self, hostname: &str) {
        self.configuration_mut()
            .insert("hostname".into(), json!(hostname));
    }

    pub fn update_port(&mut self, port: u16) {
        self.configuration_mut().insert("port".into(), json!(port));
    }

    pub fn update_remaining_days(&mut self, days: u32) {
        self.configuration_mut()
            .insert("daysRemainingCheck".into(), json!(days));
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
