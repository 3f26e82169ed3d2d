use crate::error::ModelError;
use serde_json::{json, Map, Value};

/// Map a severity keyword to its wire value: warning is 5, critical is 10.
/// Anything else is a hard failure.
fn severity_value(severity: &str) -> Result<i64, ModelError> {
    match severity.to_ascii_uppercase().as_str() {
        "WARNING" => Ok(5),
        "CRITICAL" => Ok(10),
        _ => Err(ModelError::InvalidSeverity),
    }
}

/// Builder for a smart-alert configuration document.
///
/// Finalize requires at least one synthetic test id and one alert channel.
/// The default tag filter expression matches nothing and is replaced
/// wholesale when set.
#[derive(Debug, Clone)]
pub struct AlertConfigBuilder {
    doc: Map<String, Value>,
}

impl Default for AlertConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertConfigBuilder {
    pub fn new() -> Self {
        let doc = json!({
            "name": "default-Synthetics-Smart-Alert",
            "description": "Synthetic test failed.",
            "severity": 5,
            "syntheticTestIds": [],
            // The only alertType the backend supports is "failure": the
            // status metric is boolean, so no threshold is needed.
            "rule": {
                "alertType": "failure",
            },
            "timeThreshold": {
                "type": "violationsInSequence",
                "violationsCount": 1
            },
            "alertChannelIds": [],
            "tagFilterExpression": {
                "type": "EXPRESSION",
                "logicalOperator": "AND",
                "elements": []
            }
        });
        match doc {
            Value::Object(doc) => Self { doc },
            _ => unreachable!(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        if !name.is_empty() {
            self.doc.insert("name".into(), json!(name));
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if !description.is_empty() {
            self.doc.insert("description".into(), json!(description));
        }
    }

    /// Only "warning" / "critical" (case-insensitive) are accepted.
    pub fn set_severity(&mut self, severity: &str) -> Result<(), ModelError> {
        let value = severity_value(severity)?;
        self.doc.insert("severity".into(), json!(value));
        Ok(())
    }

    /// Violations count outside [1, 12] is a hard failure, in contrast to
    /// the test builder's silently-ignored retry interval.
    pub fn set_violations_count(&mut self, violations_count: i64) -> Result<(), ModelError> {
        if !(1..=12).contains(&violations_count) {
            return Err(ModelError::ViolationsCountOutOfRange);
        }
        let threshold = self
            .doc
            .get_mut("timeThreshold")
            .and_then(Value::as_object_mut)
            .expect("timeThreshold object is part of the default document");
        threshold.insert("violationsCount".into(), json!(violations_count));
        Ok(())
    }

    pub fn set_synthetic_tests(&mut self, tests: &[String]) {
        if !tests.is_empty() {
            self.doc.insert("syntheticTestIds".into(), json!(tests));
        }
    }

    pub fn set_alert_channels(&mut self, channels: &[String]) {
        self.doc.insert("alertChannelIds".into(), json!(channels));
    }

    /// Replace the default match-nothing expression with an arbitrary
    /// filter tree.
    pub fn set_tag_filter_expression(
        &mut self,
        expression: Option<Value>,
    ) -> Result<(), ModelError> {
        let expression = expression.ok_or(ModelError::MissingTagFilterExpression)?;
        self.doc.insert("tagFilterExpression".into(), expression);
        Ok(())
    }

    /// Replace the whole document with a payload loaded from a JSON file.
    pub fn load_from_json_file(&mut self, path: &str) -> Result<(), ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::FileRead {
            path: path.to_string(),
            source,
        })?;
        match serde_json::from_str(&text)? {
            Value::Object(map) => {
                self.doc = map;
                Ok(())
            }
            _ => Err(ModelError::NotAnObject),
        }
    }

    pub fn to_value(&self) -> Result<Value, ModelError> {
        let no_tests = self
            .doc
            .get("syntheticTestIds")
            .and_then(Value::as_array)
            .is_none_or(|t| t.is_empty());
        if no_tests {
            return Err(ModelError::EmptySyntheticTests);
        }
        let no_channels = self
            .doc
            .get("alertChannelIds")
            .and_then(Value::as_array)
            .is_none_or(|c| c.is_empty());
        if no_channels {
            return Err(ModelError::EmptyAlertChannels);
        }
        Ok(Value::Object(self.doc.clone()))
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(self.to_value()?.to_string())
    }
}

/// Field-level updater for an alert payload fetched from the server.
///
/// Update semantics are stricter than the builder's: a missing or empty
/// value on an explicit update request is an error, not a keep-default.
#[derive(Debug, Clone)]
pub struct AlertUpdater {
    doc: Map<String, Value>,
}

impl AlertUpdater {
    pub fn new(payload: Value) -> Result<Self, ModelError> {
        match payload {
            Value::Object(doc) => Ok(Self { doc }),
            _ => Err(ModelError::NotAnObject),
        }
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        self.doc.insert("name".into(), json!(name));
        Ok(())
    }

    pub fn update_description(&mut self, description: &str) {
        if !description.is_empty() {
            self.doc.insert("description".into(), json!(description));
        }
    }

    pub fn update_severity(&mut self, severity: &str) -> Result<(), ModelError> {
        let value = severity_value(severity)?;
        self.doc.insert("severity".into(), json!(value));
        Ok(())
    }

    pub fn update_tests(&mut self, tests: &[String]) -> Result<(), ModelError> {
        if tests.is_empty() || tests.iter().any(|t| t.trim().is_empty()) {
            return Err(ModelError::EmptySyntheticTests);
        }
        self.doc.insert("syntheticTestIds".into(), json!(tests));
        Ok(())
    }

    pub fn update_alert_channels(&mut self, channels: &[String]) -> Result<(), ModelError> {
        if channels.is_empty() {
            return Err(ModelError::EmptyAlertChannels);
        }
        self.doc.insert("alertChannelIds".into(), json!(channels));
        Ok(())
    }

    pub fn update_violations_count(&mut self, violations_count: i64) -> Result<(), ModelError> {
        if !(1..=12).contains(&violations_count) {
            return Err(ModelError::ViolationsCountOutOfRange);
        }
        let threshold = self
            .doc
            .entry("timeThreshold")
            .or_insert_with(|| json!({"type": "violationsInSequence"}));
        if let Some(threshold) = threshold.as_object_mut() {
            threshold.insert("violationsCount".into(), json!(violations_count));
        }
        Ok(())
    }

    pub fn update_tag_filter_expression(
        &mut self,
        expression: Option<Value>,
    ) -> Result<(), ModelError> {
        let expression = expression.ok_or(ModelError::MissingTagFilterExpression)?;
        self.doc.insert("tagFilterExpression".into(), expression);
        Ok(())
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_builder() -> AlertConfigBuilder {
        let mut builder = AlertConfigBuilder::new();
        builder.set_synthetic_tests(&["test-1".to_string()]);
        builder.set_alert_channels(&["channel-1".to_string()]);
        builder
    }

    #[test]
    fn severity_mapping_is_deterministic() {
        let mut builder = ready_builder();
        builder.set_severity("warning").unwrap();
        assert_eq!(builder.to_value().unwrap()["severity"], json!(5));

        builder.set_severity("CRITICAL").unwrap();
        assert_eq!(builder.to_value().unwrap()["severity"], json!(10));

        assert!(matches!(
            builder.set_severity("info"),
            Err(ModelError::InvalidSeverity)
        ));
    }

    #[test]
    fn finalize_requires_tests_and_channels() {
        let builder = AlertConfigBuilder::new();
        assert!(matches!(
            builder.to_json(),
            Err(ModelError::EmptySyntheticTests)
        ));

        let mut builder = AlertConfigBuilder::new();
        builder.set_synthetic_tests(&["test-1".to_string()]);
        assert!(matches!(
            builder.to_json(),
            Err(ModelError::EmptyAlertChannels)
        ));

        assert!(ready_builder().to_json().is_ok());
    }

    #[test]
    fn violations_count_bounds_are_strict() {
        let mut builder = ready_builder();
        assert!(matches!(
            builder.set_violations_count(0),
            Err(ModelError::ViolationsCountOutOfRange)
        ));
        assert!(matches!(
            builder.set_violations_count(13),
            Err(ModelError::ViolationsCountOutOfRange)
        ));
        builder.set_violations_count(12).unwrap();
        assert_eq!(
            builder.to_value().unwrap()["timeThreshold"]["violationsCount"],
            json!(12)
        );
    }

    #[test]
    fn tag_filter_expression_replaces_default_wholesale() {
        let mut builder = ready_builder();
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["tagFilterExpression"]["elements"], json!([]));

        let expression = json!({
            "type": "EXPRESSION",
            "logicalOperator": "OR",
            "elements": [
                {"type": "TAG_FILTER", "name": "synthetic.locationId",
                 "stringValue": "loc-1", "operator": "EQUALS"}
            ]
        });
        builder
            .set_tag_filter_expression(Some(expression.clone()))
            .unwrap();
        assert_eq!(builder.to_value().unwrap()["tagFilterExpression"], expression);

        assert!(matches!(
            builder.set_tag_filter_expression(None),
            Err(ModelError::MissingTagFilterExpression)
        ));
    }

    #[test]
    fn rule_alert_type_is_fixed() {
        let doc = ready_builder().to_value().unwrap();
        assert_eq!(doc["rule"]["alertType"], json!("failure"));
        assert_eq!(doc["timeThreshold"]["type"], json!("violationsInSequence"));
    }

    #[test]
    fn updater_rejects_blank_test_ids() {
        let mut updater = AlertUpdater::new(ready_builder().to_value().unwrap()).unwrap();
        assert!(updater.update_tests(&["  ".to_string()]).is_err());
        updater.update_tests(&["test-2".to_string()]).unwrap();
        assert_eq!(updater.to_value()["syntheticTestIds"], json!(["test-2"]));
    }

    #[test]
    fn updater_severity_follows_builder_policy() {
        let mut updater = AlertUpdater::new(ready_builder().to_value().unwrap()).unwrap();
        updater.update_severity("critical").unwrap();
        assert_eq!(updater.to_value()["severity"], json!(10));
        assert!(matches!(
            updater.update_severity("page-me"),
            Err(ModelError::InvalidSeverity)
        ));
    }
}
