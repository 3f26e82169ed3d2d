use crate::error::ModelError;
use serde_json::{json, Map, Value};

/// Builder for the credential document.
///
/// Same create / mutate / finalize shape as the test builder, with two
/// required fields: finalize fails while either the name or the value is
/// empty.
#[derive(Debug, Clone)]
pub struct CredentialConfigBuilder {
    doc: Map<String, Value>,
}

impl Default for CredentialConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialConfigBuilder {
    pub fn new() -> Self {
        let doc = json!({
            "credentialName": "",
            "credentialValue": ""
        });
        match doc {
            Value::Object(doc) => Self { doc },
            _ => unreachable!(),
        }
    }

    pub fn set_credential_name(&mut self, name: &str) {
        self.doc.insert("credentialName".into(), json!(name));
    }

    pub fn set_credential_value(&mut self, value: &str) {
        self.doc.insert("credentialValue".into(), json!(value));
    }

    pub fn set_applications(&mut self, applications: &[String]) {
        self.doc.insert("applications".into(), json!(applications));
    }

    pub fn set_websites(&mut self, websites: &[String]) {
        self.doc.insert("websites".into(), json!(websites));
    }

    pub fn set_mobile_apps(&mut self, mobile_apps: &[String]) {
        self.doc.insert("mobileApps".into(), json!(mobile_apps));
    }

    pub fn credential_name(&self) -> &str {
        self.doc
            .get("credentialName")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn to_value(&self) -> Result<Value, ModelError> {
        if self.credential_name().is_empty() {
            return Err(ModelError::EmptyCredentialName);
        }
        let value_empty = self
            .doc
            .get("credentialValue")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty);
        if value_empty {
            return Err(ModelError::EmptyCredentialValue);
        }
        Ok(Value::Object(self.doc.clone()))
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(self.to_value()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_requires_name_and_value() {
        let mut builder = CredentialConfigBuilder::new();
        assert!(matches!(
            builder.to_json(),
            Err(ModelError::EmptyCredentialName)
        ));

        builder.set_credential_name("API_KEY");
        assert!(matches!(
            builder.to_json(),
            Err(ModelError::EmptyCredentialValue)
        ));

        builder.set_credential_value("s3cret");
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["credentialName"], json!("API_KEY"));
        assert_eq!(doc["credentialValue"], json!("s3cret"));
    }

    #[test]
    fn association_lists_are_optional() {
        let mut builder = CredentialConfigBuilder::new();
        builder.set_credential_name("API_KEY");
        builder.set_credential_value("s3cret");
        let doc = builder.to_value().unwrap();
        assert!(doc.get("applications").is_none());

        builder.set_applications(&["app-1".to_string()]);
        builder.set_websites(&["web-1".to_string()]);
        let doc = builder.to_value().unwrap();
        assert_eq!(doc["applications"], json!(["app-1"]));
        assert_eq!(doc["websites"], json!(["web-1"]));
    }
}
