//! Lead records, enrichment content and export rows
//!
//! A lead is stored as a JSON object. The pipeline reads a handful of
//! fields and otherwise treats the document as opaque: when the record is
//! rewritten only the root-level `exported` flag changes.

use crate::domain::{LeadexError, Result};
use serde_json::{Map, Value};

/// Root-level flag that makes an export decision durable
pub const EXPORTED_FIELD: &str = "exported";

/// Value of `emailStatus` that makes a lead eligible for export
pub const VALID_EMAIL_STATUS: &str = "valid";

const LEAD_DATA_FIELD: &str = "leadData";
const EMAIL_DATA_FIELD: &str = "emailData";

/// A primary lead record as fetched from the store
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    key: String,
    document: Map<String, Value>,
}

impl LeadRecord {
    /// Parse a raw store value
    ///
    /// # Errors
    ///
    /// Returns `LeadexError::Serialization` if the value is not JSON or is
    /// JSON but not an object.
    pub fn parse(key: impl Into<String>, raw: &str) -> Result<Self> {
        let key = key.into();
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(document) => Ok(Self { key, document }),
            other => Err(LeadexError::Serialization(format!(
                "record {key} is not a JSON object (found {})",
                json_type_name(&other)
            ))),
        }
    }

    /// Store key of this record
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the root-level `exported` flag is literally `true`
    pub fn is_exported(&self) -> bool {
        matches!(self.document.get(EXPORTED_FIELD), Some(Value::Bool(true)))
    }

    pub fn email_status(&self) -> &str {
        self.lead_field("emailStatus")
    }

    pub fn email(&self) -> &str {
        self.lead_field("email")
    }

    pub fn first_name(&self) -> &str {
        self.lead_field("firstName")
    }

    pub fn last_name(&self) -> &str {
        self.lead_field("lastName")
    }

    pub fn company_name(&self) -> &str {
        self.lead_field("companyName")
    }

    /// Set `exported = true`, leaving every other field untouched
    ///
    /// Never clears the flag.
    pub fn mark_exported(&mut self) {
        self.document
            .insert(EXPORTED_FIELD.to_string(), Value::Bool(true));
    }

    /// Serialize the full document for writing back to the store
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }

    /// Lead fields live under `leadData` when the ingestion process wrote
    /// one, otherwise at the root.
    fn lead_data(&self) -> &Map<String, Value> {
        match self.document.get(LEAD_DATA_FIELD) {
            Some(Value::Object(lead_data)) => lead_data,
            _ => &self.document,
        }
    }

    fn lead_field(&self, name: &str) -> &str {
        self.lead_data()
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Optional generated content attached to an exported lead
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentContent {
    pub subject: String,
    pub body: String,
}

impl EnrichmentContent {
    /// Parse an enrichment record value
    ///
    /// Fields are read from `emailData` when present, otherwise from the root.
    /// Missing or non-string fields are empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let root = value.as_object().ok_or_else(|| {
            LeadexError::Serialization(format!(
                "enrichment record is not a JSON object (found {})",
                json_type_name(&value)
            ))
        })?;
        let fields = match root.get(EMAIL_DATA_FIELD) {
            Some(Value::Object(email_data)) => email_data,
            _ => root,
        };
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self {
            subject: text("subject"),
            body: text("body"),
        })
    }

    /// Both subject and body are present
    pub fn is_complete(&self) -> bool {
        !self.subject.is_empty() && !self.body.is_empty()
    }
}

/// Column layout of the export file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// `firstName,lastName,companyName,email`
    Basic,
    /// Basic columns followed by `subject,body`
    WithContent,
}

impl RowLayout {
    pub fn for_enrichment(enabled: bool) -> Self {
        if enabled {
            RowLayout::WithContent
        } else {
            RowLayout::Basic
        }
    }

    /// Header row, written once when the sink is opened
    pub fn header(self) -> &'static [&'static str] {
        match self {
            RowLayout::Basic => &["firstName", "lastName", "companyName", "email"],
            RowLayout::WithContent => &[
                "firstName",
                "lastName",
                "companyName",
                "email",
                "subject",
                "body",
            ],
        }
    }
}

/// Flattened projection of a lead written to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub email: String,
    pub content: EnrichmentContent,
}

impl ExportRow {
    /// Project a record and its (possibly empty) enrichment into a row
    pub fn from_record(record: &LeadRecord, content: EnrichmentContent) -> Self {
        Self {
            first_name: record.first_name().to_string(),
            last_name: record.last_name().to_string(),
            company_name: record.company_name().to_string(),
            email: record.email().to_string(),
            content,
        }
    }

    /// Column values in header order for the given layout
    pub fn fields(&self, layout: RowLayout) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.company_name.as_str(),
            self.email.as_str(),
        ];
        if layout == RowLayout::WithContent {
            fields.push(self.content.subject.as_str());
            fields.push(self.content.body.as_str());
        }
        fields
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_lead_data() {
        let record = LeadRecord::parse(
            "lead_a",
            r#"{"leadData":{"emailStatus":"valid","email":"a@x.com","firstName":"Ada"},"exported":false}"#,
        )
        .unwrap();

        assert_eq!(record.key(), "lead_a");
        assert_eq!(record.email_status(), "valid");
        assert_eq!(record.email(), "a@x.com");
        assert_eq!(record.first_name(), "Ada");
        assert_eq!(record.last_name(), "");
        assert!(!record.is_exported());
    }

    #[test]
    fn test_parse_flat_record() {
        let record =
            LeadRecord::parse("lead_b", r#"{"emailStatus":"valid","email":"b@x.com"}"#).unwrap();
        assert_eq!(record.email(), "b@x.com");
        assert_eq!(record.email_status(), "valid");
    }

    #[test]
    fn test_exported_flag_must_be_boolean_true() {
        let record = LeadRecord::parse("lead_c", r#"{"exported":"true"}"#).unwrap();
        assert!(!record.is_exported());

        let record = LeadRecord::parse("lead_c", r#"{"exported":true}"#).unwrap();
        assert!(record.is_exported());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(LeadRecord::parse("lead_d", "not json").is_err());
        let err = LeadRecord::parse("lead_d", "[1,2]").unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_mark_exported_keeps_field_order() {
        let raw = r#"{"id":7,"exported":false,"leadData":{"email":"e@x.com"},"tags":["a"]}"#;
        let mut record = LeadRecord::parse("lead_e", raw).unwrap();
        record.mark_exported();

        assert_eq!(
            record.to_json().unwrap(),
            r#"{"id":7,"exported":true,"leadData":{"email":"e@x.com"},"tags":["a"]}"#
        );
    }

    #[test]
    fn test_mark_exported_appends_missing_flag() {
        let mut record = LeadRecord::parse("lead_f", r#"{"email":"f@x.com"}"#).unwrap();
        record.mark_exported();
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"email":"f@x.com","exported":true}"#
        );
    }

    #[test]
    fn test_mark_exported_keeps_number_text() {
        let raw = r#"{"linkedinId":123456789012345678901234567890,"score":1.10,"exported":false}"#;
        let mut record = LeadRecord::parse("lead_n", raw).unwrap();
        record.mark_exported();

        assert_eq!(
            record.to_json().unwrap(),
            r#"{"linkedinId":123456789012345678901234567890,"score":1.10,"exported":true}"#
        );
    }

    #[test]
    fn test_enrichment_content_nested_and_flat() {
        let nested =
            EnrichmentContent::parse(r#"{"emailData":{"subject":"Hi","body":"<p>Hello</p>"}}"#)
                .unwrap();
        assert_eq!(nested.subject, "Hi");
        assert_eq!(nested.body, "<p>Hello</p>");
        assert!(nested.is_complete());

        let flat = EnrichmentContent::parse(r#"{"subject":"Only subject"}"#).unwrap();
        assert_eq!(flat.subject, "Only subject");
        assert!(!flat.is_complete());
    }

    #[test]
    fn test_row_fields_follow_layout() {
        let record = LeadRecord::parse(
            "lead_g",
            r#"{"firstName":"G","lastName":"H","companyName":"Acme","email":"g@x.com"}"#,
        )
        .unwrap();
        let row = ExportRow::from_record(
            &record,
            EnrichmentContent {
                subject: "S".to_string(),
                body: "B".to_string(),
            },
        );

        assert_eq!(row.fields(RowLayout::Basic), vec!["G", "H", "Acme", "g@x.com"]);
        assert_eq!(
            row.fields(RowLayout::WithContent),
            vec!["G", "H", "Acme", "g@x.com", "S", "B"]
        );
        assert_eq!(RowLayout::WithContent.header().len(), 6);
        assert_eq!(RowLayout::for_enrichment(false), RowLayout::Basic);
    }
}
