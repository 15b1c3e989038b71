use serde::{Deserialize, Deserializer, Serialize};

/// A stored student record.
///
/// Records carry no identity of their own: the store addresses them by
/// position, so an index handed out by a query is only valid until the next
/// delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub first_name: String,
    pub last_name: String,
    pub roll_number: i64,
    #[serde(default, deserialize_with = "lenient_cgpa")]
    pub cgpa: Option<f64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub academic_record: Option<String>,
    #[serde(default)]
    pub courses: Vec<i64>,
}

impl StudentRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, roll_number: i64) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            roll_number,
            cgpa: None,
            address: None,
            phone_number: None,
            email: None,
            academic_record: None,
            courses: Vec::new(),
        }
    }

    /// The record written into an empty roster on first run.
    pub fn seed() -> Self {
        Self {
            first_name: "Alice".to_string(),
            last_name: "Khan".to_string(),
            roll_number: 101,
            cgpa: Some(3.7),
            address: Some("123 College Lane".to_string()),
            phone_number: Some("555-0101".to_string()),
            email: Some("alice@example.com".to_string()),
            academic_record: Some("Good".to_string()),
            courses: vec![11, 22],
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Accepts a number, `null`, an empty string or a numeric string.
///
/// Browser form state stored an unset CGPA as `""`.
fn lenient_cgpa<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid cgpa '{}'", text)))
        }
    }
}

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_record() {
        let seed = StudentRecord::seed();
        assert_eq!(seed.roll_number, 101);
        assert_eq!(seed.full_name(), "Alice Khan");
        assert_eq!(seed.courses, vec![11, 22]);
        assert_eq!(seed.cgpa, Some(3.7));
    }

    #[test]
    fn test_decode_browser_shape() {
        let json = r#"{
            "first_name": "Bob", "last_name": "Lee", "roll_number": 202,
            "cgpa": "", "address": "", "phone_number": "555", "email": null,
            "academic_record": "", "courses": [105]
        }"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cgpa, None);
        assert_eq!(record.address, None);
        assert_eq!(record.phone_number.as_deref(), Some("555"));
        assert_eq!(record.email, None);
        assert_eq!(record.courses, vec![105]);
    }

    #[test]
    fn test_decode_numeric_string_cgpa_and_missing_fields() {
        let json = r#"{"first_name": "Cy", "last_name": "Ng", "roll_number": 7, "cgpa": "8.25"}"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cgpa, Some(8.25));
        assert!(record.courses.is_empty());
        assert_eq!(record.academic_record, None);
    }

    #[test]
    fn test_decode_rejects_garbage_cgpa() {
        let json = r#"{"first_name": "Cy", "last_name": "Ng", "roll_number": 7, "cgpa": "high"}"#;
        assert!(serde_json::from_str::<StudentRecord>(json).is_err());
    }
}
