//! Class label table value object

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// PlantVillage tomato leaf classes, index-aligned with the model output
pub const TOMATO_LEAF_CLASSES: [&str; 10] = [
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Ordered, immutable list of class labels
///
/// Position `i` names the class scored at position `i` of the model's
/// output vector. Cloning is cheap; the labels are shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassTable {
    labels: Arc<[String]>,
}

impl ClassTable {
    /// Create a table from an ordered list of labels
    pub fn new<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(DomainError::InvalidClassTable(
                "at least one label is required".to_string(),
            ));
        }
        if let Some(blank) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(DomainError::InvalidClassTable(format!(
                "label at index {blank} is blank"
            )));
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// The fixed tomato leaf disease table the model was trained on
    pub fn tomato_leaf() -> Self {
        Self {
            labels: TOMATO_LEAF_CLASSES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; an empty table cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at `index`, or an out-of-range error
    pub fn label(&self, index: usize) -> Result<&str, DomainError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| DomainError::class_index_out_of_range(index, self.len()))
    }

    /// Iterate over the labels in model order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::tomato_leaf()
    }
}

impl fmt::Display for ClassTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} classes", self.len())
    }
}

impl TryFrom<Vec<String>> for ClassTable {
    type Error = DomainError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<ClassTable> for Vec<String> {
    fn from(table: ClassTable) -> Self {
        table.labels.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tomato_leaf_has_ten_classes() {
        let table = ClassTable::tomato_leaf();
        assert_eq!(table.len(), 10);
        assert!(!table.is_empty());
    }

    #[test]
    fn tomato_leaf_order_matches_model_output() {
        let table = ClassTable::tomato_leaf();
        assert_eq!(table.label(0).unwrap(), "Tomato___Bacterial_spot");
        assert_eq!(table.label(5).unwrap(), "Tomato___Spider_mites Two-spotted_spider_mite");
        assert_eq!(table.label(9).unwrap(), "Tomato___healthy");
    }

    #[test]
    fn label_out_of_range_is_error() {
        let table = ClassTable::tomato_leaf();
        let err = table.label(10).unwrap_err();
        assert_eq!(err, DomainError::class_index_out_of_range(10, 10));
    }

    #[test]
    fn new_rejects_empty_table() {
        let result = ClassTable::new(Vec::<String>::new());
        assert!(matches!(result, Err(DomainError::InvalidClassTable(_))));
    }

    #[test]
    fn new_rejects_blank_label() {
        let result = ClassTable::new(["healthy", "  "]);
        let Err(DomainError::InvalidClassTable(msg)) = result else {
            unreachable!("Expected InvalidClassTable");
        };
        assert!(msg.contains("index 1"));
    }

    #[test]
    fn default_is_tomato_leaf() {
        assert_eq!(ClassTable::default(), ClassTable::tomato_leaf());
    }

    #[test]
    fn iter_preserves_order() {
        let table = ClassTable::new(["a", "b", "c"]).unwrap();
        let labels: Vec<&str> = table.iter().collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn display_shows_count() {
        assert_eq!(ClassTable::tomato_leaf().to_string(), "10 classes");
    }

    #[test]
    fn serializes_as_plain_list() {
        let table = ClassTable::new(["a", "b"]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }

    #[test]
    fn deserialization_validates() {
        let result: Result<ClassTable, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
