//! Normalized document model queried by the rule cascade.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};
use crate::record::{OneOrMany, RawRecord};

/// Classification taxonomies attached to EUR-Lex documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Taxonomy {
    DirectoryCode,
    SummaryCodes,
    EurovocDescriptor,
    SubjectMatter,
}

impl Taxonomy {
    /// All taxonomies, in a stable order.
    pub const ALL: [Taxonomy; 4] = [
        Self::DirectoryCode,
        Self::SummaryCodes,
        Self::EurovocDescriptor,
        Self::SubjectMatter,
    ];

    /// Type name as used in the `classifications_type` export field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectoryCode => "directory code",
            Self::SummaryCodes => "summary codes",
            Self::EurovocDescriptor => "eurovoc descriptor",
            Self::SubjectMatter => "subject matter",
        }
    }

    /// Look up a taxonomy by its export type name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Labeling state of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    #[default]
    Unvalidated,
    Accepted,
    Rejected,
}

impl Decision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvalidated => "unvalidated",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal; unvalidated is the initial state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unvalidated)
    }
}

/// A document reduced to the metadata the rule cascade looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentModel {
    /// CELEX identifier (empty when the export had none).
    pub celex_id: String,

    /// Raw document body (HTML or plain text).
    pub content: String,

    pub authors: BTreeSet<String>,

    pub departments: BTreeSet<String>,

    /// Type name -> codes in export order, without duplicates.
    classifications: BTreeMap<String, Vec<String>>,

    /// Type name -> human-readable labels in export order.
    classification_labels: BTreeMap<String, Vec<String>>,

    decision: Decision,
}

impl DocumentModel {
    /// Create an unclassified document with no metadata.
    #[must_use]
    pub fn new(celex_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            celex_id: celex_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the authors.
    #[must_use]
    pub fn with_authors(mut self, authors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the responsible departments.
    #[must_use]
    pub fn with_departments(
        mut self,
        departments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    /// Append codes of one taxonomy.
    #[must_use]
    pub fn with_codes(
        mut self,
        taxonomy: Taxonomy,
        codes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        for code in codes {
            self.push_code(taxonomy.as_str(), code.into());
        }
        self
    }

    fn push_code(&mut self, type_name: &str, code: String) {
        let codes = self.classifications.entry(type_name.to_string()).or_default();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Codes of one taxonomy; empty when the document has none.
    #[must_use]
    pub fn codes(&self, taxonomy: Taxonomy) -> &[String] {
        self.codes_by_type(taxonomy.as_str())
    }

    /// Codes by raw export type name, including types outside [`Taxonomy`].
    #[must_use]
    pub fn codes_by_type(&self, type_name: &str) -> &[String] {
        self.classifications
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the document carries a classification of this taxonomy.
    #[must_use]
    pub fn has_classification(&self, taxonomy: Taxonomy) -> bool {
        self.classifications.contains_key(taxonomy.as_str())
    }

    /// Human-readable labels of one taxonomy.
    #[must_use]
    pub fn labels(&self, taxonomy: Taxonomy) -> &[String] {
        self.classification_labels
            .get(taxonomy.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Type names present on the document.
    pub fn classification_types(&self) -> impl Iterator<Item = &str> {
        self.classifications.keys().map(String::as_str)
    }

    #[must_use]
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Assign the terminal decision.
    ///
    /// A document is decided at most once: assigning `Unvalidated`, or
    /// assigning anything after a decision was made, is an error.
    pub fn assign(&mut self, decision: Decision) -> Result<()> {
        if !decision.is_terminal() {
            return Err(RulesError::NonTerminalDecision);
        }
        if self.decision.is_terminal() {
            return Err(RulesError::DecisionAlreadyAssigned {
                celex_id: self.celex_id.clone(),
            });
        }
        self.decision = decision;
        Ok(())
    }
}

impl From<RawRecord> for DocumentModel {
    fn from(record: RawRecord) -> Self {
        let mut document = DocumentModel::new(
            record.celex_id(),
            record.content().unwrap_or_default(),
        );

        document.authors = record
            .misc_author
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .collect();
        document.departments = record
            .misc_department_responsible
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .collect();

        let types = record.classifications_type.unwrap_or_default();
        let codes = record.classifications_code.unwrap_or_default();
        if types.len() != codes.len() {
            tracing::debug!(
                celex = %document.celex_id,
                types = types.len(),
                codes = codes.len(),
                "Classification lists differ in length, extra entries ignored"
            );
        }
        for (type_name, code) in types.iter().zip(codes) {
            document.push_code(type_name, code);
        }

        let labels = record.classifications_label.unwrap_or_default();
        for (type_name, label) in types.iter().zip(labels) {
            document
                .classification_labels
                .entry(type_name.clone())
                .or_default()
                .push(label);
        }

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(json: &str) -> RawRecord {
        RawRecord::from_json_line(json).unwrap()
    }

    #[test]
    fn test_taxonomy_round_trip_names() {
        for taxonomy in Taxonomy::ALL {
            assert_eq!(Taxonomy::from_type_name(taxonomy.as_str()), Some(taxonomy));
        }
        assert_eq!(Taxonomy::from_type_name("case law"), None);
    }

    #[test]
    fn test_classifications_grouped_by_type() {
        let document = DocumentModel::from(record(
            r#"{
                "celex": ["32014L0065"],
                "classifications_type": ["eurovoc descriptor", "directory code", "eurovoc descriptor", "eurovoc descriptor"],
                "classifications_code": ["3151", "06202010", "5465", "3151"],
                "classifications_label": ["insurance", "Banks", "money laundering", "insurance"]
            }"#,
        ));

        assert_eq!(document.celex_id, "32014L0065");
        assert_eq!(
            document.codes(Taxonomy::EurovocDescriptor),
            ["3151".to_string(), "5465".to_string()]
        );
        assert_eq!(document.codes(Taxonomy::DirectoryCode), ["06202010".to_string()]);
        assert!(document.codes(Taxonomy::SummaryCodes).is_empty());
        assert!(!document.has_classification(Taxonomy::SummaryCodes));
        assert_eq!(document.labels(Taxonomy::DirectoryCode), ["Banks".to_string()]);
        assert_eq!(document.labels(Taxonomy::EurovocDescriptor).len(), 3);
    }

    #[test]
    fn test_unknown_classification_type_kept() {
        let document = DocumentModel::from(record(
            r#"{"classifications_type": ["case law directory code"], "classifications_code": ["A.1"]}"#,
        ));
        assert_eq!(document.codes_by_type("case law directory code"), ["A.1".to_string()]);
        assert_eq!(
            document.classification_types().collect::<Vec<_>>(),
            vec!["case law directory code"]
        );
    }

    #[test]
    fn test_uneven_classification_lists_truncate() {
        let document = DocumentModel::from(record(
            r#"{"classifications_type": ["directory code", "directory code"], "classifications_code": ["08"]}"#,
        ));
        assert_eq!(document.codes(Taxonomy::DirectoryCode), ["08".to_string()]);
    }

    #[test]
    fn test_missing_metadata_is_empty() {
        let document = DocumentModel::from(record(r#"{"content": "text"}"#));
        assert!(document.authors.is_empty());
        assert!(document.departments.is_empty());
        assert_eq!(document.classification_types().count(), 0);
        assert_eq!(document.content, "text");
        assert_eq!(document.decision(), Decision::Unvalidated);
    }

    #[test]
    fn test_author_string_or_list() {
        let single = DocumentModel::from(record(r#"{"misc_author": "FISMA"}"#));
        assert!(single.authors.contains("FISMA"));

        let list = DocumentModel::from(record(
            r#"{"misc_department_responsible": ["FISMA", "COMP"]}"#,
        ));
        assert_eq!(list.departments.len(), 2);
    }

    #[test]
    fn test_assign_once() {
        let mut document = DocumentModel::new("32019R2088", "");
        assert!(matches!(
            document.assign(Decision::Unvalidated),
            Err(RulesError::NonTerminalDecision)
        ));

        document.assign(Decision::Accepted).unwrap();
        assert_eq!(document.decision(), Decision::Accepted);

        let err = document.assign(Decision::Rejected).unwrap_err();
        assert!(matches!(err, RulesError::DecisionAlreadyAssigned { .. }));
        assert_eq!(document.decision(), Decision::Accepted);
    }

    #[test]
    fn test_decision_serialization() {
        assert_eq!(serde_json::to_string(&Decision::Accepted).unwrap(), "\"accepted\"");
        assert_eq!(Decision::Rejected.as_str(), "rejected");
        assert!(!Decision::Unvalidated.is_terminal());
    }
}
