//! The classification cascade.
//!
//! A [`RuleEngine`] is an ordered list of [`Rule`]s. Each rule pairs a
//! [`Criterion`] with the decision it produces. Rules are evaluated in order
//! and the first one whose criterion holds decides the document; later rules
//! are never consulted. A document no rule fires for stays unvalidated.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::{CodeSet, RuleConfig};
use crate::document::{Decision, DocumentModel, Taxonomy};
use crate::error::Result;

/// The steps of the FISMA cascade, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleStep {
    Author,
    Department,
    SummaryCode,
    DirectoryCodeAccept,
    DirectoryCodeReject,
    DirectoryCodeConditional,
    EurovocReject,
    EurovocAccept,
}

impl RuleStep {
    /// All steps, in priority order.
    pub const ALL: [RuleStep; 8] = [
        Self::Author,
        Self::Department,
        Self::SummaryCode,
        Self::DirectoryCodeAccept,
        Self::DirectoryCodeReject,
        Self::DirectoryCodeConditional,
        Self::EurovocReject,
        Self::EurovocAccept,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Department => "department",
            Self::SummaryCode => "summary-code",
            Self::DirectoryCodeAccept => "directory-code-accept",
            Self::DirectoryCodeReject => "directory-code-reject",
            Self::DirectoryCodeConditional => "directory-code-conditional",
            Self::EurovocReject => "eurovoc-reject",
            Self::EurovocAccept => "eurovoc-accept",
        }
    }
}

impl fmt::Display for RuleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate over a document.
pub trait Criterion: Send + Sync {
    fn evaluate(&self, document: &DocumentModel) -> bool;
}

/// Free-text metadata fields that hold sets of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Authors,
    Departments,
}

/// Holds when the document's field shares at least one value with `values`.
#[derive(Debug, Clone)]
pub struct MetadataMatch {
    pub field: MetadataField,
    pub values: BTreeSet<String>,
}

impl Criterion for MetadataMatch {
    fn evaluate(&self, document: &DocumentModel) -> bool {
        let present = match self.field {
            MetadataField::Authors => &document.authors,
            MetadataField::Departments => &document.departments,
        };
        !present.is_disjoint(&self.values)
    }
}

/// Holds when any code of one taxonomy matches the code set.
#[derive(Debug, Clone)]
pub struct CodeMatch {
    pub taxonomy: Taxonomy,
    pub codes: CodeSet,
}

impl Criterion for CodeMatch {
    fn evaluate(&self, document: &DocumentModel) -> bool {
        self.codes.matches_any(document.codes(self.taxonomy))
    }
}

/// Holds when the eurovoc descriptors include at least `threshold` distinct
/// accepted identifiers and none of the rejected ones.
#[derive(Debug, Clone)]
pub struct EurovocCorroboration {
    pub accepted: BTreeSet<String>,
    pub rejected: BTreeSet<String>,
    pub threshold: usize,
}

impl Criterion for EurovocCorroboration {
    fn evaluate(&self, document: &DocumentModel) -> bool {
        let descriptors = document.codes(Taxonomy::EurovocDescriptor);
        if descriptors.iter().any(|d| self.rejected.contains(d)) {
            return false;
        }
        // Codes are de-duplicated by the document model, so this counts distinct ids.
        let hits = descriptors
            .iter()
            .filter(|d| self.accepted.contains(*d))
            .count();
        hits >= self.threshold
    }
}

/// Holds when every inner criterion holds.
pub struct AllOf(pub Vec<Box<dyn Criterion>>);

impl Criterion for AllOf {
    fn evaluate(&self, document: &DocumentModel) -> bool {
        self.0.iter().all(|c| c.evaluate(document))
    }
}

/// One step of the cascade.
pub struct Rule {
    step: RuleStep,
    outcome: Decision,
    criterion: Box<dyn Criterion>,
}

impl Rule {
    /// Create a rule. `outcome` should be terminal; an unvalidated outcome
    /// makes the rule a no-op that still stops the cascade.
    #[must_use]
    pub fn new(step: RuleStep, outcome: Decision, criterion: impl Criterion + 'static) -> Self {
        Self {
            step,
            outcome,
            criterion: Box::new(criterion),
        }
    }

    #[must_use]
    pub fn step(&self) -> RuleStep {
        self.step
    }

    #[must_use]
    pub fn outcome(&self) -> Decision {
        self.outcome
    }

    /// Whether this rule decides the document.
    #[must_use]
    pub fn fires(&self, document: &DocumentModel) -> bool {
        self.criterion.evaluate(document)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("step", &self.step)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Outcome of running the cascade on one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,

    /// The step that fired, `None` when the document stays unvalidated.
    pub step: Option<RuleStep>,
}

impl Verdict {
    #[must_use]
    pub fn unvalidated() -> Self {
        Self {
            decision: Decision::Unvalidated,
            step: None,
        }
    }
}

/// Prioritized, short-circuiting rule cascade.
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Build the FISMA cascade from a configuration.
    ///
    /// Priority order: author, department, summary code, directory code
    /// accept, directory code reject, directory code accept under eurovoc
    /// condition, eurovoc reject, eurovoc accept.
    #[must_use]
    pub fn new(config: &RuleConfig) -> Self {
        let corroboration = EurovocCorroboration {
            accepted: config.accepted_eurovoc_ids(),
            rejected: config.rejected_eurovoc_ids(),
            threshold: config.eurovoc_threshold,
        };

        let rules = vec![
            Rule::new(
                RuleStep::Author,
                Decision::Accepted,
                MetadataMatch {
                    field: MetadataField::Authors,
                    values: config.accepted_authors.clone(),
                },
            ),
            Rule::new(
                RuleStep::Department,
                Decision::Accepted,
                MetadataMatch {
                    field: MetadataField::Departments,
                    values: config.accepted_departments.clone(),
                },
            ),
            Rule::new(
                RuleStep::SummaryCode,
                Decision::Accepted,
                CodeMatch {
                    taxonomy: Taxonomy::SummaryCodes,
                    codes: config.accepted_summary_codes.clone(),
                },
            ),
            Rule::new(
                RuleStep::DirectoryCodeAccept,
                Decision::Accepted,
                CodeMatch {
                    taxonomy: Taxonomy::DirectoryCode,
                    codes: config.accepted_directory_codes.clone(),
                },
            ),
            Rule::new(
                RuleStep::DirectoryCodeReject,
                Decision::Rejected,
                CodeMatch {
                    taxonomy: Taxonomy::DirectoryCode,
                    codes: config.rejected_directory_codes.clone(),
                },
            ),
            Rule::new(
                RuleStep::DirectoryCodeConditional,
                Decision::Accepted,
                AllOf(vec![
                    Box::new(CodeMatch {
                        taxonomy: Taxonomy::DirectoryCode,
                        codes: config.conditional_directory_codes.clone(),
                    }),
                    Box::new(corroboration.clone()),
                ]),
            ),
            Rule::new(
                RuleStep::EurovocReject,
                Decision::Rejected,
                CodeMatch {
                    taxonomy: Taxonomy::EurovocDescriptor,
                    codes: CodeSet::exact(config.rejected_eurovoc_ids()),
                },
            ),
            Rule::new(RuleStep::EurovocAccept, Decision::Accepted, corroboration),
        ];

        Self::from_rules(rules)
    }

    /// Build an engine from an explicit rule list, evaluated in the given order.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the cascade without touching the document.
    #[must_use]
    pub fn classify(&self, document: &DocumentModel) -> Verdict {
        for rule in &self.rules {
            if rule.fires(document) {
                tracing::trace!(
                    celex = %document.celex_id,
                    step = %rule.step,
                    decision = rule.outcome.as_str(),
                    "Rule fired"
                );
                return Verdict {
                    decision: rule.outcome,
                    step: Some(rule.step),
                };
            }
        }
        Verdict::unvalidated()
    }

    /// Run the cascade and record a terminal decision on the document.
    pub fn apply(&self, document: &mut DocumentModel) -> Result<Verdict> {
        let verdict = self.classify(document);
        if verdict.decision.is_terminal() {
            document.assign(verdict.decision)?;
        }
        Ok(verdict)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}
