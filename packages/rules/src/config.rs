//! Rule configuration: the accepted and rejected code sets.
//!
//! A `RuleConfig` is built once (from the built-in defaults or a YAML file)
//! and handed to [`RuleEngine::new`](crate::RuleEngine::new). It is never
//! mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};

/// Minimum number of distinct accepted eurovoc descriptors needed before the
/// eurovoc signal alone can accept a document.
pub const DEFAULT_EUROVOC_THRESHOLD: usize = 2;

/// How document codes are compared against a configured code set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// A document code matches when it equals a configured code.
    #[default]
    Exact,
    /// A document code matches when it starts with a configured code.
    Prefix,
}

/// A set of classification codes with its matching policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSet {
    pub codes: BTreeSet<String>,

    #[serde(default, rename = "match")]
    pub policy: MatchPolicy,
}

impl CodeSet {
    /// Create an exact-match code set.
    #[must_use]
    pub fn exact(codes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            policy: MatchPolicy::Exact,
        }
    }

    /// Create a prefix-match code set.
    #[must_use]
    pub fn prefix(codes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            policy: MatchPolicy::Prefix,
            ..Self::exact(codes)
        }
    }

    /// Whether a single document code matches this set.
    ///
    /// # Examples
    /// ```
    /// use eurlex_rules::CodeSet;
    ///
    /// assert!(CodeSet::prefix(["08"]).matches("0812"));
    /// assert!(!CodeSet::exact(["08"]).matches("0812"));
    /// ```
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        match self.policy {
            MatchPolicy::Exact => self.codes.contains(code),
            MatchPolicy::Prefix => self.codes.iter().any(|c| code.starts_with(c.as_str())),
        }
    }

    /// Whether any of the document codes matches this set.
    #[must_use]
    pub fn matches_any(&self, codes: &[String]) -> bool {
        codes.iter().any(|code| self.matches(code))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Immutable configuration of the classification cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub accepted_authors: BTreeSet<String>,

    #[serde(default)]
    pub accepted_departments: BTreeSet<String>,

    #[serde(default)]
    pub accepted_summary_codes: CodeSet,

    #[serde(default)]
    pub accepted_directory_codes: CodeSet,

    #[serde(default)]
    pub rejected_directory_codes: CodeSet,

    /// Directory codes accepted only when the eurovoc descriptors corroborate.
    #[serde(default)]
    pub conditional_directory_codes: CodeSet,

    /// Eurovoc descriptor name -> identifier.
    #[serde(default)]
    pub accepted_eurovoc: BTreeMap<String, String>,

    /// Eurovoc descriptor name -> identifier.
    #[serde(default)]
    pub rejected_eurovoc: BTreeMap<String, String>,

    #[serde(default = "default_eurovoc_threshold")]
    pub eurovoc_threshold: usize,
}

fn default_eurovoc_threshold() -> usize {
    DEFAULT_EUROVOC_THRESHOLD
}

impl RuleConfig {
    /// Parse a configuration from YAML and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RuleConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RulesError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(
            path = %path.display(),
            accepted_eurovoc = config.accepted_eurovoc.len(),
            rejected_eurovoc = config.rejected_eurovoc.len(),
            "Loaded rules configuration"
        );
        Ok(config)
    }

    /// Serialize to YAML (used to print the effective configuration).
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.eurovoc_threshold == 0 {
            return Err(RulesError::InvalidConfig(
                "eurovoc_threshold must be at least 1".to_string(),
            ));
        }

        let code_sets = [
            ("accepted_summary_codes", &self.accepted_summary_codes),
            ("accepted_directory_codes", &self.accepted_directory_codes),
            ("rejected_directory_codes", &self.rejected_directory_codes),
            ("conditional_directory_codes", &self.conditional_directory_codes),
        ];
        for (name, set) in code_sets {
            if set.codes.iter().any(|c| c.trim().is_empty()) {
                return Err(RulesError::InvalidConfig(format!(
                    "{name} contains an empty code"
                )));
            }
        }

        for (name, descriptors) in [
            ("accepted_eurovoc", &self.accepted_eurovoc),
            ("rejected_eurovoc", &self.rejected_eurovoc),
        ] {
            if let Some((term, _)) = descriptors.iter().find(|(_, id)| id.trim().is_empty()) {
                return Err(RulesError::InvalidConfig(format!(
                    "{name} term '{term}' has an empty identifier"
                )));
            }
        }

        Ok(())
    }

    /// Identifiers of the accepted eurovoc descriptors.
    #[must_use]
    pub fn accepted_eurovoc_ids(&self) -> BTreeSet<String> {
        self.accepted_eurovoc.values().cloned().collect()
    }

    /// Identifiers of the rejected eurovoc descriptors.
    #[must_use]
    pub fn rejected_eurovoc_ids(&self) -> BTreeSet<String> {
        self.rejected_eurovoc.values().cloned().collect()
    }
}

impl Default for RuleConfig {
    /// The FISMA business rules.
    fn default() -> Self {
        Self {
            accepted_authors: set([
                "European Commission, Directorate-General for Financial Stability, Financial Services and Capital Markets Union",
                "Directorate-General for Financial Stability, Financial Services and Capital Markets Union",
            ]),
            accepted_departments: set(["FISMA"]),
            accepted_summary_codes: CodeSet::exact(["1409", "2415", "240403"]),
            accepted_directory_codes: CodeSet::exact([
                "014080", "0160", "06202010", "06202020", "06202025", "10",
            ]),
            // 08 competition policy, 09 taxation, 117020 development aid
            rejected_directory_codes: CodeSet::prefix(["08", "117020", "09"]),
            conditional_directory_codes: CodeSet::exact(["0160", "115010", "1701", "1710"]),
            accepted_eurovoc: descriptors([
                ("accounting", "54"),
                ("bank charges", "3252"),
                ("banking policy", "2447"),
                ("capital market", "5156"),
                ("capital transfer", "4493"),
                ("capital increase", "4115"),
                ("consumer credit", "289"),
                ("counterfeiting", "8434"),
                ("credit institution", "3246"),
                ("credit guarantee", "1130"),
                ("electronic banking", "3248"),
                ("European Central Bank", "5455"),
                ("Euribor", "6334"),
                ("financial aid", "922"),
                ("financial control", "189"),
                ("financial instrument", "1459"),
                ("financial institution", "1452"),
                ("financial intervention", "1485"),
                ("financial legislation", "560"),
                ("financial market", "1804"),
                ("financial stability", "c_3e6af2e7"),
                ("financial services", "8469"),
                ("financial solvency", "3942"),
                ("financial transaction", "4491"),
                ("shareholding", "2264"),
                ("share capital", "5218"),
                ("insurance", "3151"),
                ("insurance company", "34"),
                ("insurance contract", "165"),
                ("investment company", "4194"),
                ("investment protection", "1132"),
                ("market supervision", "4347"),
                ("money laundering", "5465"),
                ("private-sector liquidity", "3220"),
                ("pension scheme", "3751"),
                ("regulation of investments", "3148"),
                ("financial transparency", "c_34746c6e"),
                ("securities", "4646"),
                ("stock exchange", "3233"),
            ]),
            rejected_eurovoc: descriptors([
                ("state aid", "889"),
                ("control of state aid", "5541"),
                ("tax law", "561"),
                ("tax evasion", "1095"),
                ("tax avoidance", "924"),
                ("tax system", "1021"),
                ("tax on investment income", "1328"),
                ("corporation tax", "1331"),
                ("indirect tax", "1316"),
                ("tax relief", "365"),
                ("fuel tax", "4407"),
            ]),
            eurovoc_threshold: DEFAULT_EUROVOC_THRESHOLD,
        }
    }
}

fn set<const N: usize>(values: [&str; N]) -> BTreeSet<String> {
    values.into_iter().map(String::from).collect()
}

fn descriptors<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, id)| (name.to_string(), id.to_string()))
        .collect()
}
