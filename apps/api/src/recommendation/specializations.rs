//! Related-specializations adjacency table.
//!
//! Maps a candidate specialization to the set of job specializations that earn
//! partial credit. Keys and values are stored lowercased and trimmed. The
//! relation is directed: `a → b` does not imply `b → a`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::job::normalize;

const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    ("backend", &["fullstack", "devops", "data engineering", "platform"]),
    ("frontend", &["fullstack", "design", "mobile"]),
    ("fullstack", &["backend", "frontend"]),
    ("mobile", &["frontend", "fullstack"]),
    ("devops", &["backend", "platform", "security"]),
    ("platform", &["backend", "devops"]),
    ("data engineering", &["backend", "data science", "machine learning"]),
    ("data science", &["machine learning", "data engineering", "analytics"]),
    ("machine learning", &["data science", "data engineering"]),
    ("analytics", &["data science", "finance"]),
    ("security", &["devops", "backend"]),
    ("design", &["frontend", "product"]),
    ("product", &["design", "marketing"]),
    ("marketing", &["sales", "product"]),
    ("sales", &["marketing", "customer success"]),
    ("customer success", &["sales"]),
    ("finance", &["analytics", "consulting"]),
    ("consulting", &["finance", "product"]),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedSpecializations {
    table: HashMap<String, HashSet<String>>,
}

impl RelatedSpecializations {
    pub fn new(table: HashMap<String, HashSet<String>>) -> Self {
        let table: HashMap<String, HashSet<String>> = table
            .into_iter()
            .map(|(k, vs)| (normalize(&k), vs.iter().map(|v| normalize(v)).collect()))
            .collect();
        Self { table }
    }

    /// The built-in table used when no override file is configured.
    pub fn builtin() -> Self {
        let table = DEFAULT_TABLE
            .iter()
            .map(|(k, vs)| {
                (
                    k.to_string(),
                    vs.iter().map(|v| v.to_string()).collect::<HashSet<_>>(),
                )
            })
            .collect();
        Self::new(table)
    }

    /// Loads a table from a JSON object of `{ "specialization": ["related", ...] }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read related specializations file {}", path.display()))?;
        let table: HashMap<String, HashSet<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid related specializations JSON in {}", path.display()))?;
        Ok(Self::new(table))
    }

    /// Returns the first candidate specialization for which `job_specialization` is listed as related.
    pub fn related_via<'a>(
        &self,
        candidate_specializations: &'a [String],
        job_specialization: &str,
    ) -> Option<&'a str> {
        let job_key = normalize(job_specialization);
        candidate_specializations
            .iter()
            .find(|spec| {
                self.table
                    .get(&normalize(spec))
                    .is_some_and(|related| related.contains(&job_key))
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let related = RelatedSpecializations::builtin();
        let candidate = vec!["Backend".to_string()];
        assert_eq!(related.related_via(&candidate, "  DevOps "), Some("Backend"));
    }

    #[test]
    fn test_unrelated_specialization() {
        let related = RelatedSpecializations::builtin();
        let candidate = vec!["backend".to_string()];
        assert_eq!(related.related_via(&candidate, "marketing"), None);
    }

    #[test]
    fn test_relation_is_directed() {
        let mut table = HashMap::new();
        table.insert("a".to_string(), HashSet::from(["b".to_string()]));
        let related = RelatedSpecializations::new(table);
        assert!(related.related_via(&["a".to_string()], "b").is_some());
        assert!(related.related_via(&["b".to_string()], "a").is_none());
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Research": ["Data Science", "Machine Learning"]}}"#).unwrap();

        let related = RelatedSpecializations::from_json_file(file.path()).unwrap();
        assert_eq!(related.len(), 1);
        assert!(related
            .related_via(&["research".to_string()], "machine learning")
            .is_some());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(RelatedSpecializations::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_empty_table_relates_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let related = RelatedSpecializations::from_json_file(file.path()).unwrap();
        assert!(related.is_empty());
        assert!(related
            .related_via(&["backend".to_string()], "devops")
            .is_none());
        assert!(!RelatedSpecializations::builtin().is_empty());
    }
}
