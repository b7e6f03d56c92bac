//! Generation pipeline.
//!
//! A [`Generator`] holds an ordered rule set and runs it over one operation,
//! one path, or a whole document, collecting results into a
//! [`GeneratedSet`]. The rule set is built from a [`GenerateConfig`] and can
//! be extended with custom [`Rule`]s.

use std::collections::btree_map::{self, BTreeMap};

use apitest_model::TestCase;

use crate::config::{ProjectConfig, RuleConfig};
use crate::error::{Error, Result};
use crate::rules::{
    Generated, MissingBodyProperty, ResourceNotFound, Rule, SimpleGet, UnauthorizedAccess,
    ValidCreationPost,
};
use crate::spec::{ApiSpec, OperationDescriptor, SchemaTable};

/// Configuration for the generation pipeline.
///
/// Controls which built-in rules run. Construct with [`GenerateConfig::new`]
/// and configure via [`with_project_config`](Self::with_project_config)
/// (file-based) or individual builder methods (programmatic).
///
/// # Example
///
/// ```
/// use apitest_gen::{GenerateConfig, Generator};
///
/// let config = GenerateConfig::new().skip_unauthorized();
/// let generator = Generator::new(&config);
/// assert_eq!(generator.rule_names().len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    rules: RuleConfig,
}

impl GenerateConfig {
    /// Create a config with every built-in rule enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply rule toggles from a [`ProjectConfig`].
    ///
    /// Builder methods called after this override config values.
    #[must_use]
    pub fn with_project_config(mut self, project: &ProjectConfig) -> Self {
        self.rules = project.rules;
        self
    }

    /// Enable or disable the Simple-Success-GET rule.
    #[must_use]
    pub fn simple_get(mut self, enabled: bool) -> Self {
        self.rules.simple_get = enabled;
        self
    }

    /// Enable or disable the Missing-Body-Property rule.
    #[must_use]
    pub fn missing_body_property(mut self, enabled: bool) -> Self {
        self.rules.missing_body_property = enabled;
        self
    }

    /// Enable or disable the Resource-Not-Found rule.
    #[must_use]
    pub fn resource_not_found(mut self, enabled: bool) -> Self {
        self.rules.resource_not_found = enabled;
        self
    }

    /// Enable or disable the Unauthorized-Access rule.
    #[must_use]
    pub fn unauthorized(mut self, enabled: bool) -> Self {
        self.rules.unauthorized = enabled;
        self
    }

    /// Enable or disable the Valid-Creation-POST rule.
    #[must_use]
    pub fn valid_creation_post(mut self, enabled: bool) -> Self {
        self.rules.valid_creation_post = enabled;
        self
    }

    /// Skip the Simple-Success-GET rule.
    #[must_use]
    pub fn skip_simple_get(self) -> Self {
        self.simple_get(false)
    }

    /// Skip the Missing-Body-Property rule.
    #[must_use]
    pub fn skip_missing_body_property(self) -> Self {
        self.missing_body_property(false)
    }

    /// Skip the Resource-Not-Found rule.
    #[must_use]
    pub fn skip_resource_not_found(self) -> Self {
        self.resource_not_found(false)
    }

    /// Skip the Unauthorized-Access rule.
    #[must_use]
    pub fn skip_unauthorized(self) -> Self {
        self.unauthorized(false)
    }

    /// Skip the Valid-Creation-POST rule.
    #[must_use]
    pub fn skip_valid_creation_post(self) -> Self {
        self.valid_creation_post(false)
    }
}

/// Generated test cases keyed by structural identity, each with its rationale.
///
/// Iteration order is the test case ordering, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSet {
    entries: BTreeMap<TestCase, String>,
}

impl GeneratedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test case. Returns the rationale it replaced, if the same test
    /// case was already present.
    pub fn insert(&mut self, test_case: TestCase, rationale: String) -> Option<String> {
        self.entries.insert(test_case, rationale)
    }

    /// Union `other` into `self`, logging any key collision.
    pub fn merge(&mut self, other: GeneratedSet) {
        for (test_case, rationale) in other.entries {
            let name = test_case.name.clone();
            if self.insert(test_case, rationale).is_some() {
                tracing::warn!(test_case = %name, "duplicate generated test case replaced");
            }
        }
    }

    /// Number of test cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no test case was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rationale of a test case, if present.
    #[must_use]
    pub fn get(&self, test_case: &TestCase) -> Option<&str> {
        self.entries.get(test_case).map(String::as_str)
    }

    /// Iterate `(test case, rationale)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&TestCase, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterate the test cases alone.
    pub fn test_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.entries.keys()
    }

    /// Remove and return the first entry in iteration order.
    pub fn pop_first(&mut self) -> Option<Generated> {
        self.entries.pop_first()
    }
}

impl IntoIterator for GeneratedSet {
    type Item = (TestCase, String);
    type IntoIter = btree_map::IntoIter<TestCase, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<Generated> for GeneratedSet {
    fn from_iter<I: IntoIterator<Item = Generated>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Runs an ordered set of rules over operations.
pub struct Generator {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(&GenerateConfig::default())
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl Generator {
    /// Build the rule set from the enabled built-in rules, in canonical order:
    /// Simple-Success-GET, Missing-Body-Property, Resource-Not-Found,
    /// Unauthorized-Access, Valid-Creation-POST.
    #[must_use]
    pub fn new(config: &GenerateConfig) -> Self {
        let toggles = config.rules;
        let candidates: [(bool, Box<dyn Rule>); 5] = [
            (toggles.simple_get, Box::new(SimpleGet)),
            (toggles.missing_body_property, Box::new(MissingBodyProperty)),
            (toggles.resource_not_found, Box::new(ResourceNotFound)),
            (toggles.unauthorized, Box::new(UnauthorizedAccess)),
            (toggles.valid_creation_post, Box::new(ValidCreationPost)),
        ];

        Self {
            rules: candidates
                .into_iter()
                .filter_map(|(enabled, rule)| enabled.then_some(rule))
                .collect(),
        }
    }

    /// Append a custom rule after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Names of the active rules, in evaluation order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule on one operation and union the results.
    #[must_use]
    pub fn generate_for_operation(
        &self,
        operation: &OperationDescriptor,
        schemas: &SchemaTable,
    ) -> GeneratedSet {
        let mut set = GeneratedSet::new();

        for rule in &self.rules {
            let Some((test_case, rationale)) = rule.apply(operation, schemas) else {
                tracing::trace!(
                    rule = rule.name(),
                    method = %operation.method,
                    path = %operation.path,
                    "rule abstained"
                );
                continue;
            };

            tracing::debug!(
                rule = rule.name(),
                method = %operation.method,
                path = %operation.path,
                test_case = %test_case.name,
                "rule produced a test case"
            );
            if set.insert(test_case, rationale).is_some() {
                tracing::warn!(
                    rule = rule.name(),
                    method = %operation.method,
                    path = %operation.path,
                    "rule output collided with an earlier test case"
                );
            }
        }

        set
    }

    /// Run the pipeline over every operation declared on `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if `spec` declares no operation on `path`.
    pub fn generate_for_path(&self, spec: &ApiSpec, path: &str) -> Result<GeneratedSet> {
        let item = spec.path(path).ok_or_else(|| Error::PathNotFound {
            path: path.to_string(),
        })?;

        let mut set = GeneratedSet::new();
        for operation in &item.operations {
            set.merge(self.generate_for_operation(operation, spec.schemas()));
        }
        Ok(set)
    }

    /// Run the pipeline over every operation of every path.
    #[must_use]
    pub fn generate_for_specification(&self, spec: &ApiSpec) -> GeneratedSet {
        let mut set = GeneratedSet::new();
        for operation in spec.operations() {
            set.merge(self.generate_for_operation(operation, spec.schemas()));
        }
        tracing::debug!(test_cases = set.len(), "generated test cases for specification");
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{HttpMethod, Parameter, ParameterLocation};

    struct AlwaysTeapot;

    impl Rule for AlwaysTeapot {
        fn name(&self) -> &'static str {
            "teapot"
        }

        fn apply(&self, operation: &OperationDescriptor, _: &SchemaTable) -> Option<Generated> {
            let request = apitest_model::TestRequest::new(operation.method.as_str(), &operation.path)
                .with_assertion(apitest_model::Assertion::status_equals(418));
            Some((TestCase::single("teapot", request), "short and stout".to_string()))
        }
    }

    #[test]
    fn config_toggles_select_rules() {
        let all = Generator::default();
        assert_eq!(
            all.rule_names(),
            vec![
                "simple-get",
                "missing-body-property",
                "resource-not-found",
                "unauthorized-access",
                "valid-creation-post",
            ]
        );

        let some = Generator::new(&GenerateConfig::new().skip_simple_get().skip_valid_creation_post());
        assert_eq!(
            some.rule_names(),
            vec!["missing-body-property", "resource-not-found", "unauthorized-access"]
        );
    }

    #[test]
    fn default_rule_names_are_distinct() {
        let names = Generator::default().rule_names();
        let distinct: std::collections::BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), 5);
        assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn project_config_then_builder_override() {
        let project: ProjectConfig =
            serde_yaml_ng::from_str("rules:\n  unauthorized: false\n  simple_get: false\n").unwrap();
        let config = GenerateConfig::new()
            .with_project_config(&project)
            .simple_get(true);
        let names = Generator::new(&config).rule_names();
        assert!(names.contains(&"simple-get"));
        assert!(!names.contains(&"unauthorized-access"));
    }

    #[test]
    fn custom_rules_are_appended() {
        let generator = Generator::new(&GenerateConfig::new().skip_simple_get()).with_rule(Box::new(AlwaysTeapot));
        assert_eq!(generator.rule_names().last(), Some(&"teapot"));

        let op = OperationDescriptor::new(HttpMethod::Get, "/brew");
        let set = generator.generate_for_operation(&op, &SchemaTable::default());
        assert_eq!(set.len(), 1);
        let (case, rationale) = set.iter().next().unwrap();
        assert_eq!(case.name, "teapot");
        assert_eq!(rationale, "short and stout");
    }

    #[test]
    fn operation_can_yield_several_cases() {
        let op = OperationDescriptor::new(HttpMethod::Delete, "/items/{id}")
            .with_parameter(Parameter::new("id", ParameterLocation::Path, true))
            .with_statuses(&[204, 401, 404]);
        let set = Generator::default().generate_for_operation(&op, &SchemaTable::default());
        let names: Vec<&str> = set.test_cases().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["DELETE /items/{id} not found test", "Unauthorized test for DELETE /items/{id}"]
        );
    }

    #[test]
    fn operation_satisfying_no_rule_yields_empty_set() {
        let op = OperationDescriptor::new(HttpMethod::Patch, "/items").with_statuses(&[200]);
        assert!(Generator::default()
            .generate_for_operation(&op, &SchemaTable::default())
            .is_empty());
    }

    #[test]
    fn merge_keeps_structurally_equal_cases_once() {
        let op = OperationDescriptor::new(HttpMethod::Get, "/items").with_statuses(&[200]);
        let generator = Generator::default();
        let mut set = generator.generate_for_operation(&op, &SchemaTable::default());
        set.merge(generator.generate_for_operation(&op, &SchemaTable::default()));
        assert_eq!(set.len(), 1);
    }
}
