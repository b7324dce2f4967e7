//! Static rule registration.

use crate::rule::{Rule, RuleBox};
use sharplint_syntax::{SyntaxKind, TriviaKind};
use std::collections::HashMap;

/// Rules in registration order, indexed by the kinds they subscribe to.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    by_node: HashMap<SyntaxKind, Vec<usize>>,
    by_trivia: HashMap<TriviaKind, Vec<usize>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule after all previously registered ones.
    pub fn register(&mut self, rule: RuleBox) {
        let index = self.rules.len();
        for &kind in rule.node_kinds() {
            self.by_node.entry(kind).or_default().push(index);
        }
        for &kind in rule.trivia_kinds() {
            self.by_trivia.entry(kind).or_default().push(index);
        }
        self.rules.push(rule);
    }

    /// Builder-style [`RuleRegistry::register`].
    #[must_use]
    pub fn with<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.register(Box::new(rule));
        self
    }

    /// All rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Rule at a registration index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&dyn Rule> {
        self.rules.get(index).map(AsRef::as_ref)
    }

    /// Finds a rule by name or code.
    #[must_use]
    pub fn find(&self, name_or_code: &str) -> Option<&dyn Rule> {
        self.rules()
            .find(|r| r.name() == name_or_code || r.code() == name_or_code)
    }

    /// Indices of rules subscribed to a node kind, in registration order.
    #[must_use]
    pub fn node_rules(&self, kind: SyntaxKind) -> &[usize] {
        self.by_node.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Indices of rules subscribed to a trivia kind, in registration order.
    #[must_use]
    pub fn trivia_rules(&self, kind: TriviaKind) -> &[usize] {
        self.by_trivia.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Returns true if any rule subscribes to trivia.
    #[must_use]
    pub fn has_trivia_rules(&self) -> bool {
        !self.by_trivia.is_empty()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keeps only the rules for which `keep` returns true, preserving order.
    #[must_use]
    pub fn filtered(self, keep: impl Fn(&dyn Rule) -> bool) -> Self {
        let mut registry = Self::new();
        for rule in self.rules {
            if keep(rule.as_ref()) {
                registry.register(rule);
            }
        }
        registry
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.code()))
            .finish()
    }
}

impl FromIterator<RuleBox> for RuleRegistry {
    fn from_iter<I: IntoIterator<Item = RuleBox>>(iter: I) -> Self {
        let mut registry = Self::new();
        for rule in iter {
            registry.register(rule);
        }
        registry
    }
}
