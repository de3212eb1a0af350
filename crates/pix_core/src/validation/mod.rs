use crate::error::{PixError, Result};
use crate::models::pix::SanitizedRequest;

pub mod rules;

// The structure of a failure
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub code: String,       // e.g., "PIX-001"
    pub error: PixError,
}

// The contract every rule must fulfill
pub trait ValidationRule: Send + Sync {
    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue>;
    fn rule_id(&self) -> &str;
}

// The Engine that holds the registry of all rules
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn run(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let mut rule_issues = rule.check(request);
            issues.append(&mut rule_issues);
        }
        issues
    }

    /// Runs every rule and reports the first failure, in registration order.
    pub fn validate(&self, request: &SanitizedRequest) -> Result<()> {
        match self.run(request).into_iter().next() {
            Some(issue) => Err(issue.error),
            None => Ok(()),
        }
    }
}
