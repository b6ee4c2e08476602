use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{component::Category, selection::SelectionResult};

/// Categories a build cannot do without.
pub const REQUIRED: [Category; 5] = [
    Category::Cpu,
    Category::Motherboard,
    Category::Ram,
    Category::Storage,
    Category::Psu,
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub message: String,
    pub issues: Vec<String>,
    /// 0 to 100.
    pub compatibility_score: f64,
}

impl CompatibilityReport {
    pub const MISSING_COMPONENTS: &'static str = "missing essential components";
    pub const COMPATIBLE: &'static str = "components are compatible";
    pub const INCOMPATIBLE: &'static str = "compatibility issues detected";

    /// The score on a 0.0 to 1.0 scale, i.e. `compatibility_score / 100`.
    pub fn normalized_score(&self) -> f64 {
        self.compatibility_score / 100.0
    }
}

/// One structural check over a complete selection.
///
/// Rules only run once every [`REQUIRED`] category is present. A rule that lacks the
/// data it needs (an unlisted socket, say) must not report an issue.
pub trait CompatibilityRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// A human-readable issue, if the selection breaks this rule.
    fn check(&self, selection: &SelectionResult) -> Option<String>;
}

/// CPU and motherboard must share a socket.
pub struct SocketRule;

impl CompatibilityRule for SocketRule {
    fn name(&self) -> &'static str {
        "socket"
    }

    fn check(&self, selection: &SelectionResult) -> Option<String> {
        let cpu = listed(selection, Category::Cpu, "socket")?;
        let board = listed(selection, Category::Motherboard, "socket")?;
        (cpu != board).then(|| {
            format!(
                "CPU socket ({}) incompatible with motherboard ({})",
                cpu, board
            )
        })
    }
}

/// The RAM type must be one the motherboard lists under `memory_support` (`DDR4/DDR5`).
pub struct MemoryTypeRule;

impl CompatibilityRule for MemoryTypeRule {
    fn name(&self) -> &'static str {
        "memory type"
    }

    fn check(&self, selection: &SelectionResult) -> Option<String> {
        let ram = listed(selection, Category::Ram, "type")?;
        let supported = listed(selection, Category::Motherboard, "memory_support")?;
        let fits = supported
            .split(|c| c == '/' || c == ',')
            .any(|kind| kind.trim().eq_ignore_ascii_case(ram));
        (!fits).then(|| {
            format!(
                "RAM type ({}) not supported by motherboard ({})",
                ram, supported
            )
        })
    }
}

/// The PSU's `wattage` must cover the summed draw of everything else.
pub struct PowerBudgetRule;

impl CompatibilityRule for PowerBudgetRule {
    fn name(&self) -> &'static str {
        "power budget"
    }

    fn check(&self, selection: &SelectionResult) -> Option<String> {
        let capacity = watts(selection.get(Category::Psu)?.spec("wattage")?)?;
        let draw: u64 = selection
            .iter()
            .filter(|(category, _)| *category != Category::Psu)
            .filter_map(|(_, c)| c.power_consumption)
            .map(u64::from)
            .sum();
        (draw > 0 && draw as f64 > capacity).then(|| {
            format!(
                "PSU wattage ({}W) below estimated draw ({} W)",
                capacity, draw
            )
        })
    }
}

/// A trimmed, non-blank specification value. Blank values count as unknown.
fn listed<'s>(selection: &'s SelectionResult, category: Category, spec: &str) -> Option<&'s str> {
    selection
        .get(category)?
        .spec(spec)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// "750W" -> 750.0, "850 W" -> 850.0
fn watts(s: &str) -> Option<f64> {
    s.trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect::<String>()
        .parse()
        .ok()
}

pub struct CompatibilityChecker {
    rules: Vec<Box<dyn CompatibilityRule>>,
    issue_penalty: f64,
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::standard(Self::DEFAULT_PENALTY)
    }
}

impl CompatibilityChecker {
    pub const DEFAULT_PENALTY: f64 = 25.0;

    /// A checker with no structural rules; only completeness is checked.
    pub fn new(issue_penalty: f64) -> Self {
        Self {
            rules: Vec::new(),
            issue_penalty,
        }
    }

    /// Socket, memory type and power budget rules, in that order.
    pub fn standard(issue_penalty: f64) -> Self {
        Self::new(issue_penalty)
            .with_rule(SocketRule)
            .with_rule(MemoryTypeRule)
            .with_rule(PowerBudgetRule)
    }

    pub fn with_rule<R: CompatibilityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    pub fn check(&self, selection: &SelectionResult) -> CompatibilityReport {
        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|&&category| !selection.contains(category))
            .map(|category| format!("missing required component: {}", category))
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "selection is incomplete");
            return CompatibilityReport {
                compatible: false,
                message: CompatibilityReport::MISSING_COMPONENTS.to_string(),
                issues: missing,
                compatibility_score: 0.0,
            };
        }

        let issues: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let issue = rule.check(selection);
                if let Some(issue) = &issue {
                    debug!(rule = rule.name(), %issue, "compatibility rule failed");
                }
                issue
            })
            .collect();

        let compatible = issues.is_empty();
        let compatibility_score = (100.0 - self.issue_penalty * issues.len() as f64).max(0.0);
        CompatibilityReport {
            compatible,
            message: if compatible {
                CompatibilityReport::COMPATIBLE
            } else {
                CompatibilityReport::INCOMPATIBLE
            }
            .to_string(),
            issues,
            compatibility_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{watts, CompatibilityChecker, CompatibilityReport, CompatibilityRule};
    use crate::{
        component::{Category, Component},
        selection::SelectionResult,
    };

    fn build(cpu_socket: &str, board_socket: &str) -> SelectionResult {
        vec![
            Component::new(1, "cpu", Category::Cpu, 200.0).with_spec("socket", cpu_socket),
            Component::new(2, "board", Category::Motherboard, 150.0)
                .with_spec("Socket", board_socket),
            Component::new(3, "ram", Category::Ram, 80.0),
            Component::new(4, "ssd", Category::Storage, 90.0),
            Component::new(5, "psu", Category::Psu, 70.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_missing_components_short_circuit() {
        let mut selection = build("AM4", "LGA1700");
        let mut parts = selection.clone().into_components();
        parts.retain(|c| c.category != Category::Ram && c.category != Category::Psu);
        selection = parts.into_iter().collect();

        let report = CompatibilityChecker::default().check(&selection);
        assert!(!report.compatible);
        assert_eq!(report.compatibility_score, 0.0);
        assert_eq!(report.message, CompatibilityReport::MISSING_COMPONENTS);
        // no socket complaint even though the sockets differ
        assert_eq!(
            report.issues,
            vec![
                "missing required component: ram".to_string(),
                "missing required component: psu".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_selection() {
        let report = CompatibilityChecker::default().check(&SelectionResult::new());
        assert_eq!(report.issues.len(), 5);
        assert_eq!(report.compatibility_score, 0.0);
    }

    #[test]
    fn test_matching_sockets() {
        let report = CompatibilityChecker::default().check(&build("AM4", "AM4"));
        assert!(report.compatible);
        assert_eq!(report.compatibility_score, 100.0);
        assert_eq!(report.message, CompatibilityReport::COMPATIBLE);
        assert!(report.issues.is_empty());
        assert_eq!(report.normalized_score(), 1.0);
    }

    #[test]
    fn test_socket_mismatch() {
        let report = CompatibilityChecker::default().check(&build("AM4", "LGA1700"));
        assert!(!report.compatible);
        assert_eq!(report.compatibility_score, 75.0);
        assert_eq!(report.message, CompatibilityReport::INCOMPATIBLE);
        assert_eq!(
            report.issues,
            vec!["CPU socket (AM4) incompatible with motherboard (LGA1700)".to_string()]
        );
        assert_eq!(report.normalized_score(), 0.75);
    }

    #[test]
    fn test_unknown_socket_is_not_an_issue() {
        let mut selection = build("AM4", "AM4");
        selection.insert(Component::new(2, "board", Category::Motherboard, 150.0));
        let report = CompatibilityChecker::default().check(&selection);
        assert!(report.compatible);
        assert_eq!(report.compatibility_score, 100.0);
    }

    #[test]
    fn test_memory_type() {
        let mut selection = build("AM4", "AM4");
        selection.insert(
            Component::new(2, "board", Category::Motherboard, 150.0)
                .with_spec("socket", "AM4")
                .with_spec("memory_support", "DDR4/DDR5"),
        );
        selection.insert(Component::new(3, "ram", Category::Ram, 80.0).with_spec("type", "ddr5"));
        assert!(CompatibilityChecker::default().check(&selection).compatible);

        selection.insert(
            Component::new(2, "board", Category::Motherboard, 150.0)
                .with_spec("socket", "AM4")
                .with_spec("memory_support", "DDR4"),
        );
        let report = CompatibilityChecker::default().check(&selection);
        assert_eq!(
            report.issues,
            vec!["RAM type (ddr5) not supported by motherboard (DDR4)".to_string()]
        );
    }

    #[test]
    fn test_power_budget() {
        let mut selection = build("AM4", "AM4");
        selection.insert(Component::new(5, "psu", Category::Psu, 70.0).with_spec("wattage", "450W"));
        selection.insert(
            Component::new(1, "cpu", Category::Cpu, 200.0)
                .with_spec("socket", "AM4")
                .with_power(125),
        );
        assert!(CompatibilityChecker::default().check(&selection).compatible);

        selection.insert(Component::new(6, "gpu", Category::Gpu, 900.0).with_power(450));
        let report = CompatibilityChecker::default().check(&selection);
        assert_eq!(
            report.issues,
            vec!["PSU wattage (450W) below estimated draw (575 W)".to_string()]
        );
    }

    #[test]
    fn test_huge_draws_do_not_wrap() {
        let mut selection = build("AM4", "AM4");
        selection.insert(Component::new(5, "psu", Category::Psu, 70.0).with_spec("wattage", "850W"));
        selection.insert(
            Component::new(1, "cpu", Category::Cpu, 200.0)
                .with_spec("socket", "AM4")
                .with_power(3_000_000_000),
        );
        selection.insert(
            Component::new(2, "board", Category::Motherboard, 150.0)
                .with_spec("socket", "AM4")
                .with_power(2_000_000_000),
        );
        let report = CompatibilityChecker::default().check(&selection);
        assert_eq!(
            report.issues,
            vec!["PSU wattage (850W) below estimated draw (5000000000 W)".to_string()]
        );
    }

    #[test]
    fn test_blank_specs_are_unknown() {
        let mut selection = build("AM4", "AM4");
        selection.insert(
            Component::new(1, "cpu", Category::Cpu, 200.0)
                .with_spec("socket", "")
                .with_power(65),
        );
        let report = CompatibilityChecker::default().check(&selection);
        assert!(report.compatible);
        assert_eq!(report.compatibility_score, 100.0);

        selection.insert(
            Component::new(2, "board", Category::Motherboard, 150.0)
                .with_spec("socket", "AM4")
                .with_spec("memory_support", "  "),
        );
        selection.insert(Component::new(3, "ram", Category::Ram, 80.0).with_spec("type", "DDR5"));
        assert!(CompatibilityChecker::default().check(&selection).compatible);
    }

    #[test]
    fn test_score_is_clamped() {
        struct AlwaysFails;
        impl CompatibilityRule for AlwaysFails {
            fn name(&self) -> &'static str {
                "always"
            }
            fn check(&self, _: &SelectionResult) -> Option<String> {
                Some("nope".to_string())
            }
        }

        let mut checker = CompatibilityChecker::standard(25.0);
        for _ in 0..5 {
            checker = checker.with_rule(AlwaysFails);
        }
        let report = checker.check(&build("AM4", "AM4"));
        assert_eq!(report.issues.len(), 5);
        assert_eq!(report.compatibility_score, 0.0);
        assert!(!report.compatible);
    }

    #[test]
    fn test_watts() {
        assert_eq!(watts("750W"), Some(750.0));
        assert_eq!(watts(" 850 W"), Some(850.0));
        assert_eq!(watts("plenty"), None);
    }
}
