use std::sync::LazyLock;

use regex::Regex;

use super::rules::{RuleSet, normalize};
use crate::{
    constants::PLACEHOLDER,
    core::{
        domain::{CheckOutcome, Hint},
        traits::checker::{Checker, CheckerError},
    },
};

static MONITORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"intmonitory=(\d+);").expect("monitors pattern is valid"));
static CHAIRS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"intstolicky=(\d+);").expect("chairs pattern is valid"));

const MORE_CHAIRS_OUTPUT: &str = "Stoličiek je viac ako monitorov, netreba dokupovať.";
const EQUAL_OUTPUT: &str = "Počet stoličiek sa rovná počtu monitorov, netreba nič dokupovať.";

/// `if` exercise: compare monitors with chairs and say how many chairs to
/// buy. The expected output depends on the numbers the learner picked.
#[derive(Debug)]
pub struct ChairsChecker {
    rules: RuleSet,
}

impl Default for ChairsChecker {
    fn default() -> Self {
        let rules = RuleSet::new("Task complete! Excellent work!")
            .placeholder_guard("Error: there are still unfilled '___' placeholders.")
            .require(
                r"intmonitory=\d+;",
                "Error: the variable 'monitory' is missing or initialized incorrectly.",
            )
            .require(
                r"intstolicky=\d+;",
                "Error: the variable 'stolicky' is missing or initialized incorrectly.",
            )
            .require(
                r"if\(monitory>stolicky\)",
                "Error: missing the condition for more monitors than chairs.",
            )
            .require(
                r"if\(monitory<stolicky\)",
                "Error: missing the condition for more chairs than monitors.",
            )
            .require(
                r"if\(monitory==stolicky\)",
                "Error: missing the condition for equal numbers of chairs and monitors.",
            );
        Self { rules }
    }
}

fn declared(re: &Regex, normalized: &str) -> Option<u64> {
    re.captures(normalized)?.get(1)?.as_str().parse().ok()
}

/// What the program has to print for the given counts.
pub fn expected_output(monitors: u64, chairs: u64) -> String {
    if monitors > chairs {
        let missing = monitors - chairs;
        let noun = if missing == 1 { "stoličku" } else { "stoličky" };
        format!("Treba dokúpiť {missing} {noun}.")
    } else if monitors < chairs {
        MORE_CHAIRS_OUTPUT.to_string()
    } else {
        EQUAL_OUTPUT.to_string()
    }
}

impl Checker for ChairsChecker {
    fn full_check(
        &self,
        source: &str,
        stdout: &str,
        _stderr: &str,
    ) -> Result<CheckOutcome, CheckerError> {
        let normalized = normalize(source);
        let mut failures = self.rules.failures(&normalized, stdout)?;

        if let (Some(monitors), Some(chairs)) = (
            declared(&MONITORS_RE, &normalized),
            declared(&CHAIRS_RE, &normalized),
        ) {
            let expected = expected_output(monitors, chairs);
            if !stdout.contains(&expected) {
                failures.push(format!(
                    "Error: the program did not print the right message. Expected: '{expected}'"
                ));
            }
        }

        Ok(self.rules.verdict(failures))
    }

    fn partial_check(&self, source: &str) -> Result<Hint, CheckerError> {
        let normalized = normalize(source);

        if normalized.contains(PLACEHOLDER) {
            let mut hint = String::from("There are still unfilled places (___). Check:");
            if normalized.contains("intmonitory=___") {
                hint.push_str("\n- fill in the number of monitors (a whole number)");
            }
            if normalized.contains("intstolicky=___") {
                hint.push_str("\n- fill in the number of chairs (a whole number)");
            }
            return Ok(Hint::Available(hint));
        }

        if !normalized.contains("if(") {
            return Ok(Hint::available(
                "You need if conditions to compare monitors and chairs.",
            ));
        }

        let conditions = [
            ("monitory>", "Missing the condition for more monitors."),
            ("monitory<", "Missing the condition for more chairs."),
            ("monitory==", "Missing the condition for equal numbers."),
        ];
        Ok(conditions
            .iter()
            .find(|(needle, _)| !normalized.contains(needle))
            .map(|(_, hint)| Hint::available(*hint))
            .unwrap_or(Hint::Unavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(monitors: &str, chairs: &str) -> String {
        format!(
            r#"
public class Main {{
    public static void main(String[] args) {{
        int monitory = {monitors};
        int stolicky = {chairs};
        if (monitory > stolicky) {{
            int rozdiel = monitory - stolicky;
            System.out.println("Treba dokúpiť " + rozdiel + (rozdiel == 1 ? " stoličku." : " stoličky."));
        }}
        if (monitory < stolicky) {{
            System.out.println("Stoličiek je viac ako monitorov, netreba dokupovať.");
        }}
        if (monitory == stolicky) {{
            System.out.println("Počet stoličiek sa rovná počtu monitorov, netreba nič dokupovať.");
        }}
    }}
}}
"#
        )
    }

    #[test]
    fn test_expected_output() {
        assert_eq!(expected_output(12, 11), "Treba dokúpiť 1 stoličku.");
        assert_eq!(expected_output(20, 17), "Treba dokúpiť 3 stoličky.");
        assert_eq!(expected_output(3, 9), MORE_CHAIRS_OUTPUT);
        assert_eq!(expected_output(5, 5), EQUAL_OUTPUT);
    }

    #[test]
    fn test_solution_passes_for_any_numbers() {
        let checker = ChairsChecker::default();

        for (monitors, chairs, stdout) in [
            ("20", "17", "Treba dokúpiť 3 stoličky.\n"),
            ("4", "9", "Stoličiek je viac ako monitorov, netreba dokupovať.\n"),
            ("7", "7", "Počet stoličiek sa rovná počtu monitorov, netreba nič dokupovať.\n"),
        ] {
            let outcome = checker
                .full_check(&solution(monitors, chairs), stdout, "")
                .unwrap();
            assert!(outcome.success, "{monitors}/{chairs}: {}", outcome.message);
        }
    }

    #[test]
    fn test_output_must_match_declared_numbers() {
        let outcome = ChairsChecker::default()
            .full_check(&solution("20", "17"), "Treba dokúpiť 2 stoličky.\n", "")
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "Error: the program did not print the right message. Expected: 'Treba dokúpiť 3 stoličky.'"
        );
    }

    #[test]
    fn test_missing_condition_and_output_both_reported() {
        let source = solution("3", "9").replace("if (monitory == stolicky)", "if (false)");

        let outcome = ChairsChecker::default().full_check(&source, "", "").unwrap();

        assert_eq!(outcome.message.lines().count(), 2);
        assert!(outcome.message.contains("equal numbers"));
        assert!(outcome.message.contains(MORE_CHAIRS_OUTPUT));
    }

    #[test]
    fn test_partial_check_placeholders() {
        let hint = ChairsChecker::default()
            .partial_check(&solution("___", "5"))
            .unwrap();

        assert_eq!(
            hint,
            Hint::available(
                "There are still unfilled places (___). Check:\n- fill in the number of monitors (a whole number)"
            )
        );
    }

    #[test]
    fn test_partial_check_first_missing_condition() {
        let source = solution("3", "9")
            .replace("if (monitory < stolicky)", "if (false)")
            .replace("if (monitory == stolicky)", "if (false)");

        let hint = ChairsChecker::default().partial_check(&source).unwrap();

        assert_eq!(hint, Hint::available("Missing the condition for more chairs."));
    }

    #[test]
    fn test_partial_check_without_conditions() {
        let hint = ChairsChecker::default()
            .partial_check("int monitory = 3; int stolicky = 4;")
            .unwrap();

        assert_eq!(
            hint,
            Hint::available("You need if conditions to compare monitors and chairs.")
        );
    }
}
