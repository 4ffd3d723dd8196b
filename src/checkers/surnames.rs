use itertools::Itertools;

use super::rules::{RuleSet, normalize};
use crate::core::{
    domain::{CheckOutcome, Hint},
    traits::checker::{Checker, CheckerError},
};

/// Surnames as the program is expected to print them.
pub const TEACHERS: [&str; 7] = [
    "Janech",
    "Ďuračík",
    "Kvet",
    "Meško",
    "Tóth",
    "Petríková",
    "Gregorová",
];

/// Array exercise: store every teacher's surname and print them in a loop.
#[derive(Debug)]
pub struct SurnamesChecker {
    rules: RuleSet,
}

impl Default for SurnamesChecker {
    fn default() -> Self {
        let rules = RuleSet::new("Excellent! All teachers are listed correctly!")
            .require(
                r"string\[\]priezviska=\{.*\}",
                "Wrong array declaration. Use: String[] priezviska = {...}",
            )
            .require(
                r"for\(inti=0;i<priezviska\.length;i\+\+\)",
                "You need a proper for loop over the array.",
            );
        Self { rules }
    }
}

fn missing_in_source(normalized: &str) -> Vec<&'static str> {
    TEACHERS
        .iter()
        .copied()
        .filter(|teacher| !normalized.contains(&teacher.to_lowercase()))
        .collect()
}

fn missing_in_output(stdout: &str) -> Vec<&'static str> {
    TEACHERS
        .iter()
        .copied()
        .filter(|teacher| !stdout.contains(teacher))
        .collect()
}

impl Checker for SurnamesChecker {
    fn full_check(
        &self,
        source: &str,
        stdout: &str,
        _stderr: &str,
    ) -> Result<CheckOutcome, CheckerError> {
        let normalized = normalize(source);
        let mut failures = self.rules.failures(&normalized, stdout)?;

        let missing = missing_in_source(&normalized);
        if !missing.is_empty() {
            failures.push(format!(
                "These teachers are missing: {}",
                missing.iter().join(", ")
            ));
        }
        let missing = missing_in_output(stdout);
        if !missing.is_empty() {
            failures.push(format!(
                "The output does not contain: {}",
                missing.iter().join(", ")
            ));
        }

        Ok(self.rules.verdict(failures))
    }

    fn partial_check(&self, source: &str) -> Result<Hint, CheckerError> {
        let normalized = normalize(source);

        if !normalized.contains("string[]priezviska") {
            return Ok(Hint::available(
                "You forgot to create the 'priezviska' array.",
            ));
        }
        if !normalized.contains("for(inti=0;") {
            return Ok(Hint::available(
                "You are missing a for loop to walk through the array.",
            ));
        }
        let missing = missing_in_source(&normalized);
        if !missing.is_empty() {
            return Ok(Hint::Available(format!(
                "Still to add: {}",
                missing.iter().join(", ")
            )));
        }

        Ok(Hint::Unavailable)
    }
}
