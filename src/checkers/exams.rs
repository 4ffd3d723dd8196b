use super::rules::{RuleSet, normalize};
use crate::core::{
    domain::{CheckOutcome, Hint},
    traits::checker::{Checker, CheckerError},
};

const STUDENTS: usize = 5;
const FIRST_LINE: &str = "Spustam generovanie skusok pre studentov";
const LAST_LINE: &str = "Generovanie skusok dokoncene";

/// `for` loop exercise: generate an exam for each of five students and
/// report progress line by line.
#[derive(Debug)]
pub struct ExamsChecker {
    rules: RuleSet,
}

impl Default for ExamsChecker {
    fn default() -> Self {
        let rules = RuleSet::new("Task complete! Excellent work!")
            .require(
                r"intpocetstudentov=5;",
                "Error: the variable 'pocetStudentov' is not defined correctly. Expected: int pocetStudentov = 5;",
            )
            .require(
                r"for\(inti=1;i<=pocetstudentov;i\+\+\)",
                "Error: the for loop is not written correctly. Expected: for (int i = 1; i <= pocetStudentov; i++)",
            )
            .require(
                r#"system\.out\.println\("generovanieskusokdokoncene\."\);"#,
                "Error: the closing message is wrong. Expected: System.out.println(\"Generovanie skusok dokoncene.\");",
            );
        Self { rules }
    }
}

fn student_line(id: usize) -> String {
    format!("Skuska pre studenta s id:{id} bola vygenerovana.")
}

/// Line-by-line expectations on the program output.
fn output_failures(stdout: &str) -> Vec<String> {
    let lines: Vec<&str> = stdout
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();
    let minimum = STUDENTS + 2;

    if lines.len() < minimum {
        return vec![format!(
            "Error: the output has too few lines ({} of at least {}).",
            lines.len(),
            minimum
        )];
    }

    let mut failures = Vec::new();
    if !lines[0].contains(FIRST_LINE) {
        failures.push(format!(
            "Error: the first line of output should contain '{FIRST_LINE}...'"
        ));
    }
    if !lines[1].contains(&format!("Pocet studentov: {STUDENTS}")) {
        failures.push(format!(
            "Error: the second line of output should contain 'Pocet studentov: {STUDENTS}'"
        ));
    }

    let body = &lines[2..lines.len() - 1];
    for id in 1..=STUDENTS {
        let expected = student_line(id);
        if !body.iter().any(|line| line.contains(&expected)) {
            failures.push(format!(
                "Error: the output has no message for student #{id}. Expected: '{expected}'"
            ));
        }
    }

    if !lines[lines.len() - 1].contains(LAST_LINE) {
        failures.push(format!(
            "Error: the last line of output should contain '{LAST_LINE}.'"
        ));
    }
    failures
}

impl Checker for ExamsChecker {
    fn full_check(
        &self,
        source: &str,
        stdout: &str,
        _stderr: &str,
    ) -> Result<CheckOutcome, CheckerError> {
        let mut failures = self.rules.failures(&normalize(source), stdout)?;
        failures.extend(output_failures(stdout));
        Ok(self.rules.verdict(failures))
    }

    fn partial_check(&self, source: &str) -> Result<Hint, CheckerError> {
        let normalized = normalize(source);

        let hint = if !normalized.contains("pocetstudentov") {
            Some("Tip: you need a variable holding the number of students.")
        } else if !normalized.contains("pocetstudentov=5") {
            Some("Tip: the number of students should be 5.")
        } else if !normalized.contains("for(") {
            Some("Tip: you need a for loop running once per student.")
        } else if !normalized.contains("inti=1") {
            Some("Tip: the loop should start at 1.")
        } else if !normalized.contains("system.out.println") {
            Some("Tip: did you forget to print the messages?")
        } else {
            None
        };

        Ok(hint.map(Hint::available).unwrap_or(Hint::Unavailable))
    }
}
