//! Endless `while` loop exercise stopped by a flag and `break`.

use super::rules::RuleSet;

pub const EXPECTED_OUTPUT: &str = "Program ukončený!";

pub fn checker() -> RuleSet {
    RuleSet::new("Task complete! Great work!")
        .placeholder_guard(
            "Error: the code still contains the '___' placeholder. Fill in every missing value and operator.",
        )
        .require(
            r"booleanzastav=false;",
            "Error: 'zastav' must be declared as boolean and initialized to false (e.g. 'boolean zastav = false;').",
        )
        .require(
            r"if\(zastav==true\)\{[^}]*break;",
            "Error: the loop needs the condition 'if (zastav == true)' with a 'break;' inside its block.",
        )
        .require(
            r"while\(true\)\{.*zastav=true;",
            "Error: the loop should contain a statement that sets 'zastav' to true.",
        )
        .require(
            r#"system\.out\.println\("programukončený!"\)"#,
            "Error: after the loop the program must print 'Program ukončený!'.",
        )
        .expect_output(
            EXPECTED_OUTPUT,
            format!("Error: the output is not correct. Expected: {EXPECTED_OUTPUT}"),
        )
}
