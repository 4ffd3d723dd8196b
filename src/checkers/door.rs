//! Door class exercise: a constructor that locks the door and unlocks it
//! right away, plus a query method used by `main`.

use super::rules::{RuleSet, SourceRule};

pub const EXPECTED_OUTPUT: &str = "Prístup je povolený.";

pub fn checker() -> RuleSet {
    RuleSet::new("Task complete! Great work!")
        .placeholder_guard(
            "Don't forget to replace every '___' placeholder with a concrete value.\n\
             Hint: think about the initial state of the door and what should happen to it once it is created.",
        )
        .require(
            r"zamknute=true;",
            "The door should start locked. Check the constructor.",
        )
        .require(
            r"publicdvere\(\)\{.*odomkni\(\);",
            "Creating the door should call the method that unlocks it.",
        )
        .require(
            r"odomkni\(\)\{.*zamknute=false;",
            "The odomkni() method should switch the door to unlocked.",
        )
        .require(
            r"odomkni\(\)\{.*system\.out\.println\(.*\);",
            "The odomkni() method should print a message about the door state.",
        )
        .require(
            r"suzamknute\(\)\{.*returnzamknute;",
            "The suZamknute() method should return the current door state.",
        )
        .rule(
            SourceRule::new(
                r"newdvere\(\)",
                "main() should create a new instance of the door.",
            )
            .full_only(),
        )
        .rule(
            SourceRule::new(
                r"if\(.*suzamknute\(\)\)",
                "main() should check the access condition.",
            )
            .full_only(),
        )
        .expect_output(
            EXPECTED_OUTPUT,
            format!("Wrong output. Expected: {EXPECTED_OUTPUT}"),
        )
}
