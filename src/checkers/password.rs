//! Password exercise: the learner reads facts off the room and assembles
//! the door code from them.

use super::rules::RuleSet;

pub const EXPECTED_OUTPUT: &str = "O je: 813A222";

pub fn checker() -> RuleSet {
    RuleSet::new("Task complete! Great work!")
        .require(
            r"intpocetokien=8;",
            "Error: variable 'pocetOkien' is wrong! Tip: count the windows.",
        )
        .require(
            r"intcashodina=13;",
            "Error: variable 'casHodina' is wrong! Tip: check the clock next to the computer.",
        )
        .require(
            r#"stringmenomiestnosti="ra222";"#,
            "Error: variable 'menoMiestnosti' is wrong! Tip: look at the label by the door.",
        )
        .require(
            r"booleanvonkujetma=false;",
            "Error: variable 'vonkuJeTma' is wrong! Tip: true if it is dark outside, false during the day.",
        )
        .require(
            r"charaktualnyblok='a';",
            "Error: variable 'aktualnyBlok' is wrong! Tip: the block is the second letter of the room code (RB002 is block B).",
        )
        .require(
            r"substring\(2,5\)",
            "Error: missing the call 'substring(2, 5)' on 'menoMiestnosti'.",
        )
        .require(
            r"boolean\.compare\(",
            "Error: missing the call 'Boolean.compare(vonkuJeTma, false)' in the output.",
        )
        .require(
            r#"system\.out\.println\("oje:""#,
            "Error: expected a call like 'System.out.println(\"O je: \" + ...)'.",
        )
        .expect_output(EXPECTED_OUTPUT, "Error: the output is not correct.")
}
