//! Room class exercise: five fields, a constructor assigning all of them and
//! one instance describing the room the player is standing in.

use super::rules::{RuleSet, SourceRule};

const COMPUTERS: u32 = 47;
const CHAIRS: u32 = 47;
const WINDOWS: u32 = 8;
const TABLES: u32 = 23;
const ROOM: &str = "RA013";

fn placeholder_hint() -> String {
    format!(
        "Fill in every '___' placeholder as the assignment asks:\n\n\
         In the constructor:\n\
         this.pocetPocitacov = pocetPocitacov;\n\
         this.pocetStolick = pocetStolick;\n\
         this.pocetOkien = pocetOkien;\n\
         this.pocetStolov = pocetStolov;\n\
         this.nazovMiestnosti = nazovMiestnosti;\n\n\
         In main():\n\
         new Miestnost({COMPUTERS}, {CHAIRS}, {WINDOWS}, {TABLES}, \"{ROOM}\");"
    )
}

pub fn checker() -> RuleSet {
    let instance = format!(
        r#"newmiestnost\({COMPUTERS},{CHAIRS},{WINDOWS},{TABLES},"{}"\)"#,
        ROOM.to_lowercase()
    );

    RuleSet::new("Task complete! Great work!")
        .placeholder_guard(placeholder_hint())
        .rule(SourceRule::all(
            &[
                r"privateintpocetpocitacov;",
                r"privateintpocetstolick;",
                r"privateintpocetokien;",
                r"privateintpocetstolov;",
                r"privatestringnazovmiestnosti;",
            ],
            "The class is missing some of the required field declarations.",
        ))
        .require(
            r"publicmiestnost\(intpocetpocitacov,intpocetstolick,intpocetokien,intpocetstolov,stringnazovmiestnosti\)",
            "The constructor must take 5 parameters (4 numbers, 1 string).",
        )
        .rule(SourceRule::all(
            &[
                r"this\.pocetpocitacov=pocetpocitacov;",
                r"this\.pocetstolick=pocetstolick;",
                r"this\.pocetokien=pocetokien;",
                r"this\.pocetstolov=pocetstolov;",
                r"this\.nazovmiestnosti=nazovmiestnosti;",
            ],
            "The constructor is missing some of the required assignments.",
        ))
        .rule(
            SourceRule::new(
                &instance,
                format!(
                    "Wrong arguments, expected: new Miestnost({COMPUTERS}, {CHAIRS}, {WINDOWS}, {TABLES}, \"{ROOM}\")"
                ),
            )
            .full_only(),
        )
}
