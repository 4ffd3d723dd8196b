//! Checkers for the exercises shipped with the game.

pub mod chairs;
pub mod door;
pub mod exams;
pub mod password;
pub mod room;
pub mod rules;
pub mod surnames;
pub mod while_loop;

use crate::core::traits::checker::Checker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Exercise {
    /// Door class with a constructor and unlock method.
    Door,
    /// Door code assembled from variables.
    Password,
    /// Endless loop stopped by a flag.
    WhileLoop,
    /// Monitors vs. chairs `if` conditions.
    Chairs,
    /// Room class with a five-argument constructor.
    Room,
    /// Exam generation `for` loop.
    Exams,
    /// Array of teacher surnames.
    Surnames,
}

impl Exercise {
    /// Builds a fresh checker for one grading session.
    pub fn checker(self) -> Box<dyn Checker> {
        match self {
            Exercise::Door => Box::new(door::checker()),
            Exercise::Password => Box::new(password::checker()),
            Exercise::WhileLoop => Box::new(while_loop::checker()),
            Exercise::Chairs => Box::new(chairs::ChairsChecker::default()),
            Exercise::Room => Box::new(room::checker()),
            Exercise::Exams => Box::new(exams::ExamsChecker::default()),
            Exercise::Surnames => Box::new(surnames::SurnamesChecker::default()),
        }
    }
}
