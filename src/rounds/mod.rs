use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;

use include_dir::{include_dir, Dir};
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::game::Word;

static ROUND_DIR: Dir = include_dir!("src/rounds");

/// One sentence-construction puzzle: a template whose `{}` markers are the
/// blanks, the word tokens in presentation order, and the correct id for each
/// blank. Words beyond the answer key act as distractors.
#[derive(Deserialize, Clone, Debug)]
pub struct Round {
    pub name: String,
    pub title: String,
    pub template: String,
    pub words: Vec<Word>,
    pub answer_key: Vec<String>,
}

/// A rendered fragment of the sentence: literal text or the n-th blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Blank(usize),
}

impl Round {
    /// Load a bundled round by file stem. Bundled assets are trusted;
    /// corruption is a packaging bug.
    pub fn builtin(name: &str) -> Self {
        Self::bundled(name).expect("Round file not found")
    }

    /// Fallible lookup of a bundled round, for names that come from user
    /// configuration rather than code.
    pub fn bundled(name: &str) -> Result<Self, Box<dyn Error>> {
        let round = read_round_from_dir(&format!("{}.json", name))?;
        round.validate()?;
        Ok(round)
    }

    /// Pick one of the bundled rounds at random.
    pub fn random() -> Self {
        let names: Vec<&str> = ROUND_DIR
            .files()
            .filter(|f| f.path().extension().map_or(false, |e| e == "json"))
            .filter_map(|f| f.path().file_stem()?.to_str())
            .collect();
        let mut rng = rand::thread_rng();
        let name = names.choose(&mut rng).expect("no bundled rounds");
        Self::builtin(name)
    }

    /// Load and validate a user-supplied round file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let round: Round = from_str(&contents)?;
        round.validate()?;
        Ok(round)
    }

    pub fn blank_count(&self) -> usize {
        self.template.matches("{}").count()
    }

    /// Split the template into text and blank pieces, blanks numbered in
    /// order of appearance.
    pub fn pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut blank = 0;
        let mut rest = self.template.as_str();

        while let Some(pos) = rest.find("{}") {
            if pos > 0 {
                pieces.push(Piece::Text(rest[..pos].to_string()));
            }
            pieces.push(Piece::Blank(blank));
            blank += 1;
            rest = &rest[pos + 2..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Text(rest.to_string()));
        }

        pieces
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let blanks = self.blank_count();
        if blanks == 0 {
            return Err(format!("round '{}' has no blanks", self.name).into());
        }
        if blanks != self.answer_key.len() {
            return Err(format!(
                "round '{}' has {} blanks but {} answer key entries",
                self.name,
                blanks,
                self.answer_key.len()
            )
            .into());
        }

        if let Some(dup) = self.words.iter().map(|w| &w.id).duplicates().next() {
            return Err(format!("round '{}' defines word id '{}' twice", self.name, dup).into());
        }
        if let Some(dup) = self.answer_key.iter().duplicates().next() {
            return Err(format!(
                "round '{}' uses answer id '{}' for more than one blank",
                self.name, dup
            )
            .into());
        }
        for id in &self.answer_key {
            if !self.words.iter().any(|w| &w.id == id) {
                return Err(format!(
                    "round '{}' answer id '{}' is not a configured word",
                    self.name, id
                )
                .into());
            }
        }

        Ok(())
    }
}

fn read_round_from_dir(file_name: &str) -> Result<Round, Box<dyn Error>> {
    let file = ROUND_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("round file '{}' not bundled", file_name))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or("unable to interpret round file as a string")?;

    let round = from_str(file_as_str)?;
    Ok(round)
}
