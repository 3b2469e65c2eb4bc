//! # Interactive Session
//!
//! Line-oriented front end: show the categories, read one selection per
//! line, run the recommendation, show the outcome, go back to idle.
//! Nothing carries over from one interaction to the next.
//!
//! ## Input
//!
//! - `3` picks the third listed category
//! - `genre <text>` searches cluster labels for `<text>`
//! - `list` shows the categories again
//! - `quit` / `exit` / end of input leaves
//! - `trending` picks the chart, unless a cluster has that exact name
//! - anything else is a category name if it matches one exactly,
//!   otherwise a free-text genre

use crate::catalog::CatalogSearch;
use crate::presentation::{self, Outcome, RenderOptions};
use crate::recommender::Recommender;
use crate::resolver::CategorySelection;
use anyhow::Result;
use log::debug;
use rand::Rng;
use std::io::{BufRead, Write};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Select(CategorySelection),
    List,
    Quit,
    Empty,
    /// A number outside the listed range.
    BadIndex(usize),
}

/// Interpret one line against the current category list.
#[must_use]
pub fn parse_input(line: &str, categories: &[String]) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    match line.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Input::Quit,
        "list" | "ls" => return Input::List,
        _ => {}
    }

    if let Ok(index) = line.parse::<usize>() {
        return match index.checked_sub(1).and_then(|i| categories.get(i)) {
            Some(category) => Input::Select(CategorySelection::from_category(category, categories)),
            None => Input::BadIndex(index),
        };
    }

    let is_category = categories.iter().any(|category| category == line);
    if is_category || line.eq_ignore_ascii_case("trending") {
        return Input::Select(CategorySelection::from_category(line, categories));
    }

    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let genre = if head.eq_ignore_ascii_case("genre") {
        rest.trim()
    } else {
        line
    };

    if genre.is_empty() {
        Input::Empty
    } else {
        Input::Select(CategorySelection::FreeTextGenre(genre.to_string()))
    }
}

/// Drives the read-resolve-render loop.
pub struct Session<'a, C, R: ?Sized> {
    recommender: &'a Recommender<'a, C>,
    rng: &'a mut R,
    options: RenderOptions,
}

impl<'a, C, R> Session<'a, C, R>
where
    C: CatalogSearch,
    R: Rng + ?Sized,
{
    pub fn new(recommender: &'a Recommender<'a, C>, rng: &'a mut R, options: RenderOptions) -> Self {
        Self {
            recommender,
            rng,
            options,
        }
    }

    /// Run until `quit` or end of input. Returns how many recommendations
    /// were attempted.
    ///
    /// # Errors
    ///
    /// Only I/O errors on `input`/`out` end the session; recommendation
    /// failures are shown and the loop continues.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> Result<usize> {
        let categories = self.recommender.categories();
        writeln!(out, "🎵 Music Recommender")?;
        writeln!(out, "Discover new music based on genre clusters or trending songs!")?;
        presentation::render_categories(out, &categories)?;
        prompt(out)?;

        let mut attempts = 0;
        for line in input.lines() {
            let line = line?;
            match parse_input(&line, &categories) {
                Input::Quit => break,
                Input::Empty => {}
                Input::List => presentation::render_categories(out, &categories)?,
                Input::BadIndex(index) => {
                    writeln!(out, "No category #{index}, pick 1-{}", categories.len())?;
                }
                Input::Select(selection) => {
                    debug!("Session selection: {selection:?}");
                    writeln!(out, "Finding the perfect song...")?;
                    let result = self.recommender.recommend(&selection, &mut *self.rng);
                    presentation::render(out, &Outcome::from_result(&result), self.options)?;
                    attempts += 1;
                }
            }
            prompt(out)?;
        }

        writeln!(out)?;
        Ok(attempts)
    }
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
