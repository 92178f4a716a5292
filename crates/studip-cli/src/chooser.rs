//! Interactive semester picker

use dialoguer::theme::ColorfulTheme;
use dialoguer::FuzzySelect;

use studip_core::{Error, Result, SemesterChooser};

/// Fuzzy-searchable list of semester titles on the terminal
pub struct TerminalChooser;

impl SemesterChooser for TerminalChooser {
    fn choose(&self, titles: &[String]) -> Result<Option<String>> {
        if titles.is_empty() {
            return Ok(None);
        }

        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select the current semester (Esc to cancel)")
            .items(titles)
            .default(titles.len() - 1)
            .interact_opt()
            .map_err(|e| Error::Prompt(e.to_string()))?;

        Ok(selection.and_then(|i| titles.get(i).cloned()))
    }
}
