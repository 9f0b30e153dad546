/// Terminal prompts for the decisions the matcher leaves to the operator
use crate::cli::interactive::{print_header, show_warning};
use crate::core::resolver::{Selection, TaxonomyResolver};
use crate::TaxAnnotateError;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

pub struct ConsoleResolver {
    theme: ColorfulTheme,
}

impl ConsoleResolver {
    /// Fails when stdin is not a terminal, since every prompt would block
    pub fn new() -> Result<Self, TaxAnnotateError> {
        if !atty::is(atty::Stream::Stdin) {
            return Err(TaxAnnotateError::Prompt(
                "stdin is not a terminal; supply an answer sheet with --answers".to_string(),
            ));
        }
        Ok(Self {
            theme: ColorfulTheme::default(),
        })
    }
}

fn prompt_error(e: dialoguer::Error) -> TaxAnnotateError {
    TaxAnnotateError::Prompt(e.to_string())
}

impl TaxonomyResolver for ConsoleResolver {
    fn choose(
        &mut self,
        source_name: &str,
        candidates: &[String],
        _reference: &str,
    ) -> Result<Selection, TaxAnnotateError> {
        print_header(&format!("{} matches more than one unique taxonomy.", source_name));
        println!("Choose the valid taxonomy from the list below:\n");
        for (num, candidate) in candidates.iter().enumerate() {
            println!("{} {}", num.to_string().bold(), candidate);
        }
        println!();

        let answer: String = Input::with_theme(&self.theme)
            .with_prompt("Choose taxonomy number or \"n\" if none of these")
            .interact_text()
            .map_err(prompt_error)?;

        Ok(Selection::parse(&answer).unwrap_or_else(|| {
            show_warning(&format!(
                "'{}' is not a candidate number, switching to manual entry",
                answer.trim()
            ));
            Selection::NoneOfThese
        }))
    }

    fn confirm_family(&mut self, source_name: &str, candidate: &str) -> Result<bool, TaxAnnotateError> {
        print_header(&format!("{} nearest match to family level:", source_name));
        println!("{}\n", candidate.green());

        Confirm::with_theme(&self.theme)
            .with_prompt("Do you approve?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn manual_entry(&mut self, source_name: &str, reference: &str) -> Result<String, TaxAnnotateError> {
        print_header(&format!("{} has no matches to {}.", source_name, reference));
        println!("Perform a manual search of your reference database to");
        println!("match the nearest basal lineage.\n");

        let lineage: String = Input::with_theme(&self.theme)
            .with_prompt("Enter the correct taxonomy for the basal lineage")
            .interact_text()
            .map_err(prompt_error)?;

        Ok(lineage.trim().to_string())
    }
}
