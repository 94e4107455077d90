//! `lookup` command: show one catalog entry by code.

use clap::Args;

use crate::cli::common::{print_json, print_warning, CliError, CliResult, GlobalArgs};

/// Show a catalog color by its code
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Catalog code, e.g. "18-1664 TPX" (case-insensitive)
    #[arg(value_name = "CODE")]
    code: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl LookupArgs {
    /// Execute lookup command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        let (_, matcher) = global.matcher()?;

        let Some(entry) = matcher.find_by_code(&self.code) else {
            if let Some(snapshot) = matcher.cache().current() {
                print_warning(snapshot.warning.as_deref());
            }
            return Err(CliError::validation(format!(
                "Color code not found: {}",
                self.code
            )));
        };

        if self.json {
            return print_json(&entry);
        }

        println!("{}  {}", entry.code, entry.name);
        println!("  Hex:  {}", entry.hex);
        if let Some(lab) = entry.rgb().map(|rgb| rgb.to_lab()) {
            println!("  Lab:  L {:.2}  a {:.2}  b {:.2}", lab.l, lab.a, lab.b);
        }
        if let Some(swatch) = &entry.swatch_url {
            println!("  Swatch: {swatch}");
        }
        Ok(())
    }
}
