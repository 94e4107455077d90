//! `catalog` command: report where the catalog comes from and how big it is.

use clap::Args;

use crate::cli::common::{print_json, print_warning, CliResult, GlobalArgs};

/// Load the catalog and report its status
#[derive(Args, Debug)]
pub struct CatalogStatusArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl CatalogStatusArgs {
    /// Execute catalog command
    pub fn execute(&self, global: &GlobalArgs) -> CliResult<()> {
        let (config, matcher) = global.matcher()?;
        let status = matcher.catalog_status();

        if self.json {
            return print_json(&status);
        }

        print_warning(status.warning.as_deref());
        println!("Catalog source: {}", status.source);
        println!("Colors loaded:  {}", status.rows);
        println!("Cache state:    {:?}", status.state);
        println!("Cache TTL:      {}s", config.catalog.cache_ttl_secs);
        Ok(())
    }
}
