use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docs-mdx-migrator")]
#[command(about = "Analyze scraped documentation pages and migrate them to MDX")]
#[command(version)]
pub struct Args {
    /// JSON rule table replacing the built-in keyword tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every extracted page and write the report and migration plan
    Analyze {
        /// Directory of extracted page records
        #[arg(long, default_value = "./extracted-docs/data")]
        input: PathBuf,

        #[arg(long, default_value = "./content-analysis-report.json")]
        report: PathBuf,

        #[arg(long, default_value = "./migration-plan.json")]
        plan: PathBuf,
    },

    /// Convert the phase-1 pages of an existing plan to MDX files
    Migrate {
        /// Directory of extracted page records
        #[arg(long, default_value = "./extracted-docs/data")]
        input: PathBuf,

        /// Directory the MDX documents are written to
        #[arg(long, default_value = "./migrated-content")]
        output: PathBuf,

        #[arg(long, default_value = "./migration-plan.json")]
        plan: PathBuf,

        #[arg(long, default_value = "./content-analysis-report.json")]
        report: PathBuf,

        /// Per-page failures, written only when some page failed
        #[arg(long, default_value = "./migration-errors.log")]
        errors: PathBuf,
    },

    /// Print the MDX document for one page record
    Convert {
        /// Page record JSON file
        file: PathBuf,
    },
}
