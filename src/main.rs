use clap::Parser;
use std::path::Path;

use docs_mdx_migrator::migrate::{self, MigrateOptions};
use docs_mdx_migrator::rules::{self, RuleSet};
use docs_mdx_migrator::store::{self, PageStore};
use docs_mdx_migrator::{ConvertedDocument, MigrationError, PageRecord};
use docs_mdx_migrator::{aggregate, plan_migration, process_batch};

mod args;
use args::{Args, Command};

fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        ::log::error!("{}", e);
        std::process::exit(e.code() as i32);
    }
}

fn run(args: Args) -> Result<(), MigrationError> {
    let rules = match &args.config {
        Some(path) => {
            ::log::info!("loading rule table from {}", path.display());
            rules::install(RuleSet::from_file(path)?)?
        }
        None => rules::global(),
    };

    match args.command {
        Command::Analyze {
            input,
            report,
            plan,
        } => analyze(&input, &report, &plan, rules),
        Command::Migrate {
            input,
            output,
            plan,
            report,
            errors,
        } => {
            let options = MigrateOptions {
                input_dir: input,
                output_dir: output,
                plan_path: plan,
                report_path: report,
                errors_path: errors,
            };
            let summary = migrate::run(&options, rules)?;
            println!(
                "Migrated {} pages to {} ({} errors)",
                summary.written.len(),
                options.output_dir.display(),
                summary.errors.len()
            );
            Ok(())
        }
        Command::Convert { file } => {
            let page: PageRecord = store::read_json(&file)?;
            print!("{}", ConvertedDocument::from_page(&page, rules).render());
            Ok(())
        }
    }
}

fn analyze(
    input: &Path,
    report_path: &Path,
    plan_path: &Path,
    rules: &RuleSet,
) -> Result<(), MigrationError> {
    let start_time = std::time::Instant::now();
    ::log::info!("analyzing extracted pages in {}", input.display());

    let loaded = PageStore::open(input)?.load_all();
    let outcome = process_batch(&loaded.records, rules);
    let analyses = outcome.analyses();

    let report = aggregate(&analyses, rules);
    let plan = plan_migration(&analyses, rules);
    report.log_summary();
    plan.log_summary();

    store::write_json(report_path, &report)?;
    store::write_json(plan_path, &plan)?;

    ::log::info!(
        "analysis complete in {:.2} seconds: {} pages, {} unreadable files, {} failed pages",
        start_time.elapsed().as_secs_f64(),
        analyses.len(),
        loaded.errors.len(),
        outcome.errors.len()
    );
    println!("Report written to {}", report_path.display());
    println!("Plan written to {}", plan_path.display());
    Ok(())
}
