//! Sync command - fetch today's rates and write them to the registry

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use ratesync_core::config::{Config, ENDPOINT_ENV};
use ratesync_core::{RatesyncContext, ReconciliationOutcome, SyncReport};

use super::exit;
use crate::output;

pub fn run(
    mut config: Config,
    date: Option<NaiveDate>,
    create_override: Option<bool>,
    json: bool,
) -> Result<ExitCode> {
    if let Some(allow) = create_override {
        config.allow_create = allow;
    }

    let ctx = RatesyncContext::new(config);
    let service = ctx.sync_service()?;
    let as_of = super::as_of(date);

    let outcome = service.sync(as_of);
    match &outcome {
        Ok(report) if json => println!("{}", serde_json::to_string_pretty(report)?),
        Ok(report) => print_report(report, service.policy().allow_create),
        Err(e) => {
            output::error(&e.to_string());
            if e.cause().is_invalid_credentials() {
                output::info(&format!(
                    "The registry URL may be wrong or unreachable. Check {} (or \"endpoint\" in settings.json) and your connection.",
                    ENDPOINT_ENV
                ));
            }
        }
    }

    Ok(ExitCode::from(exit::for_sync(&outcome)))
}

fn print_report(report: &SyncReport, allow_create: bool) {
    if report.rates.is_empty() {
        output::warning("The feed has none of the configured currencies, nothing to sync.");
        return;
    }

    match report.feed_date {
        Some(date) if date != report.requested_date => println!(
            "Rates for {} (requested {})",
            date.to_string().bold(),
            report.requested_date
        ),
        _ => println!("Rates for {}", report.requested_date.to_string().bold()),
    }

    let mut table = output::create_table();
    table.set_header(vec!["Currency", "Nominal", "Rate", "Result"]);

    for (record, outcome) in report.rates.iter().zip(&report.reconcile.outcomes) {
        let result = match &outcome.outcome {
            ReconciliationOutcome::Updated => "updated".green().to_string(),
            ReconciliationOutcome::Created => "created".cyan().to_string(),
            ReconciliationOutcome::Skipped(reason) => format!("skipped ({})", reason).yellow().to_string(),
            ReconciliationOutcome::Failed(detail) => format!("failed: {}", detail).red().to_string(),
        };
        table.add_row(vec![
            record.code.clone(),
            record.nominal.to_string(),
            record.rate.to_string(),
            result,
        ]);
    }
    println!("{table}");

    let r = &report.reconcile;
    println!(
        "Updated: {}  Created: {}  Skipped: {}  Failed: {}",
        r.count("updated"),
        r.count("created"),
        r.count("skipped"),
        r.failed()
    );

    if !allow_create && !r.skipped.is_empty() {
        output::warning(&format!(
            "Currency creation is disabled, so {} {} not added to the registry.",
            r.skipped.join(", "),
            if r.skipped.len() == 1 { "was" } else { "were" }
        ));
    }

    if r.failed() > 0 {
        output::error("Some currencies failed to sync, see the log above.");
    } else {
        output::success("Sync finished.");
    }
}
