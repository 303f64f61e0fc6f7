//! Rates command - fetch and print rates, registry untouched

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use ratesync_core::config::{parse_currency_list, Config, CURRENCIES_ENV};
use ratesync_core::RatesyncContext;

use super::exit;
use crate::output;

pub fn run(config: Config, date: Option<NaiveDate>, currencies: Option<&str>, json: bool) -> Result<ExitCode> {
    let codes = match currencies {
        Some(list) => parse_currency_list(list),
        None => config.currency_codes.clone(),
    };

    if codes.is_empty() {
        output::warning(&format!(
            "No currencies given. Pass --currencies USD,EUR or set {}.",
            CURRENCIES_ENV
        ));
        return Ok(ExitCode::SUCCESS);
    }

    let as_of = super::as_of(date);
    let fetcher = RatesyncContext::new(config).rate_fetcher()?;

    let rates = match fetcher.fetch(&codes, as_of) {
        Ok(rates) => rates,
        Err(e) => {
            output::error(&format!("Exchange rate fetch failed: {}", e));
            return Ok(ExitCode::from(exit::FEED_UNAVAILABLE));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
        return Ok(ExitCode::SUCCESS);
    }

    let date = rates.date.unwrap_or(as_of);
    println!("Rates for {}", date.to_string().bold());

    let mut table = output::create_table();
    table.set_header(vec!["Currency", "Nominal", "Rate", "Name"]);
    for record in &rates.records {
        table.add_row(vec![
            record.code.clone(),
            record.nominal.to_string(),
            record.rate.to_string(),
            record.display_name.clone(),
        ]);
    }
    println!("{table}");

    if rates.records.len() < codes.len() {
        output::warning(&format!(
            "{} of {} requested currencies are not in the feed.",
            codes.len() - rates.records.len(),
            codes.len()
        ));
    }

    Ok(ExitCode::SUCCESS)
}
