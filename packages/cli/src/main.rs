#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for the crime explorer.
//!
//! Runs the proxy server or queries the FBI Crime Data Explorer directly,
//! printing normalized data as tables or JSON. Upstream settings come from
//! the environment and can be overridden per invocation.

mod report;

use clap::{Args, Parser, Subcommand};
use crime_explorer_crime_models::CrimeType;
use crime_explorer_crime_models::filter::FilterContext;
use crime_explorer_geography_models::states::is_state_abbr;
use crime_explorer_measures::{build_yoy_rows, yearly_kpis};
use crime_explorer_normalize::search_agencies;
use crime_explorer_server::{ServerConfig, run_server};
use crime_explorer_server_models::{
    AGENCY_SEARCH_LIMIT, DEFAULT_FROM_YEAR, DEFAULT_MAP_YEAR, DEFAULT_TO_YEAR,
};
use crime_explorer_upstream::{CdeClient, CdeConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "crime_explorer",
    about = "FBI Crime Data Explorer proxy and query tool"
)]
struct Cli {
    /// Upstream API base URL (overrides `CDE_BASE_URL`)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Upstream API key (overrides `FBI_CDE_API_KEY`)
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Maximum parallel upstream requests (overrides `CDE_CONCURRENCY`)
    #[arg(long, global = true)]
    concurrency: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn cde_config(&self) -> CdeConfig {
        let mut config = CdeConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config
    }
}

/// Scope and year range shared by the query commands.
#[derive(Args)]
struct Selection {
    /// State abbreviation (e.g., "NM")
    #[arg(long)]
    state: Option<String>,
    /// Agency ORI (e.g., "NM0010100"); takes precedence over `--state`
    #[arg(long)]
    agency: Option<String>,
    /// First year (inclusive)
    #[arg(long, default_value_t = DEFAULT_FROM_YEAR)]
    from: i32,
    /// Last year (inclusive)
    #[arg(long, default_value_t = DEFAULT_TO_YEAR)]
    to: i32,
}

impl Selection {
    fn filter(&self, crime: CrimeType) -> FilterContext {
        FilterContext::default()
            .with_state(self.state.as_deref())
            .with_agency(self.agency.as_deref())
            .with_crime_type(crime)
            .with_years(self.from, self.to)
    }
}

/// Agency roster filter for a state argument, "all" meaning every state.
fn agency_selection(state: &str, query: Option<&str>) -> Result<FilterContext, String> {
    let state = state.trim();
    let state = if state.eq_ignore_ascii_case("all") {
        None
    } else {
        let abbr = state.to_uppercase();
        if !is_state_abbr(&abbr) {
            return Err(format!("unknown state abbreviation: {abbr}"));
        }
        Some(abbr)
    };

    Ok(FilterContext::default()
        .with_state(state.as_deref())
        .with_agency_search(query.map_or("", str::trim)))
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server (the default when no command is given)
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Yearly offense counts, rates and clearances
    Summarized {
        #[command(flatten)]
        selection: Selection,
        /// Crime type slug (e.g., "homicide", "motor-vehicle-theft")
        #[arg(long, default_value_t)]
        crime: CrimeType,
        /// Print normalized JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Hate-crime totals by year, bias category and offense type
    HateCrime {
        #[command(flatten)]
        selection: Selection,
        /// Print normalized JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Latest-year count and rate for every state
    StateMap {
        /// Crime type slug
        #[arg(long, default_value_t)]
        crime: CrimeType,
        /// Year to map
        #[arg(long, default_value_t = DEFAULT_MAP_YEAR)]
        year: i32,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List or search reporting agencies
    Agencies {
        /// State abbreviation, or "all" for every state
        state: String,
        /// Case-insensitive search over name, ORI, county, type and state
        #[arg(long)]
        query: Option<String>,
        /// Maximum search results
        #[arg(long, default_value_t = AGENCY_SEARCH_LIMIT)]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let cde = cli.cde_config();

    let command = cli.command.unwrap_or(Commands::Serve {
        bind_addr: None,
        port: None,
    });

    match command {
        Commands::Serve { bind_addr, port } => {
            let mut config = ServerConfig::from_env();
            config.cde = cde;
            if let Some(bind_addr) = bind_addr {
                config.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.port = port;
            }

            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(run_server(config))
            })
            .await??;
        }
        Commands::Summarized {
            selection,
            crime,
            json,
        } => {
            let client = CdeClient::new(cde)?;
            let filter = selection.filter(crime);
            let scope = filter.scope();
            log::info!(
                "Fetching {crime} for {scope} ({}-{})",
                filter.start_year,
                filter.end_year
            );

            let yearly = client
                .summarized(&scope, crime, filter.start_year, filter.end_year)
                .await?;

            if json {
                print_json(&yearly)?;
            } else if yearly.is_empty() {
                println!("No {} data for {}", crime.label(), scope.label());
            } else {
                println!("{}: {}", scope.label(), crime.label());
                println!();
                println!("{}", report::kpi_lines(&yearly_kpis(&yearly)));
                println!();
                println!("{}", report::yearly_table(&yearly));
                println!();
                println!("{}", report::yoy_table(&build_yoy_rows(&yearly)));
            }
        }
        Commands::HateCrime { selection, json } => {
            let client = CdeClient::new(cde)?;
            let filter = selection.filter(CrimeType::default());
            let scope = filter.scope();
            log::info!(
                "Fetching hate-crime data for {scope} ({}-{})",
                filter.start_year,
                filter.end_year
            );

            let breakdown = client
                .hate_crime(&scope, filter.start_year, filter.end_year)
                .await?;

            if json {
                print_json(&breakdown)?;
            } else {
                println!("{}: Hate Crime", scope.label());
                println!();
                println!("{}", report::hate_crime_report(&breakdown));
            }
        }
        Commands::StateMap { crime, year, json } => {
            let client = CdeClient::new(cde)?;
            let outcome = client.state_map(crime, year).await;

            if outcome.all_failed() {
                return Err(format!(
                    "state map request failed for all {} states",
                    outcome.attempted
                )
                .into());
            }
            if outcome.failed > 0 {
                log::warn!(
                    "{}/{} states could not be fetched",
                    outcome.failed,
                    outcome.attempted
                );
            }

            if json {
                print_json(&outcome.entries)?;
            } else {
                println!("{} by state, {year}", crime.label());
                println!();
                println!("{}", report::state_map_table(&outcome.entries));
            }
        }
        Commands::Agencies {
            state,
            query,
            limit,
            json,
        } => {
            let filter = agency_selection(&state, query.as_deref())?;
            let client = CdeClient::new(cde)?;
            let agencies = match filter.state_abbr.as_deref() {
                Some(abbr) => client.agencies_by_state(abbr).await?,
                None => client.all_agencies().await,
            };

            let shown = if filter.agency_search.is_empty() {
                agencies.iter().collect()
            } else {
                search_agencies(&agencies, &filter.agency_search, limit)
            };

            if json {
                print_json(&shown)?;
            } else {
                println!("{}", report::agency_table(&shown));
                println!();
                println!("{} of {} agencies", shown.len(), agencies.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_selection_reads_state_and_query() {
        let filter = agency_selection(" nm ", Some("albuquerque")).unwrap();
        assert_eq!(filter.state_abbr.as_deref(), Some("NM"));
        assert_eq!(filter.agency_search, "albuquerque");

        let filter = agency_selection("ALL", None).unwrap();
        assert_eq!(filter.state_abbr, None);
        assert!(filter.agency_search.is_empty());
    }

    #[test]
    fn agency_selection_rejects_unknown_states() {
        assert_eq!(
            agency_selection("zz", None).unwrap_err(),
            "unknown state abbreviation: ZZ"
        );
    }
}
