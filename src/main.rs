use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use mail_map::{query, QueryKind};
use mapd::{Config, Context, Error};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mapd", version, about = "Query mail lookup tables")]
struct Cli {
    /// Map definitions to load.
    #[arg(short, long, env = "MAPD_CONFIG", default_value = "/etc/mail/maps.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every configured map.
    List,
    /// Print the value stored under KEY; exits 1 when it is absent.
    Lookup {
        map: String,
        key: String,
        #[arg(long, default_value = "exact")]
        kind: QueryKind,
    },
    /// Check whether any key of MAP matches KEY.
    Compare {
        map: String,
        key: String,
        #[arg(long, default_value = "exact")]
        kind: QueryKind,
        #[arg(long, value_enum, default_value_t = PredicateArg::Exact)]
        predicate: PredicateArg,
    },
    /// Ask the backend of MAP to reload its contents.
    Update { map: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum PredicateArg {
    Exact,
    IgnoreCase,
    Netaddr,
    Domain,
}

impl PredicateArg {
    fn predicate(self) -> fn(&str, &str) -> bool {
        match self {
            PredicateArg::Exact => query::exact,
            PredicateArg::IgnoreCase => query::ignore_case,
            PredicateArg::Netaddr => query::netaddr,
            PredicateArg::Domain => query::domain,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            if e.is_fatal() {
                error!("fatal: {}", e);
            } else {
                error!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Error> {
    let config = Config::load(&cli.config)?;
    let ctx = Context::from_config(&config)?;
    let maps = ctx.maps();

    match cli.command {
        Command::List => {
            for map in maps.maps().iter() {
                println!(
                    "{}\t{}\t{}\t{}",
                    map.id(),
                    map.name(),
                    map.backend(),
                    if map.is_static() {
                        format!("{} entries", map.elements().len())
                    } else {
                        map.config().to_string()
                    }
                );
            }
        }
        Command::Lookup { map, key, kind } => {
            let id = ctx.resolve(&map)?;
            match maps.lookup(id, &key, kind)? {
                Some(value) => println!("{}", value),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Compare {
            map,
            key,
            kind,
            predicate,
        } => {
            let id = ctx.resolve(&map)?;
            let predicate = predicate.predicate();
            let found = maps.compare(id, &key, kind, &predicate).into_result()?;
            println!("{}", found);
        }
        Command::Update { map } => {
            let id = ctx.resolve(&map)?;
            maps.update(id)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
