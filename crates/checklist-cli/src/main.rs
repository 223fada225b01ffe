use anyhow::{Context, Result};
use checklist_cli::{list_variants, render_status, render_variants, DefinitionSource};
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let variant = Arg::new("variant")
        .long("variant")
        .value_name("ID")
        .help("Built-in variant id");
    let file = Arg::new("file")
        .long("file")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("TOML or JSON definition file");
    let checklist = Arg::new("checklist")
        .long("checklist")
        .value_name("ID")
        .requires("file")
        .help("Checklist id within the definition file");
    let lenient = Arg::new("lenient")
        .long("lenient")
        .action(ArgAction::SetTrue)
        .help("Accept weight tables that do not sum to 100");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("checklist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Document checklist definitions and status")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("variants")
                .about("List built-in checklist variants")
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a definition file or built-in variant (all variants by default)")
                .arg(variant.clone().conflicts_with("file"))
                .arg(file.clone())
                .arg(checklist.clone())
                .arg(lenient.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("status")
                .about("Evaluate a checklist against a JSON document export")
                .arg(variant)
                .arg(file)
                .group(
                    ArgGroup::new("source")
                        .args(["variant", "file"])
                        .required(true),
                )
                .arg(checklist)
                .arg(
                    Arg::new("documents")
                        .long("documents")
                        .value_name("PATH")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of documents in store order"),
                )
                .arg(lenient)
                .arg(json),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn source(args: &ArgMatches) -> Option<DefinitionSource> {
    if let Some(path) = args.get_one::<PathBuf>("file") {
        return Some(DefinitionSource::File {
            path: path.clone(),
            checklist: args.get_one::<String>("checklist").cloned(),
        });
    }
    args.get_one::<String>("variant")
        .map(|id| DefinitionSource::Variant(id.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("variants", args)) => {
            let summaries = list_variants();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print!("{}", render_variants(&summaries));
            }
        }
        Some(("validate", args)) => {
            let report = checklist_cli::validate(source(args).as_ref(), args.get_flag("lenient"))?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
            if !report.passed() {
                std::process::exit(1);
            }
        }
        Some(("status", args)) => {
            let source = source(args).context("--variant or --file is required")?;
            let documents = args
                .get_one::<PathBuf>("documents")
                .context("--documents is required")?;

            let state =
                checklist_cli::status(&source, documents.clone(), args.get_flag("lenient")).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&*state)?);
            } else {
                print!("{}", render_status(&state));
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
