use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use evolve_decl::DEFAULT_MAX_ALIAS_DEPTH;
use evolve_planner::{EvolutionRules, Evolver, Plan, Planner, PlannerConfig, SourceFile};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("swift-evolve-plan")
        .version(evolve_planner::VERSION)
        .about("Plan and replay ABI-preserving source evolutions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("plan")
                .about("Choose evolutions for parsed source files")
                .arg(
                    Arg::new("inputs")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Parsed source files (JSON trees)"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("0")
                        .value_parser(value_parser!(u64))
                        .help("Master random seed"),
                )
                .arg(
                    Arg::new("rules")
                        .long("rules")
                        .value_parser(value_parser!(PathBuf))
                        .help("Exclusion rules (.json, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("max-alias-depth")
                        .long("max-alias-depth")
                        .value_parser(value_parser!(usize))
                        .help("Bound on type alias chains followed during resolution [default: 32]"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Plan output path (stdout if omitted)"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Apply a saved plan to parsed source files")
                .arg(
                    Arg::new("inputs")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Parsed source files (JSON trees)"),
                )
                .arg(
                    Arg::new("plan")
                        .long("plan")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Plan produced by the plan subcommand"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Evolved trees output path (stdout if omitted)"),
                ),
        )
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn write_output(output: Option<&PathBuf>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{contents}\n"))
            .with_context(|| format!("cannot write {}", path.display())),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn inputs(args: &ArgMatches) -> Vec<&PathBuf> {
    args.get_many::<PathBuf>("inputs").map(Iterator::collect).unwrap_or_default()
}

/// Load every input, logging the ones that fail
fn load_sources(paths: &[&PathBuf]) -> (Vec<SourceFile>, usize) {
    let mut failed = 0;
    let sources = paths
        .iter()
        .filter_map(|path| match SourceFile::load(path) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::error!(error = %err, "skipping input");
                failed += 1;
                None
            }
        })
        .collect();
    (sources, failed)
}

fn plan(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let rules = match args.get_one::<PathBuf>("rules") {
        Some(path) => EvolutionRules::load(path)
            .with_context(|| format!("invalid rules {}", path.display()))?,
        None => EvolutionRules::new(),
    };
    let seed = args.get_one::<u64>("seed").copied().unwrap_or_default();
    let max_alias_depth = args
        .get_one::<usize>("max-alias-depth")
        .copied()
        .unwrap_or(DEFAULT_MAX_ALIAS_DEPTH);
    let config = PlannerConfig::new()
        .with_seed(seed)
        .with_max_alias_depth(max_alias_depth)
        .with_rules(rules);

    let (sources, mut failed) = load_sources(&inputs(args));
    let planner = Planner::new(config);

    let mut plan = Plan::new();
    for result in planner.plan_files(&sources) {
        match result {
            Ok(file_plan) => plan.extend(file_plan),
            Err(_) => failed += 1,
        }
    }

    let digest = plan.digest().context("cannot digest plan")?;
    tracing::info!(
        files = sources.len(),
        failed,
        evolutions = plan.len(),
        digest = %digest.short(),
        "plan complete"
    );
    write_output(args.get_one::<PathBuf>("output"), &plan.to_json()?)?;
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn read_plan(path: &Path) -> anyhow::Result<Plan> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read plan {}", path.display()))?;
    Plan::from_json(&input).with_context(|| format!("invalid plan {}", path.display()))
}

fn replay(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let plan_path = args
        .get_one::<PathBuf>("plan")
        .context("missing --plan")?;
    let plan = read_plan(plan_path)?;

    let (sources, mut failed) = load_sources(&inputs(args));
    let evolver = Evolver::new();
    let mut evolved = Vec::with_capacity(sources.len());
    for source in &sources {
        match evolver.apply(source, &plan) {
            Ok(file) => evolved.push(file),
            Err(err) => {
                tracing::warn!(file = %source.path, error = %err, "replay aborted");
                failed += 1;
            }
        }
    }

    tracing::info!(files = evolved.len(), failed, "replay complete");
    write_output(
        args.get_one::<PathBuf>("output"),
        &serde_json::to_string_pretty(&evolved)?,
    )?;
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("plan", args)) => plan(args),
        Some(("replay", args)) => replay(args),
        _ => unreachable!("subcommand_required"),
    }
}
