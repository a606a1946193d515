#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Deserialize;

use rulesat::{
    config::{BatchCount, Config, RuleKind, SolverKind},
    context::Learner,
    model::ModelExport,
    structures::{
        feature::{FeatureGroup, FeatureLabel, FeatureSchema},
        matrix::FeatureMatrix,
    },
};

/// The feature schema as written by a discretization step.
#[derive(Deserialize)]
struct SchemaFile {
    groups: Vec<FeatureGroup>,
    labels: Vec<FeatureLabel>,
}

fn cli() -> Command {
    Command::new("rulesat")
        .about("Learns an interpretable CNF/DNF classification rule from a discretized dataset")

        .arg(Arg::new("data")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("The discretized training data: comma-separated 0/1 columns, label last, no header."))

        .arg(Arg::new("schema")
            .long("schema")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The JSON feature schema produced by discretization (groups and labels)."))

        .arg(Arg::new("test")
            .long("test")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Held-out data in the same format, scored against the trained rule."))

        .arg(Arg::new("clauses")
            .long("clauses")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(usize))
            .help("The clause count of the rule.
Default: 1"))

        .arg(Arg::new("batches")
            .long("batches")
            .required(false)
            .num_args(1)
            .help("The mini-batch count: a power of two, or 'auto'.
Default: auto

Under 'auto' the count is the largest power of two giving each batch about thirty-two samples."))

        .arg(Arg::new("data_fidelity")
            .long("data-fidelity")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("The soft weight of each misclassified sample.
Default: 10"))

        .arg(Arg::new("feature_weight")
            .long("feature-weight")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("The soft weight of each literal kept in the rule.
Default: 1"))

        .arg(Arg::new("rule")
            .long("rule")
            .required(false)
            .num_args(1)
            .help("The rule family, cnf or dnf.
Default: cnf"))

        .arg(Arg::new("solver")
            .long("solver")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The weighted MaxSAT solver binary, as a name on the path or a path.
Default: open-wbo"))

        .arg(Arg::new("solver_kind")
            .long("solver-kind")
            .required(false)
            .num_args(1)
            .help("The solver family, fixing its CPU-limit flag: open-wbo, maxhs, or generic.
Default: open-wbo"))

        .arg(Arg::new("work_dir")
            .long("work-dir")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The scratch directory for transient problem files.
Default: ."))

        .arg(Arg::new("time_out")
            .long("time-out")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("The total solve-time budget in seconds, divided across batches.
Default: 1024"))

        .arg(Arg::new("seed")
            .long("seed")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("A seed for the batch partitioner, for reproducible fits."))

        .arg(Arg::new("model_out")
            .long("model-out")
            .required(false)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Write the trained model (rule and selected columns) as JSON."))

        .arg(Arg::new("verbose")
            .long("verbose")
            .short('v')
            .action(ArgAction::Count)
            .help("Raise log detail; may be given twice."))
}

fn main() {
    let matches = cli().get_matches();

    let default_filter = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .init();

    let data_path = matches.get_one::<PathBuf>("data").expect("data is required");
    let schema_path = matches
        .get_one::<PathBuf>("schema")
        .expect("schema is required");

    let (matrix, labels) = match load_csv(data_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("c error reading {}: {e}", data_path.display());
            std::process::exit(1);
        }
    };
    println!(
        "c {} samples over {} features",
        matrix.sample_count(),
        matrix.width()
    );

    let schema = match load_schema(schema_path) {
        Ok(schema) => schema,
        Err(e) => {
            println!("c error reading {}: {e}", schema_path.display());
            std::process::exit(1);
        }
    };

    let config = config_from_args(&matches);
    let rule_kind = config.rule;

    let mut learner = match Learner::from_config(config, schema) {
        Ok(learner) => learner,
        Err(e) => {
            println!("c configuration error: {e}");
            std::process::exit(1);
        }
    };

    let report = match learner.fit(&matrix, &labels) {
        Ok(report) => report,
        Err(e) => {
            println!("c training failed: {e}");
            std::process::exit(1);
        }
    };

    println!("c trained over {} batch(es)", report.batches);
    println!(
        "c final batch: {} of {} samples misclassified",
        report.final_batch_errors, report.final_batch_samples
    );
    println!(
        "c rule: {} literal(s) over {} clause(s) ({rule_kind})",
        report.rule_literal_count,
        learner.config().clauses
    );

    let rule = match learner.rule() {
        Ok(rule) => rule,
        Err(e) => {
            println!("c {e}");
            std::process::exit(1);
        }
    };
    println!("{rule}");

    if let Some(test_path) = matches.get_one::<PathBuf>("test") {
        let (test_matrix, test_labels) = match load_csv(test_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                println!("c error reading {}: {e}", test_path.display());
                std::process::exit(1);
            }
        };
        match learner.predict(&test_matrix, &test_labels) {
            Ok(predictions) => {
                let correct = predictions
                    .iter()
                    .zip(&test_labels)
                    .filter(|(prediction, label)| prediction == label)
                    .count();
                println!(
                    "c held-out accuracy: {correct}/{} ({:.3})",
                    test_labels.len(),
                    correct as f64 / test_labels.len().max(1) as f64
                );
            }
            Err(e) => {
                println!("c scoring failed: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Some(model_path) = matches.get_one::<PathBuf>("model_out") {
        let export = ModelExport {
            kind: rule_kind,
            rule: rule.to_string(),
            selected_columns: learner.selected_columns(),
        };
        let json = serde_json::to_string_pretty(&export).expect("model export serializes");
        if let Err(e) = std::fs::write(model_path, json) {
            println!("c error writing {}: {e}", model_path.display());
            std::process::exit(1);
        }
        println!("c model written to {}", model_path.display());
    }
}

/// Read a discretized dataset: 0/1 columns with the label last, no header.
fn load_csv(path: &Path) -> Result<(FeatureMatrix, Vec<bool>), String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut values = Vec::new();
        for field in line.split(',') {
            match field.trim() {
                "0" => values.push(false),
                "1" => values.push(true),
                other => return Err(format!("line {}: unreadable field '{other}'", number + 1)),
            }
        }
        match values.pop() {
            Some(label) => {
                labels.push(label);
                rows.push(values);
            }
            None => return Err(format!("line {}: no columns", number + 1)),
        }
    }

    let matrix = FeatureMatrix::from_rows(rows).map_err(|e| format!("{e}"))?;
    Ok((matrix, labels))
}

/// Read and validate the JSON feature schema.
fn load_schema(path: &Path) -> Result<FeatureSchema, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let file: SchemaFile = serde_json::from_str(&content).map_err(|e| e.to_string())?;
    FeatureSchema::new(file.groups, file.labels).map_err(|e| format!("{e}"))
}

fn config_from_args(matches: &ArgMatches) -> Config {
    let mut config = Config::default();

    if let Some(&clauses) = matches.get_one::<usize>("clauses") {
        config.clauses = clauses;
    }

    if let Some(batches) = matches.get_one::<String>("batches") {
        config.batches = match batches.as_str() {
            "auto" => BatchCount::Auto,
            other => match other.parse::<usize>() {
                Ok(count) => BatchCount::Fixed(count),
                Err(_) => {
                    println!("c unreadable batch count '{other}'");
                    std::process::exit(1);
                }
            },
        };
    }

    if let Some(&data_fidelity) = matches.get_one::<u64>("data_fidelity") {
        config.data_fidelity = data_fidelity;
    }

    if let Some(&feature_weight) = matches.get_one::<u64>("feature_weight") {
        config.feature_weight = feature_weight;
    }

    if let Some(rule) = matches.get_one::<String>("rule") {
        config.rule = match rule.to_lowercase().as_str() {
            "cnf" => RuleKind::Cnf,
            "dnf" => RuleKind::Dnf,
            other => {
                println!("c unknown rule family '{other}'");
                std::process::exit(1);
            }
        };
    }

    if let Some(solver) = matches.get_one::<PathBuf>("solver") {
        config.solver = solver.clone();
    }

    if let Some(kind) = matches.get_one::<String>("solver_kind") {
        config.solver_kind = match kind.to_lowercase().as_str() {
            "open-wbo" | "openwbo" => SolverKind::OpenWbo,
            "maxhs" => SolverKind::MaxHs,
            "generic" => SolverKind::Generic,
            other => {
                println!("c unknown solver family '{other}'");
                std::process::exit(1);
            }
        };
    }

    if let Some(work_dir) = matches.get_one::<PathBuf>("work_dir") {
        config.work_dir = work_dir.clone();
    }

    if let Some(&time_out) = matches.get_one::<u64>("time_out") {
        config.time_out = time_out;
    }

    config.seed = matches.get_one::<u64>("seed").copied();

    config
}
