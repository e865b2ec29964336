use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use mushroom_classifier::{ClassifierError, FeatureCatalog};
use mushroom_cli::predict::input::{build_query, PredictConfig};
use mushroom_cli::predict::output::{render_json, render_text};
use mushroom_cli::predict::runner::{run_prediction, run_schema};
use mushroom_cli::util::validate_tsv_or_csv_file;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MUSHROOM_LOG", "error,mushroom=info"))
        .init();

    let matches = Command::new("mushroom")
        .version(clap::crate_version!())
        .about("\u{1F344} Mushroom edibility classifier")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("catalog").about("List every attribute and its legal values"))
        .subcommand(
            Command::new("schema")
                .about("Print the indicator columns derived from a training corpus")
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help("Path to the labeled training corpus (*.csv or *.tsv)")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(label_column_arg()),
        )
        .subcommand(
            Command::new("predict")
                .about("Train on a corpus and classify one specimen")
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help(
                            "Path to the labeled training corpus. Overrides the training data \
                             file specified in the configuration file.",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Random seed for bootstrap sampling. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Override the model type from the configuration file.")
                        .value_parser(["random_forest", "decision_tree"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("trees")
                        .long("trees")
                        .help("Number of trees in the forest.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("set")
                        .short('s')
                        .long("set")
                        .help(
                            "Select a value as ATTRIBUTE=value. Repeatable; attributes not set \
                             keep their first catalog value.",
                        )
                        .action(ArgAction::Append)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the prediction as JSON.")
                        .action(ArgAction::SetTrue),
                )
                .arg(label_column_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("catalog", _)) => {
            print_catalog();
            Ok(())
        }
        Some(("schema", sub_m)) => handle_schema(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn label_column_arg() -> Arg {
    Arg::new("label_column")
        .long("label-column")
        .help("Name of the class label column [default: CLASS]")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

fn print_catalog() {
    for attribute in FeatureCatalog::mushroom().attributes() {
        println!("{}: {}", attribute.name(), attribute.values().join(", "));
    }
}

fn handle_schema(matches: &ArgMatches) -> Result<()> {
    let data: &String = matches.get_one("data").unwrap();
    validate_tsv_or_csv_file(data)?;
    let label_column = matches
        .get_one::<String>("label_column")
        .map(String::as_str)
        .unwrap_or("CLASS");

    let schema = run_schema(data, label_column)?;
    for name in schema.column_names() {
        println!("{}", name);
    }
    log::info!("[Mushroom::Schema] {} columns", schema.len());
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let config = PredictConfig::from_arguments(matches)?;
    log::info!("[Mushroom::Predict] Training on {}", config.train_data);

    let query = build_query(
        &FeatureCatalog::mushroom(),
        matches.get_many::<String>("set").into_iter().flatten(),
    )?;

    match run_prediction(&config, &query) {
        Ok(result) => {
            if matches.get_flag("json") {
                println!("{}", render_json(&result)?);
            } else {
                print!("{}", render_text(&result));
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            match e.downcast_ref::<ClassifierError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("{:#}", e),
            }
            std::process::exit(1)
        }
    }
}
