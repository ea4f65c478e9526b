mod dotenv;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dictionary::{Dict, ToKey, Value};
use dotenv::DotEnvInjector;
use smol_str::SmolStr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "dict-run")]
#[command(about = "Dictionary test tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the value of a key, or the default if it is missing
    Get(LookupArgs),
    /// Print whether a key is present
    HasKey(KeyArgs),
    /// Insert the default if the key is missing, print the value and the result
    SetDefault(LookupArgs),
    /// Overwrite entries with the given pairs and print the result
    Update(UpdateArgs),
    /// Print all keys
    Keys(SourceArgs),
    /// Print all values
    Values(SourceArgs),
    /// Print all [key value] pairs
    Items(SourceArgs),
    /// Remove all entries and print the result
    Clear(SourceArgs),
    /// Build a dictionary from a list of keys sharing one value
    FromKeys(FromKeysArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Dictionary entry list
    #[arg(short, long, value_parser = parse_key_value::<SmolStr, Value>)]
    entry: Option<Vec<(SmolStr, Value)>>,
    /// Dotenv file path
    #[arg(long, num_args = 0..=1)]
    dotenv: Option<Option<PathBuf>>,
}

#[derive(Debug, Args)]
struct KeyArgs {
    #[command(flatten)]
    source: SourceArgs,
    key: SmolStr,
}

#[derive(Debug, Args)]
struct LookupArgs {
    #[command(flatten)]
    source: SourceArgs,
    key: SmolStr,
    #[arg(allow_hyphen_values = true, value_parser = Value::from_str)]
    default: Value,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Entries written over the source dictionary
    #[arg(short, long = "with", value_parser = parse_key_value::<SmolStr, Value>)]
    with: Vec<(SmolStr, Value)>,
}

#[derive(Debug, Args)]
struct FromKeysArgs {
    /// Value shared by every key
    #[arg(allow_hyphen_values = true, value_parser = Value::from_str)]
    default: Value,
    /// Keys, converted to their canonical text
    #[arg(num_args = 0.., allow_hyphen_values = true, value_parser = Value::from_str)]
    keys: Vec<Value>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Cli::parse();

    for line in run(args.command)? {
        println!("{line}");
    }
    Ok(())
}

/// Apply one command and render its output, one entry per line.
fn run(command: Commands) -> anyhow::Result<Vec<String>> {
    let lines = match command {
        Commands::Get(args) => {
            let dict = load(args.source)?;
            vec![dict.get(&args.key, &args.default).to_string()]
        }
        Commands::HasKey(args) => {
            let dict = load(args.source)?;
            vec![dict.has_key(&args.key).to_string()]
        }
        Commands::SetDefault(args) => {
            let mut dict = load(args.source)?;
            let mut lines = vec![dict.set_default(args.key, args.default).to_string()];
            lines.extend(dict_lines(&dict));
            lines
        }
        Commands::Update(args) => {
            let mut dict = load(args.source)?;
            let other: Dict = args.with.into_iter().collect();
            dict.update(&other);
            dict_lines(&dict)
        }
        Commands::Keys(source) => {
            let mut keys = load(source)?.keys();
            keys.sort();
            keys.iter().map(ToString::to_string).collect()
        }
        Commands::Values(source) => {
            let mut values: Vec<String> = load(source)?
                .values()
                .iter()
                .map(ToString::to_string)
                .collect();
            values.sort();
            values
        }
        Commands::Items(source) => {
            let mut items = load(source)?.item_lists();
            items.sort_by_key(|pair| pair.first().map(ToKey::to_key));
            items
                .into_iter()
                .map(|pair| Value::List(pair).to_string())
                .collect()
        }
        Commands::Clear(source) => {
            let mut dict = load(source)?;
            dict.clear();
            dict_lines(&dict)
        }
        Commands::FromKeys(args) => dict_lines(&Dict::from_keys(&args.keys, args.default)),
    };
    Ok(lines)
}

/// Command-line entries first, then dotenv values for keys still missing.
fn load(source: SourceArgs) -> anyhow::Result<Dict> {
    let mut dict: Dict = source.entry.unwrap_or_default().into_iter().collect();

    let has_dotenv_flag = source.dotenv.is_some();
    if has_dotenv_flag {
        let dotenv_injector = DotEnvInjector::new(source.dotenv.flatten());
        dotenv_injector
            .merge_into(&mut dict)
            .context("reading dotenv files")?;
    }
    debug!(count = dict.len(), "dictionary loaded");
    Ok(dict)
}

/// `key=value` lines sorted by key; the dictionary itself has no order.
fn dict_lines(dict: &Dict) -> Vec<String> {
    let mut items = dict.items();
    items.sort_by(|(a, _), (b, _)| a.cmp(b));
    items
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect()
}

fn parse_key_value<T, U>(
    s: &str,
) -> Result<(T, U), Box<dyn std::error::Error + Send + Sync + 'static>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    U: std::str::FromStr,
    U::Err: std::error::Error + Send + Sync + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}
