use anyhow::{Context, Result};
use basket_core::core::engine::Model;
use basket_core::dataset;
use basket_core::error::QueryError;
use basket_core::{Provenance, Recommendation, RecommenderConfig, SharedModel, Transaction};
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Stdout, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "basket-recommender",
    version,
    about = "Grocery recommendations from association rules"
)]
struct Cli {
    /// JSON file of baskets. Defaults to the bundled grocery history.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the minimum itemset support.
    #[arg(long, global = true)]
    min_support: Option<f64>,

    /// Override the minimum rule confidence.
    #[arg(long, global = true)]
    min_confidence: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend items for one basket and exit.
    Recommend {
        /// Items already held, comma-separated (e.g. "Bread,Ice Cream").
        #[arg(long, value_delimiter = ',')]
        items: Vec<String>,

        /// Number of recommendations.
        #[arg(long)]
        top_n: Option<usize>,

        /// Print the result as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Interactive shopping session (the default).
    Interactive,

    /// Show the encoded transaction matrix.
    Transactions,

    /// List mined association rules.
    Rules,
}

enum Screen {
    Welcome,
    Results {
        items: Vec<String>,
        recs: Vec<Recommendation>,
    },
    Notice(String),
    Error(String),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let transactions = load_transactions(&cli)?;
    let model = Model::build(&transactions, &config).context("building recommendation model")?;

    match &cli.command {
        Some(Commands::Recommend { items, top_n, json }) => {
            let items = clean_items(items.iter().map(String::as_str));
            let recs = model.recommend(&items, top_n.unwrap_or(config.top_n))?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                print_recommendations(&recs);
            }
        }
        Some(Commands::Transactions) => print_matrix(&model),
        Some(Commands::Rules) => print_rules(&model),
        Some(Commands::Interactive) | None => {
            run_interactive(&SharedModel::new(model), &cli, &config)?
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RecommenderConfig::from_file(path)?,
        None => RecommenderConfig::default(),
    };
    if let Some(v) = cli.min_support {
        config.min_support = v;
    }
    if let Some(v) = cli.min_confidence {
        config.min_confidence = v;
    }
    config.validate()?;
    Ok(config)
}

fn load_transactions(cli: &Cli) -> Result<Vec<Transaction>> {
    match &cli.data {
        Some(path) => Ok(dataset::load_json(path)?),
        None => Ok(dataset::grocery_transactions()),
    }
}

fn clean_items<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_interactive(shared: &SharedModel, cli: &Cli, config: &RecommenderConfig) -> Result<()> {
    let mut stdout = stdout();
    let mut screen = Screen::Welcome;

    loop {
        let model = shared.snapshot();
        print_ui(&mut stdout, &model, &screen)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }

        screen = match input.trim() {
            "exit" => break,
            "reload" => match load_transactions(cli)
                .and_then(|txs| shared.rebuild(&txs, config).map_err(Into::into))
            {
                Ok(()) => Screen::Notice("Model rebuilt from the dataset.".into()),
                Err(e) => Screen::Error(format!("Reload failed: {e:#}")),
            },
            line => {
                let items = clean_items(line.split(','));
                match model.recommend(&items, config.top_n) {
                    Ok(recs) => Screen::Results { items, recs },
                    Err(QueryError::InvalidSelection) => {
                        Screen::Error("Please select at least one item!".into())
                    }
                    Err(e) => Screen::Error(e.to_string()),
                }
            }
        };
    }
    Ok(())
}

fn print_ui(stdout: &mut Stdout, model: &Model, screen: &Screen) -> Result<()> {
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Grocery Product Recommender".bold());
    println!("---------------------------------------------------------------");
    println!("Type the items you already have, separated by commas.");
    println!("'reload' rebuilds the model from the dataset, 'exit' quits.\n");

    println!("Available items: {}", model.catalog().join(", "));
    println!();

    match screen {
        Screen::Welcome => {}
        Screen::Results { items, recs } => {
            println!("Basket: {}", items.join(", "));
            print_recommendations(recs);
        }
        Screen::Notice(msg) => println!("{}", msg.as_str().cyan()),
        Screen::Error(msg) => println!("{}", msg.as_str().red()),
    }
    print!("\n> ");
    stdout.flush()?;
    Ok(())
}

fn print_recommendations(recs: &[Recommendation]) {
    if recs.is_empty() {
        println!("{}", "You already have good items!".blue());
        return;
    }
    println!("{}", "Recommended products:".green());
    for rec in recs {
        let source = match rec.provenance {
            Provenance::Rule => "bought together",
            Provenance::Popularity => "popular pick",
        };
        println!(
            "  {} - {} {}",
            rec.item.as_str().green().bold(),
            format!("Confidence: {:.2}", rec.score).green(),
            format!("({source})").dark_grey()
        );
    }
}

fn print_matrix(model: &Model) {
    let catalog = model.catalog();
    println!("{}", catalog.join(" | "));
    for row in model.encoded().matrix() {
        let cells: Vec<String> = row
            .iter()
            .zip(catalog)
            .map(|(&present, name)| {
                let mark = if present { "x" } else { "." };
                format!("{mark:^width$}", width = name.len())
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}

fn print_rules(model: &Model) {
    if model.rules().is_empty() {
        println!("No rules meet the configured thresholds.");
        return;
    }
    for rule in model.rules() {
        println!(
            "{{{}}} -> {{{}}}  support {:.2}  confidence {:.2}  lift {:.2}",
            model.item_names(rule.antecedent()).join(", "),
            model.item_names(rule.consequent()).join(", "),
            rule.support,
            rule.confidence,
            rule.lift
        );
    }
}
