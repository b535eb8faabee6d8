//! Command line front end: reads a lexical specification, compiles it and persists the lexer
//! model.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use lexgen::{compile_lexer_model, persist_model, read_specification, DEFAULT_OUTPUT};
use log::info;

#[derive(Parser)]
#[command(name = "lexgen")]
#[command(about = "Compiles a lexical specification into a persisted lexer model")]
#[command(version)]
struct Cli {
    /// Specification file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to persist the lexer model
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Also render the state graph in graphviz dot format
    #[cfg(feature = "dot")]
    #[arg(long)]
    dot: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let specification = read_specification(&input)?;
    info!(
        "Read {} rules for {} lexer states",
        specification.rules.len(),
        specification.state_names.len()
    );
    let model = compile_lexer_model(&specification)?;
    persist_model(&model, &cli.output)?;
    info!("Wrote lexer model to {}", cli.output.display());

    #[cfg(feature = "dot")]
    if let Some(path) = &cli.dot {
        let mut file = fs::File::create(path)?;
        lexgen::render_to(&model, "lexer states", &mut file);
        info!("Wrote state graph to {}", path.display());
    }

    Ok(())
}
