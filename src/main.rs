use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;
use rustyline::{error::ReadlineError, Editor};
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fdnorm::{parse_field_set, FieldSet, Problem};

const FDS_FILENAME: &str = "fds.txt";

#[derive(Debug, StructOpt)]
#[structopt(name = "fdnorm", about = "Functional dependency reasoning and 3NF synthesis")]
struct Opt {
    /// Dependency file, one `<determinant> <dependent>` per line [default: fds.txt if present]
    #[structopt(long, parse(from_os_str))]
    fds: Option<PathBuf>,

    /// Attributes of the universal schema that no dependency mentions
    #[structopt(long)]
    extra: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Attribute closure of a schema
    Closure { schema: String },
    /// One candidate key of the universal schema
    Key,
    /// Minimal cover of the dependencies
    Cover,
    /// Dependencies with redundant ones dropped
    NonRedundant,
    /// Chase test of a decomposition
    Lossless {
        #[structopt(required = true)]
        relations: Vec<String>,
    },
    /// Dependency-preserving lossless 3NF decomposition
    Synthesize,
    /// Print the universal schema and dependencies
    Show,
}

fn load_problem(opt: &Opt) -> Result<Problem> {
    let problem = match &opt.fds {
        Some(path) => Problem::load(path)?,
        None if Path::new(FDS_FILENAME).exists() => Problem::load(FDS_FILENAME)?,
        None => Problem::default(),
    };

    Ok(match &opt.extra {
        Some(extra) => problem.with_extra(&parse_field_set(extra)?),
        None => problem,
    })
}

fn run(problem: &Problem, command: Command) -> Result<String> {
    debug!(?command, "running command");
    Ok(match command {
        Command::Closure { schema } => problem.closure(&parse_field_set(&schema)?).to_string(),
        Command::Key => problem.candidate_key()?.to_string(),
        Command::Cover => problem.minimal_cover().to_string().trim_end().to_owned(),
        Command::NonRedundant => problem.non_redundant().to_string().trim_end().to_owned(),
        Command::Lossless { relations } => {
            let relations = relations
                .iter()
                .map(|relation| parse_field_set(relation))
                .collect::<Result<Vec<FieldSet>>>()?;
            if problem.is_lossless(&relations)? {
                "lossless".to_owned()
            } else {
                "lossy".to_owned()
            }
        }
        Command::Synthesize => problem.synthesize_3nf()?.iter().join("\n"),
        Command::Show => format!("universe {}\n{}", problem.universe, problem.fds)
            .trim_end()
            .to_owned(),
    })
}

fn handle_input(problem: &Problem, line: &str) -> Result<String> {
    let args = std::iter::once("fdnorm").chain(line.split_whitespace());
    let command = Command::from_iter_safe(args)?;
    run(problem, command)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let mut opt = Opt::from_args();
    init_tracing(opt.verbose);

    let problem = load_problem(&opt)?;

    if let Some(command) = opt.command.take() {
        println!("{}", run(&problem, command)?);
        return Ok(());
    }

    let mut editor = Editor::<()>::new();
    loop {
        let readline = editor.readline("> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str());

                match handle_input(&problem, &line) {
                    Ok(output) => {
                        println!("{}", output);
                    }
                    Err(e) => {
                        println!("Error: {}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    Ok(())
}
