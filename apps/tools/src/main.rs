use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use converter::Converter;
use shared::domain::LESSONS;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a Python file (or `-` for stdin) to a Sigma16 listing.
    Convert {
        input: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Report whether a Python file converts, without printing the listing.
    Check { input: PathBuf },
    /// List the lessons served by the web app.
    Lessons,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert { input, output } => {
            let source = read_source(&input)?;
            let listing = converter::convert(&source)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            match output {
                Some(path) => fs::write(&path, listing + "\n")
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{listing}"),
            }
        }
        Command::Check { input } => {
            let source = read_source(&input)?;
            match Converter::new(&source).assemble() {
                Ok(assembly) => println!(
                    "{}: ok ({} variables)",
                    input.display(),
                    assembly.variables().len()
                ),
                Err(err) => bail!("{}: {err}", input.display()),
            }
        }
        Command::Lessons => {
            for lesson in LESSONS {
                println!("{:>2}  {:<10} {}", lesson.id.0, lesson.slug, lesson.title);
            }
        }
    }

    Ok(())
}

fn read_source(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}
