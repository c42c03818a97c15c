use std::{io::Write, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use errors::SkelError;
use log::info;
use skel::Skeleton;

mod errors;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLine {
    #[arg(required = true, help = "The automaton description to read")]
    automaton: PathBuf,
    #[arg(long, help = "Name of the skeleton, defaults to the file name")]
    name: Option<String>,
    #[arg(long, help = "Condition the automaton belongs to", default_value_t = String::new())]
    cond: String,
    #[arg(long, help = "Line the automaton was defined on", default_value_t = 0)]
    line: u32,
    #[arg(long, help = "List every skeleton node")]
    nodes: bool,
    #[arg(long, help = "Write the skeleton graph in Graphviz format to this file")]
    dot: Option<PathBuf>,
}

fn build_report(cli: &CommandLine) -> Result<String, SkelError> {
    let path = cli.automaton.as_path();
    let contents =
        std::fs::read_to_string(path).map_err(|e| SkelError::io(path.to_path_buf(), e))?;
    let desc =
        skel_input::parse_automaton(&contents).map_err(|e| SkelError::parse(path, &contents, e))?;

    let name = cli.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    });
    let skeleton = Skeleton::new(
        &desc.dfa,
        &desc.charset,
        desc.default_rule,
        &name,
        &cli.cond,
        cli.line,
    )
    .map_err(|e| SkelError::skeleton(path, e))?;

    if let Some(dot_path) = &cli.dot {
        std::fs::write(dot_path, skeleton.dot())
            .map_err(|e| SkelError::io(dot_path.to_path_buf(), e))?;
        info!("wrote skeleton graph to {}", dot_path.display());
    }

    let mut report = format!("skeleton '{}'", skeleton.name);
    if !skeleton.cond.is_empty() {
        report.push_str(&format!(" (condition '{}')", skeleton.cond));
    }
    report.push_str(&format!(
        "\nrules:     {}\ntag vers:  {}\n{}\n",
        skeleton.rules.len(),
        skeleton.ntagver,
        skeleton.stats()
    ));
    if cli.nodes {
        report.push_str(&format!("\n{}", skeleton));
    }
    Ok(report)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = CommandLine::parse();
    let report = match build_report(&cli) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", report).wrap_err("failed to write report")?;
    Ok(())
}
