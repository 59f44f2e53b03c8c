//! # Command Line Interface
//!
//! Runs pass one over a macro source file and saves the tables for pass two.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};
use log::{error, info};
use std::path::{Path, PathBuf};

use macropass::{MacroError, Pass1, PassConfig, emit, source};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help = "The first line of SOURCE is a header and is not read as macro source.
Tables are written as JSON files mntab, kpdtab, pntab and mdtab into the output directory.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error";

    let matches = Command::new("macropass")
        .about("Builds the macro tables of a two-pass macro processor.")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("macro source file")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("directory for the table files")
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("fail on lines outside a macro, nested MACRO or missing MEND")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-header")
                .long("no-header")
                .help("read the first line as macro source too")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sigil")
                .long("sigil")
                .value_name("CHAR")
                .help("leading character of parameter references")
                .value_parser(value_parser!(char))
                .default_value("&"),
        )
        .arg(
            Arg::new("print")
                .short('p')
                .long("print")
                .help("print the tables to stdout")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches.get_one::<PathBuf>("source").expect(RCH);
    let out_dir = matches.get_one::<PathBuf>("out").expect(RCH);
    let config = PassConfig::new()
        .strict(matches.get_flag("strict"))
        .skip_header(!matches.get_flag("no-header"))
        .sigil(*matches.get_one::<char>("sigil").expect(RCH));

    if let Err(e) = run(path, out_dir, config, matches.get_flag("print")) {
        error!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}

fn run(path: &Path, out_dir: &Path, config: PassConfig, print: bool) -> Result<(), MacroError> {
    let lines = source::read_lines(path)?;
    let output = Pass1::new(config).perform(&lines)?;
    emit::save_tables(&output.tables, out_dir)?;
    if print {
        print!("{}", output.tables);
    }
    info!(
        "{} macros, {} body lines, {} warnings",
        output.tables.names().len(),
        output.tables.body().len(),
        output.diagnostics.len()
    );
    Ok(())
}
