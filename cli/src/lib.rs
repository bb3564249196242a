use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use triplestore::{
    DatasetConfig, DatasetDecoder, Decoder, Encoder, Format, Literal, Object, Snapshot, Source, Triple,
};

#[derive(Debug, Parser)]
#[command(name = "tstore")]
#[command(about = "Load, query and convert RDF triples in memory")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode the input files and write them out in another format
    Convert {
        /// Files to read; all of them are decoded concurrently
        #[clap(long, short, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        /// Format of the input files. Inferred from each file's extension if omitted
        #[clap(long, value_parser = parse_format)]
        from: Option<Format>,
        /// Format to write: binary or ntriples
        #[clap(long, value_parser = parse_format)]
        to: Format,
        /// File to write
        #[clap(long, short)]
        output: PathBuf,
    },
    /// Print the number of triples, in total and per predicate
    Stat {
        #[clap(long, short, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[clap(long, value_parser = parse_format)]
        from: Option<Format>,
        /// Output JSON instead of text
        #[clap(long, action, default_value = "false")]
        json: bool,
    },
    /// Print the triples with a given predicate and object
    Query {
        #[clap(long, short, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[clap(long, value_parser = parse_format)]
        from: Option<Format>,
        /// Predicate IRI to match
        #[clap(long, short)]
        predicate: String,
        /// Match objects referring to this resource
        #[clap(long, short, conflicts_with = "literal", required_unless_present = "literal")]
        resource: Option<String>,
        /// Match literal objects with this value
        #[clap(long, short)]
        literal: Option<String>,
        /// Type of the literal to match, e.g. xsd:integer. Defaults to xsd:string
        #[clap(long, short = 't', requires = "literal", conflicts_with = "resource")]
        datatype: Option<String>,
    },
    /// Load every source listed in a dataset config file
    Load {
        /// Path to the JSON dataset config
        #[clap(long, short)]
        config: PathBuf,
    },
}

fn parse_format(s: &str) -> std::result::Result<Format, String> {
    match s.to_ascii_lowercase().as_str() {
        "binary" | "bin" => Ok(Format::Binary),
        "ntriples" | "nt" => Ok(Format::NTriples),
        other => Err(format!(
            "unknown format '{}' (expected binary or ntriples)",
            other
        )),
    }
}

/// Lets `TRIPLESTORE_LOG` override `RUST_LOG`.
pub fn init_logging() {
    if let Ok(log_level) = std::env::var("TRIPLESTORE_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}

pub fn run() -> Result<()> {
    init_logging();
    let cmd = Cli::parse();
    execute(cmd, &mut std::io::stdout().lock())
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_from_args_with_output(args, &mut std::io::stdout().lock())
}

/// Like [`run_from_args`], but command output goes to `out`.
pub fn run_from_args_with_output<I, T, W>(args: I, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    init_logging();
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd, out)
}

fn execute<W: Write>(cmd: Cli, out: &mut W) -> Result<()> {
    // CLI flags take precedence over RUST_LOG; with neither, default to "warn".
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    match cmd.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
        } => {
            let inputs = with_formats(&input, from)?;
            let triples = decode_all(&inputs)?;
            write_triples(&output, to, &triples)?;
            writeln!(
                out,
                "Wrote {} triples to {} ({})",
                triples.len(),
                output.display(),
                to
            )?;
        }
        Commands::Stat { input, from, json } => {
            let snap = load_snapshot(&with_formats(&input, from)?)?;
            let mut per_predicate: BTreeMap<&str, usize> = BTreeMap::new();
            for t in snap.triples() {
                *per_predicate.entry(t.predicate()).or_default() += 1;
            }
            if json {
                let stats = serde_json::json!({
                    "triples": snap.count(),
                    "predicates": per_predicate,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                writeln!(out, "{} triples", snap.count())?;
                for (predicate, n) in &per_predicate {
                    writeln!(out, "  {:>8}  {}", n, predicate)?;
                }
            }
        }
        Commands::Query {
            input,
            from,
            predicate,
            resource,
            literal,
            datatype,
        } => {
            let object = match (resource, literal) {
                (Some(id), _) => Object::resource(id),
                (None, Some(value)) => match datatype {
                    Some(dt) => Literal::new(dt, value).into(),
                    None => Literal::string(value).into(),
                },
                (None, None) => return Err(anyhow::anyhow!("--resource or --literal is required")),
            };
            let snap = load_snapshot(&with_formats(&input, from)?)?;
            let matches = snap.with_pred_obj(&predicate, &object);
            info!("{} triples match <{}> {}", matches.len(), predicate, object);
            for t in matches {
                writeln!(out, "{}", t)?;
            }
        }
        Commands::Load { config } => {
            let dataset = DatasetConfig::from_file(&config)
                .with_context(|| format!("reading dataset config {}", config.display()))?;
            let mut inputs = Vec::with_capacity(dataset.sources.len());
            for source in &dataset.sources {
                inputs.push((source.file.clone(), source.resolved_format()?));
            }
            let snap = load_snapshot(&inputs)?;
            writeln!(
                out,
                "Loaded {} triples from {} sources",
                snap.count(),
                inputs.len()
            )?;
        }
    }

    Ok(())
}

/// Pairs each input with its explicit or extension-implied format.
fn with_formats(inputs: &[PathBuf], from: Option<Format>) -> Result<Vec<(PathBuf, Format)>> {
    inputs
        .iter()
        .map(|path| {
            let format = from
                .or_else(|| Format::from_extension(path))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Cannot tell the format of {}; pass --from",
                        path.display()
                    )
                })?;
            Ok((path.clone(), format))
        })
        .collect()
}

/// Decodes every input, one concurrent dataset decode per format. A failing
/// input is reported as a warning and whatever it yielded is kept.
fn decode_all(inputs: &[(PathBuf, Format)]) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for format in [Format::Binary, Format::NTriples] {
        let mut readers = Vec::new();
        for (path, _) in inputs.iter().filter(|(_, f)| *f == format) {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            readers.push(BufReader::new(file));
        }
        if readers.is_empty() {
            continue;
        }
        let n_files = readers.len();
        let mut decoder = DatasetDecoder::new(move |r: BufReader<File>| format.decoder(r), readers);
        match decoder.decode() {
            Ok(decoded) => {
                info!("decoded {} triples from {} {} files", decoded.len(), n_files, format);
                triples.extend(decoded);
            }
            Err(partial) => {
                warn!(
                    "failed to decode {} input: {}; keeping {} triples",
                    format,
                    partial.error,
                    partial.triples.len()
                );
                triples.extend(partial.triples);
            }
        }
    }
    Ok(triples)
}

fn load_snapshot(inputs: &[(PathBuf, Format)]) -> Result<Snapshot> {
    let mut source = Source::new();
    source.add(decode_all(inputs)?);
    Ok(source.snapshot())
}

fn write_triples(path: &Path, format: Format, triples: &[Triple]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    format.encoder(&mut w).encode(triples)?;
    w.flush()?;
    Ok(())
}
