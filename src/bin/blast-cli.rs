//! blast-cli - Command-line interface for pkdcl
//!
//! Compresses and decompresses PKWare DCL streams. Input defaults to stdin and
//! output to stdout, so the tool can sit in a pipeline. `--offset` lets a
//! fixed-size leading header bypass the codec.

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pkdcl::{
    ChunkCodec, CompressionHeader, CompressionMode, CompressionStats, DictionarySize, Exploder,
    Imploder,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Bytes read from the input per engine call
const CHUNK_SIZE: usize = 64 * 1024;

/// Inputs larger than this get a progress bar
const PROGRESS_THRESHOLD: u64 = 1024 * 1024;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "blast-cli")]
#[command(about = "A CLI tool for PKWare DCL compression and decompression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress data into a DCL stream
    Compress {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        mode: ModeArgs,

        /// Compression level: 1, 2 or 3 selects a 1KB, 2KB or 4KB dictionary
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,

        #[command(flatten)]
        offset: OffsetArgs,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Decompress a DCL stream
    Decompress {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        offset: OffsetArgs,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a compressed file
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },
}

#[derive(Args, Clone, Copy)]
#[group(required = true, multiple = false)]
struct ModeArgs {
    /// ASCII compression mode (optimized for text data)
    #[arg(long)]
    ascii: bool,

    /// Binary compression mode (optimized for binary data)
    #[arg(long)]
    binary: bool,
}

impl ModeArgs {
    fn mode(&self) -> CompressionMode {
        if self.ascii {
            CompressionMode::ASCII
        } else {
            CompressionMode::Binary
        }
    }
}

#[derive(Args, Clone, Copy, Default)]
struct OffsetArgs {
    /// Leading bytes that bypass the codec, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_offset, default_value = "0")]
    offset: u64,

    /// Omit the leading bytes instead of copying them to the output
    #[arg(long)]
    drop_before_offset: bool,
}

fn parse_offset(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|_| format!("'{value}' is not a decimal or 0x-prefixed hexadecimal offset"))
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            mode,
            level,
            offset,
            force,
        } => DictionarySize::from_level(level)
            .map_err(Into::into)
            .and_then(|dict_size| {
                compress(
                    input.as_deref(),
                    output.as_deref(),
                    mode.mode(),
                    dict_size,
                    offset,
                    force,
                    cli.quiet,
                )
            })
            .map(|(stats, elapsed)| {
                report("Compression", &stats, elapsed, cli.verbose, cli.quiet)
            }),
        Commands::Decompress {
            input,
            output,
            offset,
            force,
        } => decompress(
            input.as_deref(),
            output.as_deref(),
            offset,
            force,
            cli.quiet,
        )
        .map(|(stats, elapsed)| {
            report("Decompression", &stats, elapsed, cli.verbose, cli.quiet)
        }),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compress(
    input: Option<&Path>,
    output: Option<&Path>,
    mode: CompressionMode,
    dict_size: DictionarySize,
    offset: OffsetArgs,
    force: bool,
    quiet: bool,
) -> CliResult<(CompressionStats, std::time::Duration)> {
    let start_time = Instant::now();
    let mut engine = Imploder::new(mode, dict_size);
    process(&mut engine, input, output, offset, force, quiet, "Compressing...")?;
    Ok((engine.stats().clone(), start_time.elapsed()))
}

fn decompress(
    input: Option<&Path>,
    output: Option<&Path>,
    offset: OffsetArgs,
    force: bool,
    quiet: bool,
) -> CliResult<(CompressionStats, std::time::Duration)> {
    let start_time = Instant::now();
    let mut engine = Exploder::new();
    process(&mut engine, input, output, offset, force, quiet, "Decompressing...")?;
    Ok((engine.stats().clone(), start_time.elapsed()))
}

/// Open both ends and stream the input through `engine`
fn process<C: ChunkCodec>(
    engine: &mut C,
    input: Option<&Path>,
    output: Option<&Path>,
    offset: OffsetArgs,
    force: bool,
    quiet: bool,
    message: &'static str,
) -> CliResult<()> {
    if let Some(path) = output {
        if path.exists() && !force {
            return Err(format!(
                "Output file '{}' already exists. Use --force to overwrite",
                path.display()
            )
            .into());
        }
    }

    let (reader, input_size) = open_input(input)?;
    let progress = match input_size {
        Some(size) if !quiet && size > PROGRESS_THRESHOLD => Some(progress_bar(size, message)?),
        _ => None,
    };
    let reader: Box<dyn Read> = match &progress {
        Some(pb) => Box::new(pb.wrap_read(reader)),
        None => reader,
    };

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    transform(engine, reader, writer, offset)?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(())
}

fn open_input(input: Option<&Path>) -> CliResult<(Box<dyn Read>, Option<u64>)> {
    match input {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Input file '{}' does not exist", path.display()).into());
            }
            let file = File::open(path)?;
            let size = file.metadata()?.len();
            Ok((Box::new(file), Some(size)))
        }
        None => Ok((Box::new(io::stdin().lock()), None)),
    }
}

fn progress_bar(size: u64, message: &'static str) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new(size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}",
            )?
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    Ok(pb)
}

/// Copy or drop the first `offset` bytes, then run the rest through `engine`
fn transform<C, R, W>(
    engine: &mut C,
    mut input: R,
    mut output: W,
    offset: OffsetArgs,
) -> CliResult<()>
where
    C: ChunkCodec,
    R: Read,
    W: Write,
{
    let mut head = (&mut input).take(offset.offset);
    if offset.drop_before_offset {
        io::copy(&mut head, &mut io::sink())?;
    } else {
        io::copy(&mut head, &mut output)?;
    }

    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        output.write_all(&engine.feed(&buffer[..n])?)?;
    }

    output.write_all(&engine.finish()?)?;
    output.flush()?;
    Ok(())
}

fn report(
    action: &str,
    stats: &CompressionStats,
    elapsed: std::time::Duration,
    verbose: bool,
    quiet: bool,
) {
    if quiet {
        return;
    }

    // Data may be going to stdout, so the summary goes to stderr
    eprintln!("✓ {} successful!", action);
    eprintln!("  Input:  {} bytes", stats.input_bytes);
    eprintln!("  Output: {} bytes", stats.output_bytes);
    eprintln!("  Ratio:  {:.1}%", stats.ratio() * 100.0);
    eprintln!("  Time:   {:.2?}", elapsed);

    if verbose {
        eprintln!("  Literals:     {}", stats.literal_count);
        eprintln!("  Repetitions:  {}", stats.match_count);
        eprintln!("  Longest:      {} bytes", stats.longest_match);
    }
}

fn show_file_info(input: &Path, verbose: bool) -> CliResult<()> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    let header = CompressionHeader::read(&data)?;

    println!("DCL Stream Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", data.len());
    println!(
        "  Compression Mode: {:?} ({})",
        header.mode, header.mode as u8
    );
    println!(
        "  Dictionary Size: {} bytes ({} bits)",
        header.dict_size.bytes(),
        header.dictionary_size_bits()
    );

    if verbose {
        println!("  Header bytes: {:02x} {:02x}", data[0], data[1]);
    }

    match explode_with_stats(&data) {
        Ok((decompressed_size, stats)) => {
            println!("  Decompressed Size: {} bytes", decompressed_size);
            println!(
                "  Compression Ratio: {:.1}%",
                data.len() as f64 / decompressed_size.max(1) as f64 * 100.0
            );
            if verbose {
                println!("  Literals: {}", stats.literal_count);
                println!("  Repetitions: {}", stats.match_count);
            }
            println!("  Status: ✓ Valid DCL stream");
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted DCL stream");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}

fn explode_with_stats(data: &[u8]) -> pkdcl::Result<(usize, CompressionStats)> {
    let mut engine = Exploder::new();
    let mut size = engine.feed(data)?.len();
    size += engine.finish()?.len();
    Ok((size, engine.stats().clone()))
}
