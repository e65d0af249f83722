use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rolling_stats::Stats;
use std::path::{Path, PathBuf};
use std::thread;

use bioscope::config::{FilterParams, ViewerConfig};
use bioscope::design::FilterSpec;
use bioscope::output::{ChannelSummary, DesignReport, OutputFormat, create_formatter};
use bioscope::stream::{ChannelSource, ChunkSource, StreamSession, WavFileSource};
use bioscope::wav::ChunkWavWriter;

#[derive(Parser, Debug)]
#[command(name = "bioscope")]
#[command(about = "FIR filter design and streaming filtering for biosignal recordings", long_about = None)]
struct Args {
    /// Viewer configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Design a filter and print its taps
    Design {
        /// Filter parameters: four band edges in Hz ("1 2 30 35") or a tap count ("5")
        params: FilterParams,

        /// Sample rate in Hz
        #[arg(short = 'r', long)]
        sample_rate: f64,

        /// Stopband attenuation in dB (overrides the config file)
        #[arg(short, long)]
        attenuation: Option<f64>,

        /// Keep the linear-phase design instead of converting to minimum phase
        #[arg(long)]
        linear_phase: bool,
    },
    /// Stream a WAV file through a filter and write the result
    Filter {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (32-bit float)
        output: PathBuf,

        /// Filter parameters; empty for no filtering
        #[arg(short, long, default_value = "")]
        params: FilterParams,

        /// Frames per chunk (overrides the config file)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Keep the linear-phase design instead of converting to minimum phase
        #[arg(long)]
        linear_phase: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Design {
            params,
            sample_rate,
            attenuation,
            linear_phase,
        } => {
            if let Some(attenuation) = attenuation {
                config.filter.attenuation_db = attenuation;
            }
            if linear_phase {
                config.filter.minimum_phase = false;
            }
            run_design(&config, &params, sample_rate, args.format, args.verbose)
        }
        Command::Filter {
            input,
            output,
            params,
            chunk_size,
            linear_phase,
        } => {
            if let Some(chunk_size) = chunk_size {
                config.stream.chunk_size = chunk_size;
            }
            if linear_phase {
                config.filter.minimum_phase = false;
            }
            config.validate()?;
            run_filter(&config, &input, &output, &params, args.format, args.verbose)
        }
    }
}

fn run_design(
    config: &ViewerConfig,
    params: &FilterParams,
    sample_rate: f64,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let spec = if params.is_empty() {
        None
    } else {
        Some(FilterSpec::from_params(
            params.values(),
            sample_rate,
            &config.filter,
        )?)
    };

    let session = StreamSession::with_spec(config, 1, sample_rate, spec)
        .context("Filter design failed")?;
    let report = DesignReport::new(session.spec(), session.coefficients(), sample_rate);
    println!("{}", create_formatter(format, verbose).format_design(&report));
    Ok(())
}

fn run_filter(
    config: &ViewerConfig,
    input: &Path,
    output: &Path,
    params: &FilterParams,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let mut reader = WavFileSource::new(input, config.stream.chunk_size)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let sample_rate = reader.sample_rate();
    let num_channels = reader.num_channels();

    let mut session = StreamSession::new(config, num_channels, sample_rate, params)
        .context("Filter design failed")?;
    let formatter = create_formatter(format, verbose);

    if verbose {
        let report = DesignReport::new(session.spec(), session.coefficients(), session.sample_rate());
        eprintln!("{}", create_formatter(OutputFormat::Text, false).format_design(&report));
    }

    let (chunk_tx, mut source) = ChannelSource::bounded(16, sample_rate, num_channels);
    let reader_handle = thread::spawn(move || -> Result<()> {
        while let Some(chunk) = reader.next_chunk()? {
            if chunk_tx.send(chunk).is_err() {
                log::warn!("Processing loop stopped; dropping remaining chunks");
                break;
            }
        }
        Ok(())
    });

    let mut writer = ChunkWavWriter::create(output, num_channels, sample_rate.round() as u32)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut stats: Vec<Stats<f32>> = (0..num_channels).map(|_| Stats::new()).collect();

    while let Some(chunk) = source.next_chunk()? {
        let filtered = session.push_chunk(&chunk)?;
        for (channel_stats, samples) in stats.iter_mut().zip(filtered.channels()) {
            for &x in samples {
                channel_stats.update(x);
            }
        }
        writer
            .write_chunk(&filtered)
            .context("Failed to write filtered chunk")?;
    }

    reader_handle
        .join()
        .map_err(|_| anyhow::anyhow!("WAV reader thread panicked"))??;
    writer.finalize().context("Failed to finalize output WAV")?;

    if let Some(header) = formatter.channel_header() {
        println!("{}", header);
    }
    for (channel, s) in stats.iter().enumerate() {
        let summary = ChannelSummary {
            channel: channel + 1,
            count: s.count,
            mean: s.mean,
            std_dev: s.std_dev,
            min: s.min,
            max: s.max,
        };
        println!("{}", formatter.format_channel(&summary));
    }

    log::info!(
        "Filtered {} -> {} ({} channels @ {} Hz)",
        input.display(),
        output.display(),
        num_channels,
        sample_rate
    );
    Ok(())
}
