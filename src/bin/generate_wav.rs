use anyhow::{Context, Result};
use bioscope::save_wav;
use bioscope::simulation::{
    AdditiveNoiseConfig, ChannelConfig, LineNoiseConfig, NoiseConfig, Rhythm,
    generate_noisy_biosignal,
};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic multi-channel biosignal WAV files")]
struct Args {
    /// TOML description of channels and noise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "data/synthetic.wav")]
    output: PathBuf,

    /// Number of channels when no config file is given
    #[arg(short = 'n', long, default_value_t = 4)]
    channels: usize,

    /// Base seed for reproducibility; channel c uses seed + c
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 250)]
    sample_rate: u32,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f32>,

    /// Mains interference frequency in Hz (CLI override)
    #[arg(long)]
    line_hz: Option<f32>,

    /// Write a JSON manifest next to the WAV file
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    #[serde(default, rename = "channel")]
    channels: Vec<ChannelConfig>,
    #[serde(default)]
    noise: NoiseConfig,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    file: String,
    sample_rate: u32,
    duration: f32,
    channels: usize,
    seed: Option<u64>,
}

/// Alpha rhythm plus a slower theta component, phase shifted per channel
fn default_channels(count: usize) -> Vec<ChannelConfig> {
    (0..count)
        .map(|c| ChannelConfig {
            rhythms: vec![
                Rhythm {
                    freq_hz: 10.0,
                    amplitude: 20.0,
                    phase_radians: 0.3 * c as f32,
                },
                Rhythm::new(6.0, 8.0),
            ],
            offset: 0.0,
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_noise_config(toml: &TomlConfig, args: &Args) -> NoiseConfig {
    let mut config = toml.noise.clone();
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(snr) = args.snr {
        config.additive = Some(AdditiveNoiseConfig { snr_db: snr });
    }
    if let Some(freq_hz) = args.line_hz {
        let amplitude = config.line.as_ref().map_or(5.0, |l| l.amplitude);
        config.line = Some(LineNoiseConfig { freq_hz, amplitude });
    }
    config
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let toml_config = match args.config {
        Some(ref path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };
    let channels = if toml_config.channels.is_empty() {
        default_channels(args.channels)
    } else {
        toml_config.channels.clone()
    };
    if channels.is_empty() {
        anyhow::bail!("At least one channel is required");
    }

    let noise_config = build_noise_config(&toml_config, &args);
    let signal = generate_noisy_biosignal(&channels, args.duration, args.sample_rate, &noise_config);

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    let output = args
        .output
        .to_str()
        .context("Output path is not valid UTF-8")?;
    save_wav(output, &signal, args.sample_rate).context("Failed to write WAV file")?;

    if args.manifest {
        let manifest = Manifest {
            file: output.to_string(),
            sample_rate: args.sample_rate,
            duration: args.duration,
            channels: signal.num_channels(),
            seed: noise_config.seed,
        };
        let manifest_path = args.output.with_extension("json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} channels x {} samples in {}",
        signal.num_channels(),
        signal.num_samples(),
        args.output.display()
    );
    Ok(())
}
