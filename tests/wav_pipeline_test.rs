use std::path::PathBuf;
use std::thread;

use approx::assert_relative_eq;

use bioscope::config::{FilterParams, ViewerConfig};
use bioscope::save_wav;
use bioscope::simulation::{ChannelConfig, NoiseConfig, Rhythm, generate_noisy_biosignal};
use bioscope::stream::{ChannelSource, ChunkSource, SampleChunk, StreamSession, WavFileSource};
use bioscope::wav::ChunkWavWriter;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bioscope-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_all(path: &PathBuf) -> SampleChunk {
    let mut source = WavFileSource::new(path, 1 << 16).unwrap();
    let mut channels = vec![Vec::new(); source.num_channels()];
    while let Some(chunk) = source.next_chunk().unwrap() {
        for (dst, src) in channels.iter_mut().zip(chunk.channels()) {
            dst.extend_from_slice(src);
        }
    }
    SampleChunk::from_channels(channels).unwrap()
}

#[test]
fn test_threaded_file_filtering_matches_single_pass() {
    let dir = temp_dir("pipeline");
    let input_path = dir.join("input.wav");
    let output_path = dir.join("filtered.wav");

    let channels: Vec<ChannelConfig> = (0..3)
        .map(|c| ChannelConfig {
            rhythms: vec![Rhythm::new(10.0, 1.0), Rhythm::new(40.0 + 10.0 * c as f32, 0.5)],
            offset: 0.2,
        })
        .collect();
    let noise = NoiseConfig::default().with_seed(5).with_awgn(20.0);
    let recording = generate_noisy_biosignal(&channels, 4.0, 250, &noise);
    save_wav(input_path.to_str().unwrap(), &recording, 250).unwrap();

    let config = ViewerConfig::default();
    let params: FilterParams = "1 2 30 35".parse().unwrap();

    // Reader thread feeding 32-frame chunks over a bounded channel
    let mut reader = WavFileSource::new(&input_path, config.stream.chunk_size).unwrap();
    let (tx, mut source) = ChannelSource::bounded(4, reader.sample_rate(), reader.num_channels());
    let handle = thread::spawn(move || {
        while let Some(chunk) = reader.next_chunk().unwrap() {
            tx.send(chunk).unwrap();
        }
    });

    let mut session = StreamSession::new(&config, 3, 250.0, &params).unwrap();
    let mut writer = ChunkWavWriter::create(&output_path, 3, 250).unwrap();
    let mut chunks = 0;
    while let Some(chunk) = source.next_chunk().unwrap() {
        writer.write_chunk(&session.push_chunk(&chunk).unwrap()).unwrap();
        chunks += 1;
    }
    handle.join().unwrap();
    writer.finalize().unwrap();
    assert_eq!(chunks, 1000usize.div_ceil(32));

    let mut reference = StreamSession::new(&config, 3, 250.0, &params).unwrap();
    let expected = reference.push_chunk(&read_all(&input_path)).unwrap();
    let filtered = read_all(&output_path);

    assert_eq!(filtered.num_channels(), 3);
    assert_eq!(filtered.num_samples(), 1000);
    for (a, b) in filtered.channels().iter().zip(expected.channels()) {
        for (x, y) in a.iter().zip(b) {
            assert_relative_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    // Display buffer saw every chunk, stamped by sample position
    let snapshot = session.display_handle().snapshot(1.0);
    assert_eq!(snapshot.total_samples, 1000);
    assert_relative_eq!(*snapshot.time.last().unwrap(), 999.0 / 250.0, epsilon = 1e-9);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_writer_rejects_wrong_channel_count() {
    let dir = temp_dir("writer");
    let path = dir.join("two.wav");
    let mut writer = ChunkWavWriter::create(&path, 2, 100).unwrap();
    let chunk = SampleChunk::from_channels(vec![vec![0.0; 4]; 3]).unwrap();
    assert!(writer.write_chunk(&chunk).is_err());
    writer
        .write_chunk(&SampleChunk::from_channels(vec![vec![0.5; 4]; 2]).unwrap())
        .unwrap();
    writer.finalize().unwrap();
    assert_eq!(read_all(&path).num_samples(), 4);
    std::fs::remove_dir_all(&dir).ok();
}
