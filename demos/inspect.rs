use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use dataloader::{BoxedBackend, FileBackend, LoadStatus, Loader, LoaderConfig, MmapBackend};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Source {
    /// Detect compression from the file contents
    Auto,
    /// Plain file reads
    File,
    /// Memory-mapped file
    Mmap,
}

#[derive(Parser)]
struct Args {
    /// Input file path
    #[clap(required = true)]
    path: String,
    /// Backend used to read the file
    #[clap(long, value_enum, default_value_t = Source::Auto)]
    source: Source,
    /// Bytes to preload when the file is opened
    #[clap(long, default_value_t = 64)]
    preload: usize,
    /// Bytes requested per read
    #[clap(long, default_value_t = 64 * 1024)]
    chunk: usize,
    /// Bytes of the file head to print
    #[clap(long, default_value_t = 32)]
    head: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.chunk == 0 {
        bail!("--chunk must be positive");
    }

    let config = LoaderConfig::new().with_preload_bytes(args.preload);
    let mut loader = match args.source {
        Source::Auto => {
            let mut loader = Loader::from_path(&args.path)?;
            loader.set_preload_bytes(args.preload);
            loader
        }
        Source::File => {
            let backend: BoxedBackend = Box::new(FileBackend::new(&args.path));
            Loader::with_config(backend, config)
        }
        Source::Mmap => {
            let backend: BoxedBackend = Box::new(MmapBackend::new(&args.path));
            Loader::with_config(backend, config)
        }
    };

    let start = Instant::now();
    loader.load()?;
    eprintln!(
        "Opened {} ({} bytes, {} preloaded)",
        args.path,
        loader.total_size(),
        loader.loaded_size()
    );

    let mut reads = 0;
    while loader.status() == LoadStatus::Loading {
        if loader.read(args.chunk) == 0 {
            break;
        }
        reads += 1;
    }
    let elapsed = start.elapsed();

    let progress = loader.progress();
    eprintln!("Status: {}", progress.status);
    eprintln!(
        "Loaded: {}/{} bytes ({:.1}%) in {} reads",
        progress.loaded,
        progress.total,
        progress.fraction() * 100.0,
        reads
    );
    eprintln!("Elapsed time: {:?}", elapsed);

    let head = &loader.data()[..args.head.min(loader.loaded_size())];
    for (i, line) in head.chunks(16).enumerate() {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:08x}  {}", i * 16, hex.join(" "));
    }

    loader.teardown()?;
    Ok(())
}
