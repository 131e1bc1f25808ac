use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use dataloader::{Backend, Loader, LoaderConfig};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Simulates a network source that delivers random-sized chunks and
/// occasionally has nothing ready.
struct FlakySource {
    rng: SmallRng,
    len: usize,
    pos: usize,
    max_chunk: usize,
    stall_rate: f64,
}

impl Backend for FlakySource {
    fn open(&mut self) -> io::Result<()> {
        self.pos = 0;
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if self.rng.random_bool(self.stall_rate) {
            return Ok(0);
        }
        let n = dst
            .len()
            .min(self.len - self.pos)
            .min(self.rng.random_range(1..=self.max_chunk));
        self.rng.fill(&mut dst[..n]);
        self.pos += n;
        Ok(n)
    }
    fn length(&self) -> usize {
        self.len
    }
    fn at_end(&self) -> bool {
        self.pos >= self.len
    }
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Parser)]
struct Args {
    /// Size of the simulated source (in MiB)
    #[clap(long, default_value_t = 16.0)]
    size: f64,
    /// Largest chunk the source delivers at once
    #[clap(long, default_value_t = 64 * 1024)]
    max_chunk: usize,
    /// Probability that a read finds nothing ready
    #[clap(long, default_value_t = 0.05)]
    stall_rate: f64,
    /// Bytes to preload on open
    #[clap(long, default_value_t = 4096)]
    preload: usize,
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rng = if let Some(seed) = args.seed {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_os_rng()
    };
    let source = FlakySource {
        rng,
        len: (args.size * 1024.0 * 1024.0) as usize,
        pos: 0,
        max_chunk: args.max_chunk.max(1),
        stall_rate: args.stall_rate.clamp(0.0, 0.99),
    };

    let config = LoaderConfig::new().with_preload_bytes(args.preload);
    let mut loader = Loader::with_config(source, config);

    let start = Instant::now();
    loader.load()?;
    let mut stalls = 0;
    while loader.status().is_loading() && loader.loaded_size() < loader.total_size() {
        // a stall ends read_all early; poll again
        if loader.read_all() == 0 {
            stalls += 1;
        }
    }
    let elapsed = start.elapsed();

    eprintln!("Loaded {} bytes", loader.loaded_size());
    eprintln!("Stalls: {}", stalls);
    eprintln!("Elapsed time: {:?}", elapsed);
    eprintln!(
        "Bandwidth: {:.2} GB/s",
        loader.loaded_size() as f64 / elapsed.as_secs_f64() / 1_000_000_000.0
    );

    Ok(())
}
