use dir_sizes::{setup_tracing, sum_small_dirs, DiskConfig};

use anyhow::Result;
use util::read_input_lines;

fn main() -> Result<()> {
    setup_tracing();

    let res = sum_small_dirs(read_input_lines()?, DiskConfig::default().small_dir_threshold)?;

    println!("{res}");

    Ok(())
}
