use dir_sizes::{setup_tracing, size_to_delete, DiskConfig};

use anyhow::Result;
use util::read_input_lines;

fn main() -> Result<()> {
    setup_tracing();

    let config = DiskConfig::default();
    let res = size_to_delete(read_input_lines()?, config.capacity, config.required_free)?;

    println!("{res}");

    Ok(())
}
