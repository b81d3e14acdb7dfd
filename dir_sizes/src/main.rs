use dir_sizes::{parse_transcript, query, setup_tracing, DiskConfig};

use anyhow::{Context, Result};
use tracing::info;
use util::read_input_lines;

fn main() -> Result<()> {
    setup_tracing();

    let config = DiskConfig::default();
    let mut tree = parse_transcript(read_input_lines()?)?;
    let used = tree.compute_sizes()?;
    info!("{} directories, {used} bytes used", tree.dirs().count());

    let part1 = query::sum_below(&tree, config.small_dir_threshold)?;
    println!("Part 1: {part1}");

    let (_, part2) = query::smallest_to_delete(&tree, config.capacity, config.required_free)
        .context("Part 2")?;
    println!("Part 2: {part2}");

    Ok(())
}
