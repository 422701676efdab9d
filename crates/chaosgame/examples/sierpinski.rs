//! Run the default Chaos Game for half a second and print a coarse ASCII plot.
//!
//! Usage:
//!   cargo run -p chaosgame --example sierpinski -- [rate]
//!
//! The triangle emerges after a few thousand points.

use std::time::Duration;

use chaosgame::prelude::*;

const COLS: usize = 64;
const ROWS: usize = 32;

fn main() {
    let rate = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20_000);
    let cfg = RunnerCfg {
        rate,
        ..RunnerCfg::default()
    };
    let mut runner = match ChaosGameRunner::new(ChaosGameSettings::default(), cfg) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("sierpinski: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = runner.start() {
        eprintln!("sierpinski: {e}");
        std::process::exit(1);
    }
    let mut grid = vec![[b' '; COLS]; ROWS];
    for _ in 0..30 {
        std::thread::sleep(Duration::from_millis(16));
        for p in runner.flush_accumulated_points() {
            let col = ((p.x * COLS as f64) as usize).min(COLS - 1);
            let row = (((1.0 - p.y) * ROWS as f64) as usize).min(ROWS - 1);
            grid[row][col] = b'*';
        }
    }
    runner.stop();
    for row in &grid {
        println!("{}", String::from_utf8_lossy(row));
    }
    println!("iterations: {}", runner.iteration());
}
