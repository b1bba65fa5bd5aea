mod cli;

use std::env;
use std::io::{self, BufWriter};
use std::process;

use log::debug;

use self::cli::*;

fn main() {
    let args: Vec<String> = env::args().collect();

    let cfg = match parse_args(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            help();
            process::exit(2)
        }
    };

    logger::init(cfg.verbose);

    if cfg.help {
        help();
        process::exit(0);
    }
    if cfg.version {
        println!("ingrid {}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    debug!("Starting ingrid with {cfg:?}");

    if let Err(e) = run(&cfg, BufWriter::new(io::stdout().lock())) {
        log::error!("{e}");
        process::exit(1);
    }
}
