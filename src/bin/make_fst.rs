use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use scrabble_engine::{EngineError, LexiconBuilder};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "make_fst", about = "Compile a word list into an fst lexicon, which loads much faster")]
struct Opt {
    /// The input list. One word per line, words with characters outside a-z are skipped
    #[structopt(short = "i", long = "input-list", parse(from_os_str))]
    list_file: PathBuf,

    /// Where to write the compiled lexicon
    #[structopt(short = "o", long = "output-fst", parse(from_os_str))]
    fst_file: PathBuf,
}

fn run(opts: Opt) -> Result<(), EngineError> {
    let Opt { list_file, fst_file } = opts;

    let start = Instant::now();
    let mut builder = LexiconBuilder::new();
    for line in BufReader::new(File::open(list_file)?).lines() {
        builder.insert(&line?);
    }
    log::info!("{} words loaded in {:?}", builder.len(), Instant::now() - start);

    let start = Instant::now();
    let wtr = BufWriter::new(File::create(fst_file)?);
    let n = builder.write_to(wtr)?;
    log::info!("{} words written in {:?}", n, Instant::now() - start);
    Ok(())
}

fn main() {
    if let Err(err) = simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Info).init() {
        eprintln!("logger: {}", err);
    }

    if let Err(err) = run(Opt::from_args()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
