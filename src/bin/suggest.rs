use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use scrabble_engine::{
    Board, CandidateMove, Decision, DecisionRequest, Difficulty, Direction, Engine, Lexicon, Position, Rack, Settings,
};
use structopt::StructOpt;

/// Tiles left in the bag once both players drew their first rack
const OPENING_BAG: u32 = 86;

#[derive(Debug)]
enum FileOrString {
    File(PathBuf),
    String(String),
}

impl FileOrString {
    pub fn read_to_string(self) -> std::io::Result<String> {
        match self {
            Self::String(s) => Ok(s),
            Self::File(f) => std::fs::read_to_string(f),
        }
    }
}

impl<'de> serde::Deserialize<'de> for FileOrString {
    fn deserialize<D>(deserializer: D) -> Result<FileOrString, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};
        use std::fmt;

        #[derive(serde::Deserialize)]
        #[serde(field_identifier, rename_all = "snake_case")]
        enum FileKey {
            File,
        }

        struct FileOrStringVisitor;

        impl<'de> Visitor<'de> for FileOrStringVisitor {
            type Value = FileOrString;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a table with a `file` key")
            }

            fn visit_map<V>(self, mut map: V) -> Result<FileOrString, V::Error>
            where
                V: MapAccess<'de>,
            {
                let _: FileKey = map.next_key()?.ok_or_else(|| V::Error::missing_field("file"))?;
                let file = map.next_value()?;
                Ok(FileOrString::File(file))
            }

            fn visit_str<E>(self, v: &str) -> Result<FileOrString, E> {
                Ok(FileOrString::String(v.to_owned()))
            }
            fn visit_string<E>(self, v: String) -> Result<FileOrString, E> {
                Ok(FileOrString::String(v))
            }
        }

        deserializer.deserialize_any(FileOrStringVisitor)
    }
}

/// What to decide on, next to the engine [`Settings`] in the same sources
#[derive(Debug, serde::Deserialize)]
struct Inputs {
    /// The board as a string or the file containing it, empty when absent
    board: Option<FileOrString>,

    /// The rack as a string or the file containing it
    rack: FileOrString,

    tiles_remaining: Option<u32>,

    difficulty: Option<Difficulty>,

    /// The number of top moves shown, not present means all of them
    n_shown: Option<usize>,

    #[serde(default)]
    position_format: PositionFormat,
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum PositionFormat {
    LetterDigit,
    DigitLetter,
}

impl Default for PositionFormat {
    fn default() -> Self {
        Self::LetterDigit
    }
}

impl PositionFormat {
    fn format(&self, pos: Position) -> String {
        match self {
            Self::LetterDigit => format!("{:>2}-{:<2}", (b'A' + pos.col as u8) as char, pos.row + 1),
            Self::DigitLetter => format!("{:>2}-{:<2}", pos.col + 1, (b'A' + pos.row as u8) as char),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "suggest", about = "Rank the moves for a rack and show what the engine would do")]
struct Opt {
    /// The config file, engine knobs and the inputs below can all go there
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// The words that are allowed to be played.
    ///
    /// Either a `.txt` file with one word per line, or a `.fst` file generated with `make_fst`
    #[structopt(short = "d", long = "dictionary")]
    dict: Option<String>,

    /// The board, where one line in the file corresponds to one row of the board.
    /// Spaces, dots and underscores are empty squares, uppercase letters are blanks
    #[structopt(short = "b", long = "board")]
    board_file: Option<String>,

    /// The rack, a string of its letters where stars are blanks
    #[structopt(short = "r", long = "rack")]
    rack: Option<String>,

    /// Tiles left in the bag
    #[structopt(short = "t", long = "tiles-remaining")]
    tiles_remaining: Option<u32>,

    /// basic or advanced
    #[structopt(short = "l", long = "level")]
    difficulty: Option<Difficulty>,

    /// The number of top moves shown, not present means all of them are shown
    #[structopt(short = "n", long = "number-shown")]
    n_shown: Option<usize>,
}

fn load_config(opt: Opt) -> Result<(Settings, Inputs), config::ConfigError> {
    let mut s = Settings::layered(opt.config.as_deref())?;

    if let Some(d) = opt.dict {
        s.set("dictionary", d)?;
    }
    if let Some(b) = opt.board_file {
        s.set("board.file", b)?;
    }
    if let Some(r) = opt.rack {
        s.set("rack", r)?;
    }
    if let Some(t) = opt.tiles_remaining {
        s.set("tiles_remaining", i64::from(t))?;
    }
    if let Some(d) = opt.difficulty {
        s.set(
            "difficulty",
            match d {
                Difficulty::Basic => "basic",
                Difficulty::Advanced => "advanced",
            },
        )?;
    }
    if let Some(n) = opt.n_shown {
        let n = i64::try_from(n).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        s.set("n_shown", n)?;
    }

    let settings = Settings::from_config(s.clone())?;
    Ok((settings, s.try_into()?))
}

fn format_move(mov: &CandidateMove, position_format: PositionFormat) -> String {
    let first = mov.placements.first().map(|p| p.pos).unwrap_or(mov.anchor);
    let arrow = match mov.direction {
        Direction::Horizontal => "→",
        Direction::Vertical => "↓",
    };
    let tiles: String = mov
        .placements
        .iter()
        .map(|p| if p.is_blank { p.letter.to_char().to_ascii_uppercase() } else { p.letter.to_char() })
        .collect();
    format!("{} {} {:<15} +{}", position_format.format(first), arrow, mov.word, tiles)
}

fn run() -> Result<(), Box<dyn Error>> {
    let (settings, inputs) = load_config(Opt::from_args())?;

    let lexicon = match &settings.dictionary {
        Some(path) => {
            let lexicon = Lexicon::new();
            if let Err(err) = lexicon.load_path(path) {
                log::warn!("could not load {}: {}", path.display(), err);
            }
            lexicon
        }
        None => Lexicon::built_in()?,
    };

    let board: Board = match inputs.board {
        Some(b) => b.read_to_string()?.parse()?,
        None => Board::empty(),
    };
    let rack: Rack = inputs.rack.read_to_string()?.trim().parse()?;
    let request = DecisionRequest {
        board,
        rack,
        tiles_remaining: inputs.tiles_remaining.unwrap_or(OPENING_BAG),
        difficulty: inputs.difficulty.unwrap_or(Difficulty::Basic),
    };

    let engine = Engine::from_settings(Arc::new(lexicon), &settings);

    let start = Instant::now();
    let ranked = engine.ranked(&request.board, &request.rack, request.tiles_remaining);
    log::info!("{} moves ranked in {:?}", ranked.len(), Instant::now() - start);

    let shown = inputs.n_shown.unwrap_or(ranked.len());
    for m in ranked.iter().take(shown) {
        println!(
            "{:>3} {:>+6.1}  {}",
            m.candidate.score,
            m.strategic,
            format_move(&m.candidate, inputs.position_format)
        );
    }

    match engine.generate_decision_within(request, engine.budget()) {
        Decision::Play { word, score, .. } => println!("decision: play {} for {}", word, score),
        Decision::Exchange { letters } => {
            println!("decision: exchange {}", letters.iter().map(|t| t.to_string()).collect::<String>())
        }
        Decision::Pass => println!("decision: pass"),
    }
    Ok(())
}

fn main() {
    if let Err(err) = simple_logger::SimpleLogger::from_env().init() {
        eprintln!("logger: {}", err);
    }

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
