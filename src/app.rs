use std::path::PathBuf;

use clap::{App, AppSettings, Arg, ArgMatches};
use stdinout::OrExit;

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

static SIZE: &str = "size";
static TRAIN: &str = "train";
static WORDMAP: &str = "wordmap";
static OUTPUT: &str = "output";
static SAVE_VOCAB: &str = "save-vocab";
static READ_VOCAB: &str = "read-vocab";
static DEBUG: &str = "debug";
static BINARY: &str = "binary";
static CBOW: &str = "cbow";
static ALPHA: &str = "alpha";
static WINDOW: &str = "window";
static SAMPLE: &str = "sample";
static HS: &str = "hs";
static NEGATIVE: &str = "negative";
static THREADS: &str = "threads";
static ITER: &str = "iter";
static MIN_COUNT: &str = "min-count";
static CLASSES: &str = "classes";

/// Parsed and validated command-line arguments.
pub struct Args {
    pub size: u32,
    pub train: PathBuf,
    pub wordmap: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub save_vocab: Option<PathBuf>,
    pub read_vocab: Option<PathBuf>,
    pub debug: u32,
    pub binary: bool,
    pub cbow: bool,
    /// `None` means "use the architecture-dependent default"
    /// (0.025 skip-gram, 0.05 CBOW).
    pub alpha: Option<f32>,
    pub window: u32,
    pub sample: f64,
    pub hs: bool,
    pub negative: u32,
    pub threads: u32,
    pub iter: u32,
    pub min_count: u32,
    pub classes: u32,
}

impl Args {
    /// Parses `std::env::args()`, exiting the process with a one-line
    /// message on malformed input.
    pub fn parse() -> Self {
        let matches = build_app().get_matches();
        Args::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let size = parse_or_exit(matches, SIZE, "Cannot parse vector size");
        let train = PathBuf::from(matches.value_of(TRAIN).unwrap());
        let wordmap = matches.value_of(WORDMAP).map(PathBuf::from);
        let output = matches.value_of(OUTPUT).map(PathBuf::from);
        let save_vocab = matches.value_of(SAVE_VOCAB).map(PathBuf::from);
        let read_vocab = matches.value_of(READ_VOCAB).map(PathBuf::from);
        let debug = parse_or_exit(matches, DEBUG, "Cannot parse debug level");
        let binary: u8 = parse_or_exit(matches, BINARY, "Cannot parse binary flag");
        let cbow: u8 = parse_or_exit(matches, CBOW, "Cannot parse cbow flag");
        let alpha = matches
            .value_of(ALPHA)
            .map(|v| v.parse().or_exit("Cannot parse alpha", 1));
        let window = parse_or_exit(matches, WINDOW, "Cannot parse window");
        let sample = parse_or_exit(matches, SAMPLE, "Cannot parse sample threshold");
        let hs: u8 = parse_or_exit(matches, HS, "Cannot parse hs flag");
        let negative = parse_or_exit(matches, NEGATIVE, "Cannot parse negative sample count");
        let threads = parse_or_exit(matches, THREADS, "Cannot parse thread count");
        let iter = parse_or_exit(matches, ITER, "Cannot parse iteration count");
        let min_count = parse_or_exit(matches, MIN_COUNT, "Cannot parse min-count");
        let classes = parse_or_exit(matches, CLASSES, "Cannot parse class count");

        Args {
            size,
            train,
            wordmap,
            output,
            save_vocab,
            read_vocab,
            debug,
            binary: binary != 0,
            cbow: cbow != 0,
            alpha,
            window,
            sample,
            hs: hs != 0,
            negative,
            threads,
            iter,
            min_count,
            classes,
        }
    }
}

fn parse_or_exit<T>(matches: &ArgMatches, name: &str, message: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Debug,
{
    matches
        .value_of(name)
        .unwrap()
        .parse()
        .or_exit(message, 1)
}

fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("morphovec-train")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .value_name("DIMS")
                .help("Word vector dimensionality")
                .takes_value(true)
                .default_value("100"),
        )
        .arg(
            Arg::with_name(TRAIN)
                .long(TRAIN)
                .value_name("FILE")
                .help("Training corpus")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name(WORDMAP)
                .long(WORDMAP)
                .value_name("FILE")
                .help("Morphological decomposition table")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .value_name("FILE")
                .help("Output file for vectors or clusters")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SAVE_VOCAB)
                .long(SAVE_VOCAB)
                .value_name("FILE")
                .help("Save the vocabulary to FILE")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(READ_VOCAB)
                .long(READ_VOCAB)
                .value_name("FILE")
                .help("Read the vocabulary from FILE instead of scanning the corpus")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(DEBUG)
                .long(DEBUG)
                .value_name("LEVEL")
                .help("Verbosity level")
                .takes_value(true)
                .default_value("2"),
        )
        .arg(
            Arg::with_name(BINARY)
                .long(BINARY)
                .value_name("0|1")
                .help("Save the output in binary format")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::with_name(CBOW)
                .long(CBOW)
                .value_name("0|1")
                .help("Use CBOW instead of skip-gram")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name(ALPHA)
                .long(ALPHA)
                .value_name("RATE")
                .help("Initial learning rate (default: 0.05 for CBOW, 0.025 for skip-gram)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(WINDOW)
                .long(WINDOW)
                .value_name("N")
                .help("Maximum context window")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name(SAMPLE)
                .long(SAMPLE)
                .value_name("THRESHOLD")
                .help("Subsampling threshold for frequent words")
                .takes_value(true)
                .default_value("1e-3"),
        )
        .arg(
            Arg::with_name(HS)
                .long(HS)
                .value_name("0|1")
                .help("Use hierarchical softmax")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::with_name(NEGATIVE)
                .long(NEGATIVE)
                .value_name("N")
                .help("Number of negative samples")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .value_name("N")
                .help("Number of training threads")
                .takes_value(true)
                .default_value("12"),
        )
        .arg(
            Arg::with_name(ITER)
                .long(ITER)
                .value_name("N")
                .help("Number of training epochs")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name(MIN_COUNT)
                .long(MIN_COUNT)
                .value_name("N")
                .help("Discard words occurring fewer than N times")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name(CLASSES)
                .long(CLASSES)
                .value_name("K")
                .help("Output K word clusters instead of vectors (0 disables clustering)")
                .takes_value(true)
                .default_value("0"),
        )
}
