mod app;
mod config;
mod run_info;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use morphovec::{
    spherical_kmeans, write_clusters, write_vectors, MorphologyTable, ParameterStore, Vocabulary,
};

use app::Args;
use run_info::RunInfo;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("morphovec-train: {:#}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = config::config_from_args(&args)?;

    let mut run_info = RunInfo::new(
        args.train.display().to_string(),
        args.output.as_ref().map(|p| p.display().to_string()),
        args.threads,
    );
    info!("starting run: {}", toml::to_string(&run_info).unwrap_or_default());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));

    spinner.set_message("building vocabulary");
    let (mut vocab, file_size) = build_vocabulary(&args)?;
    info!("vocabulary size: {}", vocab.len());

    if let Some(save_vocab_path) = &args.save_vocab {
        let file = File::create(save_vocab_path)
            .with_context(|| format!("cannot create {}", save_vocab_path.display()))?;
        vocab.save(BufWriter::new(file))?;
    }

    if let Some(wordmap_path) = &args.wordmap {
        spinner.set_message("loading morphology table");
        let file = File::open(wordmap_path)
            .map_err(|_| morphovec::MorphovecError::MissingMorphology(wordmap_path.clone()))?;
        let table = MorphologyTable::load(BufReader::new(file), &vocab)?;
        info!("morphology records: {}", table.len());
        table.join(&mut vocab);
    }

    if args.wordmap.is_none() || args.output.is_none() {
        spinner.finish_and_clear();
        return Ok(());
    }
    let output_path = args.output.as_ref().unwrap();

    if config.objective.hierarchical_softmax {
        vocab.build_huffman_codes();
    }

    spinner.set_message("training");
    let params = ParameterStore::new(&vocab, &config);
    let summary = morphovec::train(&vocab, &params, &config, &args.train, file_size)?;
    spinner.finish_and_clear();
    info!(
        "training finished: {} words processed, final alpha {:.6}",
        summary.word_count_actual, summary.final_alpha
    );

    let output_file = File::create(output_path)
        .with_context(|| format!("cannot create {}", output_path.display()))?;
    let mut writer = BufWriter::new(output_file);

    if args.classes > 0 {
        let assignment = spherical_kmeans(&params.input, args.classes);
        write_clusters(&mut writer, &vocab, &assignment)?;
    } else {
        write_vectors(&mut writer, &vocab, &params.input, args.binary)?;
    }

    run_info.set_end();
    info!("run complete: {}", toml::to_string(&run_info).unwrap_or_default());
    Ok(())
}

fn build_vocabulary(args: &Args) -> Result<(Vocabulary, u64)> {
    if let Some(read_vocab_path) = &args.read_vocab {
        let file = File::open(read_vocab_path)
            .with_context(|| format!("cannot open {}", read_vocab_path.display()))?;
        let vocab = Vocabulary::load(BufReader::new(file), u64::from(args.min_count))?;
        let file_size = std::fs::metadata(&args.train)
            .with_context(|| format!("cannot stat {}", args.train.display()))?
            .len();
        Ok((vocab, file_size))
    } else {
        let (vocab, file_size) =
            morphovec::build_from_corpus_file(&args.train, u64::from(args.min_count))?;
        Ok((vocab, file_size))
    }
}
