use clap::{App, Arg};

use sgd_utils::{generate_metadata, write_metadata, Corpus};

fn main() -> sgd_utils::Result<()> {
    env_logger::init();

    let matches = App::new("sgd-generate-metadata")
        .about("Scans an SGD corpus checkout and writes its metadata report")
        .arg(
            Arg::with_name("CORPUS_DIR")
                .takes_value(true)
                .index(1)
                .help("path to the corpus checkout (defaults to the current directory)"),
        )
        .get_matches();
    let corpus_dir = matches.value_of("CORPUS_DIR").unwrap_or(".");

    let corpus = Corpus::new(corpus_dir);
    let report = generate_metadata(&corpus)?;
    write_metadata(&report, &corpus.root().join("metadata.json"))?;
    Ok(())
}
