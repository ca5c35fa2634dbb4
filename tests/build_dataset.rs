use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use finetune_dataset::{
    extract_records, load_corpus, sample, tally_responses, write_dataset, BuildConfig,
    DatasetError,
};

fn conversation(id: usize, category: &str) -> String {
    let line = json!({
        "id": id,
        "messages": [
            {"role": "system", "content": "Classify the sentiment."},
            {"role": "user", "content": format!("text #{id}")},
            {"role": "assistant", "content": category}
        ]
    });
    format!("{line}\n")
}

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join("a.jsonl"),
        (0..3).map(|i| conversation(i, "A")).collect::<String>(),
    )
    .unwrap();
    fs::write(dir.join("b.jsonl"), conversation(100, "B")).unwrap();
}

fn write_config(dir: &Path, weights: &str, total: usize) -> std::path::PathBuf {
    let path = dir.join("config.ini");
    let text = format!(
        "[Paths]\njsonl_directory = {}\noutput_file = {}\nlog_directory = {}\n\n\
         [Weights]\ncategory_weights = {weights}\n\n\
         [Settings]\ntotal_examples = {total}\nseed = 42\n",
        dir.join("in").display(),
        dir.join("out/final.jsonl").display(),
        dir.join("logs").display(),
    );
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn balanced_build_from_config() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("in")).unwrap();
    write_inputs(&root.path().join("in"));
    let cfg_path = write_config(root.path(), r#"{"A": 0.5, "B": 0.5}"#, 10);

    let cfg = BuildConfig::load(&cfg_path).unwrap();
    let mut rng = StdRng::seed_from_u64(cfg.seed.unwrap());
    let corpus = load_corpus(&cfg.jsonl_directory, &mut rng).unwrap();
    assert_eq!(corpus.len(), 4);

    let dataset = sample(&corpus, &cfg.category_weights, cfg.total_examples, &mut rng).unwrap();
    let written = write_dataset(&dataset, &cfg.output_file).unwrap();
    assert_eq!(written, 10);

    let rows = tally_responses(&cfg.output_file).unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.count, 5);
        assert!((row.percentage - 50.0).abs() < 1e-9);
    }

    // every written line is one of the original conversations
    let originals: Vec<_> = corpus.iter().map(|r| r.payload.clone()).collect();
    for rec in extract_records(&cfg.output_file).unwrap() {
        assert!(originals.contains(&rec.payload));
    }
}

#[test]
fn missing_category_aborts_before_writing() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("in")).unwrap();
    write_inputs(&root.path().join("in"));
    let cfg_path = write_config(root.path(), r#"{"A": 0.4, "B": 0.4, "C": 0.2}"#, 10);

    let cfg = BuildConfig::load(&cfg_path).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let corpus = load_corpus(&cfg.jsonl_directory, &mut rng).unwrap();

    let result = sample(&corpus, &cfg.category_weights, cfg.total_examples, &mut rng)
        .and_then(|dataset| write_dataset(&dataset, &cfg.output_file));

    assert!(matches!(
        result,
        Err(DatasetError::EmptyCategory { ref category, .. }) if category == "C"
    ));
    assert!(!cfg.output_file.exists());
}

#[test]
fn fully_malformed_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("junk.jsonl"), "not json\n{\"messages\": [\n}}}\n").unwrap();
    fs::write(
        dir.path().join("ok.jsonl"),
        format!("{}{}", conversation(1, "pos"), conversation(2, "neg")),
    )
    .unwrap();

    let corpus = load_corpus(dir.path(), &mut StdRng::seed_from_u64(1)).unwrap();
    let mut categories: Vec<_> = corpus.iter().map(|r| r.category.as_str()).collect();
    categories.sort_unstable();
    assert_eq!(categories, ["neg", "pos"]);
}

#[test]
fn fixed_seed_reproduces_the_same_file() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("in")).unwrap();
    write_inputs(&root.path().join("in"));
    let cfg = BuildConfig::load(&write_config(root.path(), r#"{"A": 0.7, "B": 0.3}"#, 20)).unwrap();

    let build = |out: &Path| {
        let mut rng = StdRng::seed_from_u64(cfg.seed.unwrap());
        let corpus = load_corpus(&cfg.jsonl_directory, &mut rng).unwrap();
        let dataset = sample(&corpus, &cfg.category_weights, cfg.total_examples, &mut rng).unwrap();
        write_dataset(&dataset, out).unwrap();
        fs::read_to_string(out).unwrap()
    };

    let first = build(&root.path().join("one.jsonl"));
    let second = build(&root.path().join("two.jsonl"));
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 20);
}
