use std::{fs, path::Path};

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use multilang_sentiment::{
    datasets::{
        prepare::{prepare, PrepareConfig},
        quality::check_quality,
        DataLayout, RawRecord, SentimentDataset, Source,
    },
    pipelines::text_classification::{fit, infer, train, ModelConfig, TrainingConfig},
    text::{
        repair::{repair_tokenizer, RepairOutcome},
        Side, Tokenizer, TokenizerError,
    },
};
use pretty_assertions::assert_eq;

fn write_raw_sources(layout: &DataLayout) {
    fs::create_dir_all(&layout.data_dir).unwrap();

    let mut english = Vec::new();
    for i in 0..6 {
        let label = if i % 2 == 0 { "0" } else { "4" };
        let row = format!("\"{label}\",\"{i}\",\"Mon Apr 06\",\"NO_QUERY\",\"user{i}\",\"Tweet {i} caf");
        english.extend_from_slice(row.as_bytes());
        // Latin-1 encoded e acute
        english.push(0xe9);
        english.extend_from_slice(b" http://t.co/x!\"\n");
    }
    english.extend_from_slice(b"\"2\",\"9\",\"d\",\"q\",\"u\",\"neutral tweet\"\n");
    fs::write(layout.source(Source::Sentiment140), english).unwrap();

    fs::write(
        layout.source(Source::French),
        "label,text\n1,\"Très bien, merci !\"\n0,C'est nul...\n",
    )
    .unwrap();

    fs::write(
        layout.source(Source::ArabicNegative),
        "neg\tسيء جدا\nneg\tلا أحب هذا\n",
    )
    .unwrap();

    fs::write(layout.source(Source::ArabicPositive), "pos\tجيد!\n").unwrap();
}

#[test]
fn prepares_a_merged_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::default().with_data_dir(dir.path().join("data"));
    write_raw_sources(&layout);

    let config = PrepareConfig::new().with_english_sample(4).with_seed(Some(1));
    let summary = prepare(&layout, &config).unwrap();

    assert_eq!(summary.english, 4);
    assert_eq!(summary.french, 2);
    assert_eq!(summary.arabic, 3);

    let merged = fs::read_to_string(layout.merged()).unwrap();
    let lines: Vec<_> = merged.lines().collect();

    assert_eq!(lines[0], "cleaned_text,sentiment,lang");
    assert_eq!(lines.len(), 10);
    assert_eq!(&lines[5..], &[
        "très bien merci,positif,fr",
        "cest nul,négatif,fr",
        "سيء جدا,négatif,ar",
        "لا أحب هذا,négatif,ar",
        "جيد,positif,ar",
    ]);
    assert!(lines[1..5].iter().all(|line| line.ends_with(",en")));
    assert!(lines[1..5].iter().any(|line| line.contains("café")));
}

#[test]
fn quality_check_flags_unlabeled_english_rows() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::default().with_data_dir(dir.path().join("data"));
    write_raw_sources(&layout);

    // Keep every English row, including the one with an unknown label
    let config = PrepareConfig::new().with_english_sample(100).with_seed(Some(3));
    prepare(&layout, &config).unwrap();

    let report = check_quality(&layout.merged()).unwrap();

    assert_eq!(report.total, 12);
    assert_eq!(report.missing, 1);
    assert_eq!(report.invalid, 0);

    let (row, RawRecord { cleaned_text, .. }) = &report.missing_examples[0];
    assert!(*row < 7);
    assert_eq!(cleaned_text.as_deref(), Some("neutral tweet"));

    assert!(SentimentDataset::load(&layout.merged()).is_err());
}

#[tokio::test]
async fn repaired_tokenizer_loads() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("tokenizer.json");
    let fixed = dir.path().join("tokenizer_fixed.json");

    fs::write(
        &broken,
        r#"{"class_name": "Tokenizer", "config": {"num_words": 10000, "lower": true, "split": " ", "char_level": false, "oov_token": null, "document_count": 3}, "word_index": "{\"جيد\": 1, \"mauvais\": 2}"}"#,
    )
    .unwrap();

    assert!(matches!(
        Tokenizer::load(&broken).await,
        Err(TokenizerError::EncodedWordIndex)
    ));

    let outcome = repair_tokenizer(&broken, &fixed).await.unwrap();
    assert_eq!(outcome, RepairOutcome::Repaired);

    let tokenizer = Tokenizer::load(&fixed).await.unwrap();
    assert_eq!(tokenizer.text_to_sequence("très mauvais جيد"), vec![2, 1]);
    assert_eq!(tokenizer.config().document_count, 3);

    // A second pass has nothing left to do
    let outcome = repair_tokenizer(&fixed, &fixed).await.unwrap();
    assert_eq!(outcome, RepairOutcome::AlreadyObject);
}

fn tiny_config() -> TrainingConfig {
    TrainingConfig::new(
        ModelConfig::new()
            .with_vocab_size(32)
            .with_embedding_size(4)
            .with_sequence_hidden_size(4)
            .with_summary_hidden_size(4)
            .with_dense_size(4),
    )
    .with_max_len(6)
    .with_batch_size(4)
    .with_num_epochs(1)
    .with_num_workers(1)
}

fn assert_artifacts(artifact_dir: &Path) {
    assert!(artifact_dir.join("config.json").exists());
    assert!(artifact_dir.join("model.mpk").exists());
    assert!(artifact_dir.join("tokenizer.json").exists());
}

#[tokio::test]
async fn trains_and_classifies() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path().join("data"), dir.path().join("model"));

    let texts = [
        ("très bien", "positif"),
        ("très mauvais", "négatif"),
        ("good movie", "positif"),
        ("bad movie", "négatif"),
        ("جيد", "positif"),
        ("سيء", "négatif"),
        ("great", "positif"),
        ("awful", "négatif"),
        ("", "négatif"),
        ("super bien", "positif"),
    ];
    fs::create_dir_all(&layout.data_dir).unwrap();
    let mut merged = String::from("cleaned_text,sentiment,lang\n");
    for (text, sentiment) in texts {
        merged.push_str(&format!("{text},{sentiment},\n"));
    }
    fs::write(layout.merged(), merged).unwrap();

    let evaluation = train::<Autodiff<NdArray>>(NdArrayDevice::default(), tiny_config(), &layout)
        .await
        .unwrap();

    assert_eq!(evaluation.items, 2);
    assert!((0.0..=1.0).contains(&evaluation.accuracy));
    assert_artifacts(&layout.artifact_dir);

    let predictions = infer::<NdArray>(
        NdArrayDevice::default(),
        &layout,
        &layout.tokenizer(),
        Some((Side::Post, Side::Post)),
        vec!["جيد".to_string(), "très mauvais".to_string()],
    )
    .await
    .unwrap();

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].tokens.len(), 6);
    assert_eq!(predictions[0].tokens[1..], [0, 0, 0, 0, 0]);
    assert!(predictions
        .iter()
        .all(|prediction| (prediction.probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-4));
}

#[tokio::test]
async fn rejects_zero_length_sequences() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path().join("data"), dir.path().join("model"));

    let records = vec![RawRecord {
        cleaned_text: Some("bien".to_string()),
        sentiment: Some("positif".to_string()),
        lang: Some("fr".to_string()),
    }];
    let dataset = SentimentDataset::from_records(records).unwrap();

    let result = fit::<Autodiff<NdArray>>(
        NdArrayDevice::default(),
        dataset,
        tiny_config().with_max_len(0),
        &layout,
    )
    .await;

    assert!(result.is_err());
    assert!(!layout.artifact_dir.exists());
}

#[tokio::test]
async fn training_needs_the_merged_file() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path().join("data"), dir.path().join("model"));

    let result = train::<Autodiff<NdArray>>(NdArrayDevice::default(), tiny_config(), &layout).await;

    assert!(result.unwrap_err().to_string().contains("multilang_sentiment_data.csv"));
}
