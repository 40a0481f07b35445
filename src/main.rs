// --- Файл: src/main.rs ---

//! Главный исполняемый файл: несколько запусков синтетического эксперимента
//! с персистентными диаграммами, метрики пишутся рядом с копией исходника.

mod demo;

use crate::demo::DemoConfig;
use clap::Parser;
use log::info;
use rustytda::data::{SyntheticProvider, UpperDiagonalThresholdedLogTransform};
use rustytda::experiment::{ExperimentRunner, RunnerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Аргументы командной строки
#[derive(Parser, Debug)]
#[command(author, version, about = "RustyTDA: persistence-diagram experiment driver", long_about = None)]
struct Args {
    /// Количество запусков эксперимента
    #[arg(short = 'n', long, default_value_t = 3)]
    runs: usize,

    /// Количество эпох в каждом запуске
    #[arg(long, default_value_t = 30)]
    epochs: usize,

    /// Количество синтетических образцов
    #[arg(long, default_value_t = 240)]
    samples: usize,

    /// Количество классов
    #[arg(long, default_value_t = 3)]
    classes: usize,

    /// Максимум точек в диаграмме
    #[arg(long, default_value_t = 16)]
    max_points: usize,

    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// Доля тестовой части
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Порог ν логарифмического преобразования
    #[arg(long, default_value_t = 0.1)]
    nu: f32,

    /// Количество структурных элементов на представление
    #[arg(long, default_value_t = 16)]
    centers: usize,

    #[arg(long, default_value_t = 0.5)]
    learning_rate: f32,

    /// Seed; запуск i использует seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Куда класть директорию запуска (по умолчанию текущая)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Файл, копируемый в директорию запуска (по умолчанию исходник бинарника)
    #[arg(long)]
    experiment_file: Option<PathBuf>,
}

/// Исходник бинарника, привязанный к корню пакета, а не к текущей директории.
fn default_experiment_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(file!())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Параметры проверяются до того, как драйвер создаст директорию запуска
    let transform = UpperDiagonalThresholdedLogTransform::new(args.nu)?;

    let class_names: Vec<String> = (0..args.classes).map(|c| format!("class_{}", c)).collect();
    let class_refs: Vec<&str> = class_names.iter().map(String::as_str).collect();
    let provider = Arc::new(SyntheticProvider::generate(
        args.samples,
        &class_refs,
        &["dim_0", "dim_1"],
        args.max_points,
        args.seed.unwrap_or(0),
    )?);
    info!("[Config] {} samples, {} classes, {} runs", args.samples, args.classes, args.runs);

    let demo_config = DemoConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        test_size: args.test_size,
        transform,
        num_centers: args.centers,
        learning_rate: args.learning_rate,
    };

    let mut runner_config = RunnerConfig::new().with_experiment_name("synthetic_slayer");
    if let Some(dir) = &args.output_dir {
        runner_config = runner_config.with_base_dir(dir);
    }
    let experiment_file = args.experiment_file.clone().unwrap_or_else(default_experiment_file);

    let mut run_index = 0u64;
    let summary = ExperimentRunner::new(runner_config).run(
        args.runs,
        || {
            let seed = args.seed.map(|s| s.wrapping_add(run_index));
            run_index += 1;
            demo::run_once(Arc::clone(&provider), &demo_config, seed)
        },
        &experiment_file,
    )?;

    println!(
        "Mean trailing test accuracy over {} runs: {:.4}",
        summary.results.len(),
        summary.mean_trailing_accuracy
    );
    println!("Results: {}", summary.results_path.display());
    Ok(())
}
