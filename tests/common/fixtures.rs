//! Deterministic chain exports

use chain_inspector::{Chain, TaskType};
use std::path::{Path, PathBuf};

/// Chains at or past this index are classification chains
pub const CLASSIFICATION_START: usize = 16;
/// Chain whose `cv_score` sits far above the rest
pub const OUTLIER_ID: &str = "chain-18";
/// Chain with an explicit null `cv_score`
pub const NULL_SCORE_ID: &str = "chain-19";

const DATASETS: [&str; 3] = ["wheat", "corn", "soy"];
const MODELS: [&str; 4] = ["PLS", "SVR", "RF", "Ridge"];

/// Twenty chains: 18 evenly spaced scores, one outlier, one null score
pub fn sample_chains() -> Vec<Chain> {
    (0..20)
        .map(|i| {
            let task_type = match i {
                i if i < CLASSIFICATION_START => TaskType::Regression,
                i if i % 2 == 0 => TaskType::BinaryClassification,
                _ => TaskType::MulticlassClassification,
            };
            let mut chain = Chain::new(
                format!("chain-{i:02}"),
                DATASETS[i % DATASETS.len()],
                MODELS[i % MODELS.len()],
                task_type,
            )
            .with_run(format!("run-{}", i / 10))
            .with_score("val_score", 1.0 - i as f64 * 0.01);

            chain = match i {
                18 => chain.with_score("cv_score", 5.0),
                19 => chain.with_null_score("cv_score"),
                _ => chain.with_score("cv_score", 0.5 + i as f64 * 0.02),
            };
            if i % 3 != 0 {
                chain = chain.with_branch(format!("branch/{}", i % 2));
            }
            chain
        })
        .collect()
}

/// Write chains as a JSON export and return its path
pub fn write_export(dir: &Path, chains: &[Chain]) -> PathBuf {
    let path = dir.join("chains.json");
    let json = serde_json::to_string_pretty(chains).expect("serialize chains");
    std::fs::write(&path, json).expect("write export");
    path
}
