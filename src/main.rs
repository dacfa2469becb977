//! # 图片增强工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与文件读写。
//! 业务逻辑分布在 `augmentor` 子模块中，详见 `lib.rs` 架构文档。
//!
//! 用法：`image-augmentor <input> <output> [config.json] [--seed N]`

use std::path::PathBuf;
use std::process::ExitCode;

use image_augmentor::error::AppError;
use image_augmentor::{AugmentConfig, Augmentor, RngSource};

const USAGE: &str = "用法：image-augmentor <input> <output> [config.json] [--seed N]";

struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, AppError> {
    let mut positional = Vec::new();
    let mut seed = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let value = args
                .next()
                .ok_or_else(|| AppError::Usage("--seed 缺少数值".to_string()))?;
            let parsed = value
                .parse::<u64>()
                .map_err(|_| AppError::Usage(format!("--seed 不是有效整数：{}", value)))?;
            seed = Some(parsed);
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next(), positional.next()) {
        (Some(input), Some(output), config, None) => Ok(CliArgs { input, output, config, seed }),
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}

async fn run(args: CliArgs) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => serde_json::from_str::<AugmentConfig>(&tokio::fs::read_to_string(path).await?)?,
        None => AugmentConfig::default(),
    };

    let rng_source = args.seed.map(RngSource::Seeded).unwrap_or_default();
    let augmentor = Augmentor::with_rng_source(config, rng_source)?;

    let input = tokio::fs::read(&args.input).await?;
    let output = augmentor.augment(input).await?;
    tokio::fs::write(&args.output, output).await?;

    log::info!("💾 已写入：{}", args.output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match parse_args(std::env::args().skip(1)) {
        Ok(args) => run(args).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}
