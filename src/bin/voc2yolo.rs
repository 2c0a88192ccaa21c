use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use yolomedia::config::Args;
use yolomedia::conversion;

fn main() -> ExitCode {
    // 初始化日志
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.annotations_dir.is_dir() {
        error!("标注目录不存在: {}", args.annotations_dir.display());
        return ExitCode::FAILURE;
    }

    info!("开始转换VOC标注...");
    match conversion(&args.annotations_dir, &args.output_dir, &args.output_filename) {
        Ok(summary) => {
            info!("转换完成，共 {} 行", summary.images);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("转换失败: {}", e);
            ExitCode::FAILURE
        }
    }
}
