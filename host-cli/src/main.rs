//! # bubble-cli
//!
//! 在终端里播放两气泡对话脚本。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli -- --script host-cli/assets/scripts/demo.json
//! cargo run -p host-cli -- --auto --fps 30
//! cargo run -p host-cli -- --check
//! cargo run -p host-cli --features audio -- --config config.json
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use bubble_runtime::Script;
use clap::Parser;
use host_cli::{AppConfig, ConfigError, PlayerInput, build_player, logging, report_diagnostics};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bubble-cli")]
#[command(about = "在终端里播放两气泡对话脚本")]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 对话脚本路径（覆盖配置文件）
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 自动播放，动画结束后自动推进
    #[arg(short, long)]
    auto: bool,

    /// 帧率（覆盖配置文件）
    #[arg(long)]
    fps: Option<u32>,

    /// 日志级别（覆盖配置文件）
    #[arg(long)]
    log_level: Option<String>,

    /// 只检查脚本，不播放
    #[arg(long)]
    check: bool,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut AppConfig) {
        if let Some(script) = &self.script {
            config.script_path = script.clone();
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(&cli.config);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default(),
    };
    cli.apply(&mut config);

    logging::init(&config.log.level)?;
    match loaded {
        Ok(_) => info!(path = %cli.config.display(), "配置文件加载成功"),
        Err(ConfigError::NotFound(_)) => {
            info!(path = %cli.config.display(), "配置文件不存在，使用默认配置")
        }
        Err(e) => warn!(error = %e, "配置文件无效，使用默认配置"),
    }
    config.validate()?;

    let script = Script::load(&config.script_path)
        .with_context(|| format!("加载脚本失败: {}", config.script_path.display()))?;
    info!(
        script = %script.name,
        entries = script.len(),
        "脚本加载成功"
    );

    let has_errors = report_diagnostics(&script);
    if cli.check {
        if has_errors {
            anyhow::bail!("脚本检查未通过");
        }
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut player = build_player(&config, script, stdout.lock());

    let summary = if cli.auto {
        player.run_auto(config.auto_advance_delay)?
    } else {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let input = if line.trim().eq_ignore_ascii_case("q") {
                    PlayerInput::Quit
                } else {
                    PlayerInput::Advance
                };
                if tx.send(input).is_err() || input == PlayerInput::Quit {
                    break;
                }
            }
        });
        player.run_interactive(&rx)?
    };

    info!(
        frames = summary.frames,
        lines = summary.lines_shown,
        skips = summary.skips,
        invalid = summary.invalid_entries,
        "退出"
    );
    Ok(())
}
