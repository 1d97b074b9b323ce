use clap::Parser;

use lsb_embed::{
    cli::{Cli, Commands},
    handler::{handle_hide, handle_recover},
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据指定的子命令（`hide` 或 `recover`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 默认只输出警告，每个 -v 提升一级；RUST_LOG 优先
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
    }
}
