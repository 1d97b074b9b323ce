//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::steganography::LsbCount;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。\n每个颜色通道使用 1 或 2 个最低有效位，隐藏和恢复时必须使用相同的位数。"
)]
pub struct Cli {
    /// 输出更详细的日志 (可重复使用，如 -vv)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏一个文件。
    #[command(alias = "encrypt")]
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文件。
    #[command(alias = "decrypt")]
    Recover(RecoverArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径，内容按原始字节处理。
    #[arg(short, long)]
    pub file: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像同目录下的 `doctored_<文件名>`。
    #[arg(short, long, visible_alias = "output", visible_short_alias = 'o')]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的最低有效位数 (1 或 2)。
    #[arg(short, long = "lsb-count", visible_aliases = ["lsb", "lsb_count"], default_value_t = LsbCount::Two)]
    pub lsb_count: LsbCount,

    /// 目标文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long, visible_alias = "file", visible_short_alias = 'f')]
    pub image: PathBuf,

    /// 恢复数据后，保存文件内容的输出路径。
    /// 默认为图像同目录下的 `recovered_<图像名>.bin`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 隐藏时使用的最低有效位数 (1 或 2)。
    #[arg(short, long = "lsb-count", visible_aliases = ["lsb", "lsb_count"], default_value_t = LsbCount::Two)]
    pub lsb_count: LsbCount,

    /// 目标文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_defaults_to_two_bits_without_dest() {
        let cli = Cli::try_parse_from(["lsb_embed", "hide", "-i", "cover.png", "-f", "secret.bin"])
            .unwrap();
        let Commands::Hide(args) = cli.command else {
            panic!("expected hide");
        };
        assert_eq!(args.lsb_count, LsbCount::Two);
        assert_eq!(args.dest, None);
        assert!(!args.force);
    }

    #[test]
    fn encrypt_accepts_original_flags() {
        let cli = Cli::try_parse_from([
            "lsb_embed", "encrypt", "-f", "secret.bin", "-i", "cover.bmp", "-o", "stego.bmp",
            "--lsb_count", "1",
        ])
        .unwrap();
        let Commands::Hide(args) = cli.command else {
            panic!("expected hide");
        };
        assert_eq!(args.file, PathBuf::from("secret.bin"));
        assert_eq!(args.image, PathBuf::from("cover.bmp"));
        assert_eq!(args.dest, Some(PathBuf::from("stego.bmp")));
        assert_eq!(args.lsb_count, LsbCount::One);
    }

    #[test]
    fn decrypt_accepts_original_flags() {
        let cli = Cli::try_parse_from([
            "lsb_embed", "decrypt", "-f", "stego.bmp", "-o", "out.txt", "--lsb", "2",
        ])
        .unwrap();
        let Commands::Recover(args) = cli.command else {
            panic!("expected recover");
        };
        assert_eq!(args.image, PathBuf::from("stego.bmp"));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.lsb_count, LsbCount::Two);
    }

    #[test]
    fn lsb_count_outside_one_or_two_is_rejected() {
        assert!(
            Cli::try_parse_from(["lsb_embed", "hide", "-i", "a.png", "-f", "b", "-l", "3"]).is_err()
        );
    }
}
