//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、图像解码与编码、调用核心隐写算法以及向用户报告结果。

use crate::cli::{HideArgs, RecoverArgs};
use crate::constants::{DOCTORED_PREFIX, HEADER_BITS, RECOVERED_EXTENSION, RECOVERED_PREFIX};
use crate::steganography::{capacity_bits, embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ColorType, DynamicImage, ImageFormat};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和载荷文件、调用隐写核心函数嵌入数据，最后将结果写入目标图像文件。
/// 只有在嵌入成功之后才会写入输出，容量不足时不会留下任何文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和 LSB 位数的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且没有指定 `--force`。
/// * 目标文件的扩展名不是无损图像格式。
/// * 无法读取或解码输入的图像，或图像不是 8 位 RGB/RGBA。
/// * 无法读取载荷文件。
/// * 图像没有足够的空间来隐藏载荷。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = match args.dest {
        Some(dest) => dest,
        None => default_dest(&args.image)?,
    };
    ensure_writable(&dest, args.force)?;
    let format = lossless_format(&dest)?;

    println!(
        "Hiding {} in {} using {} LSB per channel.",
        args.file.to_string_lossy().cyan(),
        args.image.to_string_lossy().cyan(),
        args.lsb_count.to_string().yellow().bold()
    );

    let (picture, channels) = open_picture(&args.image)?;

    let payload = fs::read(&args.file).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;
    info!("read {} payload bytes from {}", payload.len(), args.file.display());

    let stego = embed(&payload, picture.as_bytes(), channels, args.lsb_count).with_context(|| {
        format!(
            "Failed to hide '{}' in '{}'.",
            args.file.to_string_lossy().red().bold(),
            args.image.to_string_lossy().red().bold()
        )
    })?;

    image::save_buffer_with_format(
        &dest,
        &stego,
        picture.width(),
        picture.height(),
        picture.color(),
        format,
    )
    .with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("wrote {} ({format:?})", dest.display());

    let available = capacity_bits(stego.len() / channels, args.lsb_count);
    println!(
        "Used {} of {} available bits.",
        (HEADER_BITS as u64 + payload.len() as u64 * 8).to_string().yellow(),
        available.to_string().green()
    );
    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数提取载荷，
/// 最后将恢复的字节原样写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和 LSB 位数的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且没有指定 `--force`。
/// * 无法读取或解码输入的图像，或图像不是 8 位 RGB/RGBA。
/// * 图像中的隐藏数据格式不正确 (例如 LSB 位数与隐藏时不一致)。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let output = match args.output {
        Some(output) => output,
        None => default_output(&args.image)?,
    };
    ensure_writable(&output, args.force)?;

    println!(
        "Recovering data from {} using {} LSB per channel.",
        args.image.to_string_lossy().cyan(),
        args.lsb_count.to_string().yellow().bold()
    );

    let (picture, channels) = open_picture(&args.image)?;

    let payload = extract(picture.as_bytes(), channels, args.lsb_count).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain hidden data, or a different LSB count was used.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("recovered {} payload bytes", payload.len());

    fs::write(&output, &payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The data has been successfully recovered and saved: {}",
        output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 解码图像并返回每像素的通道数。只接受 8 位 RGB 与 RGBA，不做任何颜色转换。
fn open_picture(path: &Path) -> Result<(DynamicImage, usize)> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let channels = match picture.color() {
        ColorType::Rgb8 => 3,
        ColorType::Rgba8 => 4,
        other => anyhow::bail!(
            "Unsupported pixel format {:?} in {}. \nOnly 8-bit RGB and RGBA images are supported.",
            other,
            path.to_string_lossy().red().bold()
        ),
    };
    debug!(
        "decoded {} as {}x{} {:?}",
        path.display(),
        picture.width(),
        picture.height(),
        picture.color()
    );

    Ok((picture, channels))
}

/// 根据扩展名确定输出格式，并确保它是无损格式。
fn lossless_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Cannot determine the image format of: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::WebP
                | ImageFormat::Qoi
        ),
        "Output format {:?} is not supported. \nUse a lossless format such as PNG or BMP, otherwise the hidden bits are lost.",
        format
    );

    Ok(format)
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// `dir/image.png` -> `dir/doctored_image.png`
fn default_dest(image: &Path) -> Result<PathBuf> {
    let name = image
        .file_name()
        .with_context(|| format!("Invalid image path: {}", image.to_string_lossy().red()))?;
    Ok(image.with_file_name(format!("{DOCTORED_PREFIX}{}", name.to_string_lossy())))
}

/// `dir/image.png` -> `dir/recovered_image.bin`
fn default_output(image: &Path) -> Result<PathBuf> {
    let stem = image
        .file_stem()
        .with_context(|| format!("Invalid image path: {}", image.to_string_lossy().red()))?;
    Ok(image.with_file_name(format!(
        "{RECOVERED_PREFIX}{}.{RECOVERED_EXTENSION}",
        stem.to_string_lossy()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_next_to_the_image() {
        let image = Path::new("some/dir/cover.png");
        assert_eq!(
            default_dest(image).unwrap(),
            PathBuf::from("some/dir/doctored_cover.png")
        );
        assert_eq!(
            default_output(Path::new("some/dir/doctored_cover.png")).unwrap(),
            PathBuf::from("some/dir/recovered_doctored_cover.bin")
        );
    }

    #[test]
    fn lossy_or_unknown_destinations_are_refused() {
        assert!(lossless_format(Path::new("out.png")).is_ok());
        assert!(lossless_format(Path::new("out.bmp")).is_ok());
        assert!(lossless_format(Path::new("out.jpg")).is_err());
        assert!(lossless_format(Path::new("out")).is_err());
    }
}
