/// 长度头部占用的比特数。
/// 头部是一个大端序 `u32`，记录的是载荷的比特长度 (而不是字节长度)。
pub const HEADER_BITS: usize = 32;

/// 每个像素中参与隐写的颜色通道数 (R, G, B)。
/// 第 4 个及之后的通道 (如 Alpha) 永远不会被修改。
pub const COLOR_CHANNELS: usize = 3;

/// 隐写后图像默认文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 恢复出的载荷默认文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 恢复出的载荷默认使用的扩展名。载荷是任意二进制数据。
pub const RECOVERED_EXTENSION: &str = "bin";
