//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 读取两张源图并确认二者“可比”：宽、高、通道数完全一致。
//! 目标是尽快失败：先做文件签名与图片头尺寸检查，再进行完整解码。
//!
//! ## 实现思路
//!
//! 1. 读取文件字节（缺失/不可读 → `DecodeFailed`）
//! 2. 文件签名（magic bytes）已识别为非图片时直接拒绝
//! 3. 只读图片头获取尺寸，按像素上限快速拒绝
//! 4. 完整解码，保留文件原生通道数（不强制转换为 RGBA）
//! 5. 比较两张图的宽、高、通道数

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, GenericImageView, ImageReader};

use super::source::LoadedSourcePair;
use super::{DiffConfig, DiffHandler, ImageBuffer, LoadError};

impl DiffHandler {
    /// 解码并校验两张源图。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use delta_image::image_diff::{DiffConfig, DiffHandler};
    ///
    /// let pair = DiffHandler::load_and_validate("a.png", "b.png", &DiffConfig::default())?;
    /// println!("{}x{}x{}", pair.width, pair.height, pair.channel_count);
    /// # Ok::<(), delta_image::image_diff::LoadError>(())
    /// ```
    pub fn load_and_validate(
        first_path: impl AsRef<Path>,
        second_path: impl AsRef<Path>,
        config: &DiffConfig,
    ) -> Result<LoadedSourcePair, LoadError> {
        let first = Self::load_image(first_path.as_ref(), config)?;
        let second = Self::load_image(second_path.as_ref(), config)?;

        if first.width() != second.width()
            || first.height() != second.height()
            || first.channel_count() != second.channel_count()
        {
            return Err(LoadError::DimensionMismatch {
                first_width: first.width(),
                first_height: first.height(),
                first_channels: first.channel_count(),
                second_width: second.width(),
                second_height: second.height(),
                second_channels: second.channel_count(),
            });
        }

        let (width, height, channel_count) = (first.width(), first.height(), first.channel_count());

        Ok(LoadedSourcePair {
            first,
            second,
            width,
            height,
            channel_count,
        })
    }

    /// 读取并解码单张图片。
    pub(crate) fn load_image(path: &Path, config: &DiffConfig) -> Result<ImageBuffer, LoadError> {
        log::info!("📁 开始读取图片 - 路径: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| Self::decode_failed(path, e))?;
        Self::validate_image_signature(path, &bytes)?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(path, &bytes)?;
        Self::validate_pixel_limits(path, config, header_width, header_height)?;

        let decoded = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| Self::decode_failed(path, e))?
            .decode()
            .map_err(|e| Self::decode_failed(path, e))?;

        let color = decoded.color();
        let buffer = Self::into_native_buffer(decoded).ok_or_else(|| LoadError::DecodeFailed {
            path: path.to_path_buf(),
            reason: "解码后像素数据长度异常".to_string(),
        })?;

        log::info!(
            "✅ 图片解码成功 - 路径: {} 尺寸: {}x{} 通道: {}（{:?}）",
            path.display(),
            buffer.width(),
            buffer.height(),
            buffer.channel_count(),
            color
        );

        Ok(buffer)
    }

    /// 按原生通道数转换为 8 位交错缓冲。
    ///
    /// 16 位与浮点图片收窄为每通道 8 位，通道数保持不变。
    fn into_native_buffer(decoded: DynamicImage) -> Option<ImageBuffer> {
        let (width, height) = decoded.dimensions();
        let color = decoded.color();
        if !matches!(
            color,
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
        ) {
            log::debug!("🔻 源图为 {:?}，按每通道 8 位收窄，精度会丢失", color);
        }

        let (channel_count, data) = match color.channel_count() {
            1 => (1, decoded.into_luma8().into_raw()),
            2 => (2, decoded.into_luma_alpha8().into_raw()),
            3 => (3, decoded.into_rgb8().into_raw()),
            _ => (4, decoded.into_rgba8().into_raw()),
        };

        ImageBuffer::from_raw(width, height, channel_count, data)
    }

    /// 仅通过图片头信息读取宽高，用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(path: &Path, bytes: &[u8]) -> Result<(u32, u32), LoadError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| Self::decode_failed(path, e))?
            .into_dimensions()
            .map_err(|e| Self::decode_failed(path, e))
    }

    fn validate_pixel_limits(
        path: &Path,
        config: &DiffConfig,
        width: u32,
        height: u32,
    ) -> Result<(), LoadError> {
        let pixels = width as u64 * height as u64;

        if pixels > config.max_decoded_pixels {
            return Err(LoadError::ResourceLimit {
                path: path.to_path_buf(),
                pixels,
                limit: config.max_decoded_pixels,
            });
        }

        Ok(())
    }

    /// 通过文件签名尽早拒绝非图片内容。
    ///
    /// 签名无法识别时交给解码器判断（部分格式没有 magic bytes）。
    fn validate_image_signature(path: &Path, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::DecodeFailed {
                path: path.to_path_buf(),
                reason: "文件内容为空".to_string(),
            });
        }

        if let Some(kind) = infer::get(bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(LoadError::DecodeFailed {
                    path: path.to_path_buf(),
                    reason: format!("文件签名不是图片类型：{}", kind.mime_type()),
                });
            }
        }

        Ok(())
    }

    fn decode_failed(path: &Path, err: impl std::fmt::Display) -> LoadError {
        LoadError::DecodeFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}
