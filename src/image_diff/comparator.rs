//! # 比对模块
//!
//! ## 设计思路
//!
//! 单次遍历两张源图的每个纹素、每个参与比对的通道：
//! 计算绝对差值、累计统计，并把样本交给派生产物列表逐一生成输出字节。
//!
//! ## 实现思路
//!
//! - 四通道输入且 `strip_alpha` 开启时，参与比对的通道数降为 3；
//!   alpha 既不计入统计，也不出现在输出图中。
//! - 读取源图时按**源通道数**计算步长，写入输出图时按**比对通道数**计算步长。
//! - 纯内存变换，无 I/O；除输出图外不做额外分配。

use super::derivation::Sample;
use super::source::{ComparisonResult, LoadedSourcePair, NamedArtifact};
use super::{DiffConfig, DiffHandler, ImageBuffer};

impl DiffHandler {
    /// 比对两张源图，产出派生图与累计统计。
    ///
    /// # 示例
    /// ```rust
    /// use delta_image::image_diff::{DiffConfig, DiffHandler, ImageBuffer, LoadedSourcePair};
    ///
    /// let pair = LoadedSourcePair {
    ///     first: ImageBuffer::new(2, 2, 3),
    ///     second: ImageBuffer::new(2, 2, 3),
    ///     width: 2,
    ///     height: 2,
    ///     channel_count: 3,
    /// };
    /// let result = DiffHandler::compare(pair, &DiffConfig::default());
    /// assert_eq!(result.total_texel_delta, 0);
    /// assert_eq!(result.texel_channel_count, 12);
    /// ```
    pub fn compare(pair: LoadedSourcePair, config: &DiffConfig) -> ComparisonResult {
        let source_channels = pair.channel_count as usize;
        let compared_channels = Self::compared_channel_count(pair.channel_count, config.strip_alpha);
        let texel_count = pair.width as usize * pair.height as usize;

        let derivations = config.unique_derivations();
        let mut outputs: Vec<ImageBuffer> = derivations
            .iter()
            .map(|_| ImageBuffer::new(pair.width, pair.height, compared_channels))
            .collect();

        let first = pair.first.data();
        let second = pair.second.data();

        let mut first_total_value: u64 = 0;
        let mut second_total_value: u64 = 0;
        let mut total_texel_delta: u64 = 0;

        for texel_index in 0..texel_count {
            for channel in 0..compared_channels as usize {
                let source_offset = texel_index * source_channels + channel;
                let sample = Sample {
                    first: first[source_offset],
                    second: second[source_offset],
                    texel_index,
                    channel,
                    width: pair.width,
                };

                for (derivation, output) in derivations.iter().zip(outputs.iter_mut()) {
                    output.set(texel_index, channel, derivation.derive(&sample));
                }

                first_total_value += sample.first as u64;
                second_total_value += sample.second as u64;
                total_texel_delta += sample.delta() as u64;
            }
        }

        let texel_channel_count = texel_count as u64 * compared_channels as u64;

        log::info!(
            "🔍 比对完成 - {}x{} 源通道: {} 比对通道: {} 总差值: {} 样本数: {}",
            pair.width,
            pair.height,
            source_channels,
            compared_channels,
            total_texel_delta,
            texel_channel_count
        );

        let artifacts = derivations
            .iter()
            .zip(outputs)
            .map(|(derivation, image)| NamedArtifact {
                name: derivation.artifact_name().to_string(),
                image,
            })
            .collect();

        ComparisonResult {
            artifacts,
            first_total_value,
            second_total_value,
            total_texel_delta,
            texel_channel_count,
        }
    }

    /// 参与比对的通道数：四通道且剔除 alpha 时为 3，否则与源一致。
    pub fn compared_channel_count(source_channels: u32, strip_alpha: bool) -> u32 {
        if strip_alpha && source_channels == 4 {
            3
        } else {
            source_channels
        }
    }
}
