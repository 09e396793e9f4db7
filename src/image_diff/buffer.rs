//! # 像素缓冲模块
//!
//! ## 设计思路
//!
//! `ImageBuffer` 是流水线各阶段之间传递的唯一像素载体：加载阶段产出、比对阶段读写、
//! 输出阶段编码。缓冲始终满足 `data.len() == width * height * channel_count`，
//! 通道按纹素交错排列（如 RGB、RGBA）。
//!
//! ## 实现思路
//!
//! - `Clone` 即值语义拷贝，复制整块像素数据。
//! - 移动即转移所有权；`take` 将内容移出并把原缓冲置为空（0×0×0）。
//! - 越界访问属于编程错误，直接 panic，不作为可恢复错误处理。

/// 稠密、交错排列的 8 位像素缓冲。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channel_count: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// 分配 `width * height * channel_count` 个置零字节。
    ///
    /// # 示例
    /// ```rust
    /// use delta_image::image_diff::ImageBuffer;
    ///
    /// let buffer = ImageBuffer::new(2, 2, 3);
    /// assert_eq!(buffer.data().len(), 12);
    /// assert!(buffer.data().iter().all(|&v| v == 0));
    /// ```
    pub fn new(width: u32, height: u32, channel_count: u32) -> Self {
        let len = width as usize * height as usize * channel_count as usize;
        Self {
            width,
            height,
            channel_count,
            data: vec![0; len],
        }
    }

    /// 接管已解码的像素数据。
    ///
    /// 长度与尺寸不一致时返回 `None`。
    pub fn from_raw(width: u32, height: u32, channel_count: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|texels| texels.checked_mul(channel_count as usize))?;

        if data.len() != expected {
            return None;
        }

        Some(Self {
            width,
            height,
            channel_count,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// 纹素数量（`width * height`）。
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 读取指定纹素的指定通道。
    #[inline]
    pub fn get(&self, texel: usize, channel: usize) -> u8 {
        self.data[texel * self.channel_count as usize + channel]
    }

    /// 写入指定纹素的指定通道。
    #[inline]
    pub fn set(&mut self, texel: usize, channel: usize, value: u8) {
        let stride = self.channel_count as usize;
        self.data[texel * stride + channel] = value;
    }

    /// 移出全部内容，原缓冲变为空缓冲。
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
