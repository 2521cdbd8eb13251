/// Codec configuration for hiding and unveiling messages
///
/// Passed explicitly into every operation, there is no process wide state.
#[derive(Debug, Clone, Default)]
pub struct CodecOptions {
    /// What happens when a message does not fit into the carrier.
    pub capacity: CapacityPolicy,

    /// What happens when unveiling runs out of carrier before the end marker showed up.
    pub marker: MarkerPolicy,

    /// The color plane of video frames that carries the message bits.
    pub video_plane: ColorPlane,

    /// Options for still images.
    pub image: LsbImageOptions,
}

impl CodecOptions {
    pub fn with_capacity_policy(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_marker_policy(mut self, marker: MarkerPolicy) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_video_plane(mut self, plane: ColorPlane) -> Self {
        self.video_plane = plane;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Fail with `CapacityExceeded`
    #[default]
    Reject,
    /// Hide as many bits as fit and drop the rest of the message
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerPolicy {
    /// Return whatever was collected, possibly garbage or empty
    #[default]
    Lenient,
    /// Fail with `MarkerNotFound`
    Strict,
}

/// Channel index into an RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPlane {
    Red,
    Green,
    #[default]
    Blue,
}

impl ColorPlane {
    pub fn channel(&self) -> usize {
        match self {
            ColorPlane::Red => 0,
            ColorPlane::Green => 1,
            ColorPlane::Blue => 2,
        }
    }
}

/// Options for LSB (Least Significant Bit) image encoding
#[derive(Debug, Clone)]
pub struct LsbImageOptions {
    /// Determines the step width when iterating over the color channels.
    /// For example `2` would move from (R)GB to RG(B).
    ///
    /// Note this number influences the capacity directly.
    pub color_channel_step_increment: usize,

    /// If true no alpha channel would be used for encoding,
    /// this reduces then the capacity by one bit per pixel
    pub skip_alpha_channel: bool,

    /// This limits all iterations to skip the last column and row, in fact it reduces width and height of the image by 1
    pub skip_last_row_and_column: bool,
}

impl Default for LsbImageOptions {
    fn default() -> Self {
        Self {
            color_channel_step_increment: 1,
            skip_alpha_channel: true,
            skip_last_row_and_column: true,
        }
    }
}
