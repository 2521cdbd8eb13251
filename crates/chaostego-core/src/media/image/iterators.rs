use crate::media::LsbImageOptions;

const RGBA_CHANNELS: usize = 4;

/// Indices into a raw RGBA buffer of all the color channels that carry data.
///
/// The image is walked column by column, top to bottom, like
/// `(0,0) (0,1) .. (0,h) (1,0) ..` and within a pixel R, G, B (and A).
pub(crate) fn color_channel_indices(
    width: u32,
    height: u32,
    options: &LsbImageOptions,
) -> impl Iterator<Item = usize> {
    let stride = width as usize;
    let (columns, rows) = if options.skip_last_row_and_column {
        (
            width.saturating_sub(1) as usize,
            height.saturating_sub(1) as usize,
        )
    } else {
        (width as usize, height as usize)
    };
    let channels = if options.skip_alpha_channel { 3 } else { 4 };

    (0..columns)
        .flat_map(move |x| {
            (0..rows).flat_map(move |y| {
                (0..channels).map(move |c| (y * stride + x) * RGBA_CHANNELS + c)
            })
        })
        .step_by(options.color_channel_step_increment.max(1))
}
