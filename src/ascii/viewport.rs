//! Viewport fitting: map a source frame onto the terminal cell grid.

/// Horizontal stride divisor compensating for terminal cells being roughly
/// twice as tall as they are wide.
pub const CELL_ASPECT_DIVISOR: u32 = 2;

/// Sampling geometry for one frame.
///
/// `columns`/`rows` are the terminal grid being painted. `output_columns` and
/// `output_rows` are the aspect-fit image size. Strides are the number of
/// source pixels one cell covers on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportGeometry {
    pub columns: u16,
    pub rows: u16,
    pub output_columns: u32,
    pub output_rows: u32,
    pub x_stride: u32,
    pub y_stride: u32,
}

/// Fit a `source_width` x `source_height` frame into a terminal grid.
///
/// The image fills the terminal's width when it is relatively wider than the
/// grid, otherwise its height. The horizontal stride is halved so the image
/// keeps its proportions in tall terminal cells.
///
/// Returns `None` when any dimension is zero; the caller should skip the frame.
///
/// # Example
/// ```
/// use vidscii::ascii::fit;
///
/// let geometry = fit(1920, 1080, 80, 24).unwrap();
/// assert_eq!(geometry.output_rows, 24);
/// assert_eq!(geometry.output_columns, 42);
/// ```
pub fn fit(
    source_width: u32,
    source_height: u32,
    columns: u16,
    rows: u16,
) -> Option<ViewportGeometry> {
    if source_width == 0 || source_height == 0 || columns == 0 || rows == 0 {
        return None;
    }

    let terminal_aspect = columns as f64 / rows as f64;
    let image_aspect = source_width as f64 / source_height as f64;

    let (output_columns, output_rows) = if image_aspect > terminal_aspect {
        let height = (columns as f64 / image_aspect) as u32;
        (columns as u32, height)
    } else {
        let width = (rows as f64 * image_aspect) as u32;
        (width, rows as u32)
    };

    // Extreme aspect ratios can truncate an axis to zero.
    let output_columns = output_columns.clamp(1, columns as u32);
    let output_rows = output_rows.clamp(1, rows as u32);

    let x_stride = (source_width / output_columns / CELL_ASPECT_DIVISOR).max(1);
    let y_stride = (source_height / output_rows).max(1);

    Some(ViewportGeometry {
        columns,
        rows,
        output_columns,
        output_rows,
        x_stride,
        y_stride,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_zero_terminal_skips() {
        assert!(fit(640, 480, 0, 0).is_none());
        assert!(fit(640, 480, 80, 0).is_none());
        assert!(fit(640, 480, 0, 24).is_none());
    }

    #[test]
    fn test_fit_zero_source_skips() {
        assert!(fit(0, 480, 80, 24).is_none());
        assert!(fit(640, 0, 80, 24).is_none());
    }

    #[test]
    fn test_fit_full_hd_in_classic_terminal() {
        let g = fit(1920, 1080, 80, 24).unwrap();
        assert_eq!(g.output_rows, 24);
        assert_eq!(g.output_columns, 42);
        assert_eq!(g.x_stride, 22);
        assert_eq!(g.y_stride, 45);
        assert_eq!((g.columns, g.rows), (80, 24));
    }

    #[test]
    fn test_fit_wide_image_fits_width() {
        // 10:1 panorama is wider than an 80x24 grid (3.33:1).
        let g = fit(1000, 100, 80, 24).unwrap();
        assert_eq!(g.output_columns, 80);
        assert_eq!(g.output_rows, 8);
        assert_eq!(g.x_stride, 6);
        assert_eq!(g.y_stride, 12);
    }

    #[test]
    fn test_fit_tiny_source_keeps_strides_positive() {
        let g = fit(10, 10, 200, 60).unwrap();
        assert!(g.x_stride >= 1);
        assert!(g.y_stride >= 1);
    }

    #[test]
    fn test_fit_extremely_tall_source() {
        let g = fit(1, 10_000, 80, 24).unwrap();
        assert_eq!(g.output_columns, 1);
        assert_eq!(g.output_rows, 24);
    }
}
