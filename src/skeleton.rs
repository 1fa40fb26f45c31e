use crate::binary_image::{BinaryImage, DEFAULT_FOREGROUND};
use crate::error::{Result, ThinningError};
use crate::lookup_table::{neighbor_pattern, DeletionClass, Subpass};


/// Options for a single thinning run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThinningConfig {
    /// The intensity written for foreground pixels of the skeleton. Must not be zero.
    pub foreground: u8,

    /// Stop after this many outer iterations, leaving a partially thinned image.
    /// `None` runs until no more pixels can be removed.
    pub max_iterations: Option<usize>,
}

impl Default for ThinningConfig {
    fn default() -> Self {
        ThinningConfig { foreground: DEFAULT_FOREGROUND, max_iterations: None }
    }
}

impl ThinningConfig {
    /// Check that the options can produce a skeleton.
    /// Fails if the foreground value is zero, which would be indistinguishable from background.
    pub fn validate(&self) -> Result<()> {
        if self.foreground == 0 { Err(ThinningError::ZeroForeground) }
        else { Ok(()) }
    }
}

/// Counters collected while thinning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThinningStats {
    /// Outer iterations executed, including the final one that found nothing to remove.
    pub iterations: usize,

    /// Outer iterations that removed at least one pixel.
    pub deleting_iterations: usize,

    /// Total number of foreground pixels removed.
    pub deleted_pixels: usize,
}

/// The one-pixel-wide skeleton of a binary image.
/// Has the same dimensions as the image it was computed from.
#[derive(Clone, PartialEq, Debug)]
pub struct Skeleton {
    pub width: usize,
    pub height: usize,

    /// The value of foreground pixels. Never zero.
    foreground: u8,

    /// Row-major pixels, each either zero or `foreground`.
    pub pixels: Vec<u8>,

    pub stats: ThinningStats,
}

/// The padded 0/1 grid the thinning loop operates on.
/// Has a permanent one-pixel background border, so every
/// interior cell has all eight neighbors inside the grid.
struct WorkingGrid {
    /// Padded row length, `width + 2`.
    stride: usize,

    /// Padded row count, `height + 2`.
    rows: usize,

    cells: Vec<u8>,

    /// Receives the deletions of the running subpass while `cells` stays untouched.
    /// Equal to `cells` whenever no subpass is running.
    commit: Vec<u8>,
}


impl Skeleton {

    /// Thin the specified image until only a one-pixel-wide skeleton remains.
    pub fn compute(image: &impl BinaryImage) -> Self {
        // the default configuration is always valid
        Self::compute_unchecked(image, &ThinningConfig::default())
    }

    /// Thin the specified image with custom output value and iteration limit.
    pub fn compute_with_config(image: &impl BinaryImage, config: &ThinningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::compute_unchecked(image, config))
    }

    /// Expects `config` to be valid.
    fn compute_unchecked(image: &impl BinaryImage, config: &ThinningConfig) -> Self {
        let mut grid = WorkingGrid::from_image(image);
        let stats = grid.thin(config.max_iterations);

        let width = grid.stride - 2;
        let height = grid.rows - 2;
        let foreground = config.foreground;

        tracing::debug!(
            width, height,
            iterations = stats.iterations,
            deleted_pixels = stats.deleted_pixels,
            "thinned binary image"
        );

        Skeleton { width, height, foreground, pixels: grid.crop(foreground), stats }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[self.flatten_index(x, y)]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The value of foreground pixels.
    pub fn foreground(&self) -> u8 {
        self.foreground
    }

    pub fn stats(&self) -> ThinningStats {
        self.stats
    }

    /// Number of pixels that remain in the skeleton.
    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel != 0).count()
    }

    #[inline]
    pub fn flatten_index(&self, x: usize, y: usize) -> usize {
        self.width * y + x
    }

    /// Convert the skeleton to a piston image with the same pixel values.
    #[cfg(feature = "piston_image")]
    pub fn to_gray_u8_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Luma([ self.get(x as usize, y as usize) ])
        })
    }
}

impl BinaryImage for Skeleton {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == self.foreground
    }
}


impl WorkingGrid {
    fn from_image(image: &impl BinaryImage) -> Self {
        let width = image.width();
        let height = image.height();
        let stride = width + 2;
        let rows = height + 2;

        let mut cells = vec![0_u8; stride * rows];
        for y in 0..height {
            let row_start = (y + 1) * stride + 1;
            for x in 0..width {
                cells[row_start + x] = image.is_foreground(x, y) as u8;
            }
        }

        let commit = cells.clone();
        WorkingGrid { stride, rows, cells, commit }
    }

    /// Run outer iterations until one of them removes nothing,
    /// or until the iteration limit is reached.
    fn thin(&mut self, max_iterations: Option<usize>) -> ThinningStats {
        let mut stats = ThinningStats::default();

        while max_iterations.map_or(true, |max| stats.iterations < max) {
            stats.iterations += 1;

            let mut deleted = 0;
            for &subpass in Subpass::ALL.iter() {
                deleted += self.run_subpass(subpass);
            }

            tracing::trace!(iteration = stats.iterations, deleted, "outer thinning iteration");

            if deleted == 0 {
                break;
            }

            stats.deleting_iterations += 1;
            stats.deleted_pixels += deleted;
        }

        stats
    }

    /// Scan all interior cells against the unchanged `cells`,
    /// clear deletable ones in `commit`, then commit them at once.
    /// Returns the number of removed pixels.
    fn run_subpass(&mut self, subpass: Subpass) -> usize {
        let stride = self.stride;
        let cells = &self.cells;
        let commit = &mut self.commit;
        let mut deleted = 0;

        // one window of three rows per interior row, so each pixel reads
        // its neighbors from three-cell windows instead of indexing the grid
        for (y, rows) in cells.windows(3 * stride).step_by(stride).enumerate() {
            let (above, rest) = rows.split_at(stride);
            let (center, below) = rest.split_at(stride);
            let row_start = (y + 1) * stride;

            let neighborhoods = above.windows(3)
                .zip(center.windows(3))
                .zip(below.windows(3));

            for (x, ((above, center), below)) in neighborhoods.enumerate() {
                if let [_, 1, _] = center {
                    let class = DeletionClass::of(neighbor_pattern(above, center, below));

                    if subpass.deletes(class) {
                        commit[row_start + x + 1] = 0;
                        deleted += 1;
                    }
                }
            }
        }

        // without deletions, both buffers are still equal
        if deleted != 0 {
            self.cells.copy_from_slice(&self.commit);
        }

        deleted
    }

    /// Remove the border and scale 0/1 cells to 0/`foreground`.
    fn crop(&self, foreground: u8) -> Vec<u8> {
        let width = self.stride - 2;
        let height = self.rows - 2;
        let mut pixels = Vec::with_capacity(width * height);

        for row in self.cells.chunks_exact(self.stride).skip(1).take(height) {
            pixels.extend(row[1 ..= width].iter().map(|&cell| cell * foreground));
        }

        pixels
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary_image::BinaryByteImage;

    fn byte_image(width: usize, height: usize, shape: impl Fn(usize, usize) -> bool) -> Vec<u8> {
        let mut bytes = vec![0_u8; width * height];
        for y in 0..height {
            for x in 0..width {
                bytes[width * y + x] = if shape(x, y) { 255 } else { 0 };
            }
        }

        bytes
    }

    fn block(x0: usize, y0: usize, x1: usize, y1: usize) -> impl Fn(usize, usize) -> bool {
        move |x, y| x >= x0 && x <= x1 && y >= y0 && y <= y1
    }

    /// Deletes pixels as soon as they are visited, which is
    /// what the commit buffer of the working grid prevents.
    fn thin_in_place(width: usize, height: usize, bytes: &[u8]) -> Vec<u8> {
        let image = BinaryByteImage::from_slice(width, height, bytes).unwrap();
        let mut grid = WorkingGrid::from_image(&image);
        let stride = grid.stride;

        loop {
            let mut deleted = false;
            for &subpass in Subpass::ALL.iter() {
                for y in 1 .. grid.rows - 1 {
                    for x in 1 .. stride - 1 {
                        let index = y * stride + x;
                        let pattern = neighbor_pattern(
                            &grid.cells[index - stride - 1 ..= index - stride + 1],
                            &grid.cells[index - 1 ..= index + 1],
                            &grid.cells[index + stride - 1 ..= index + stride + 1],
                        );

                        if grid.cells[index] == 1 && subpass.deletes(DeletionClass::of(pattern)) {
                            grid.cells[index] = 0;
                            deleted = true;
                        }
                    }
                }
            }

            if !deleted { return grid.crop(255); }
        }
    }

    /// Classifies every interior cell by indexing the flat grid directly.
    fn subpass_by_index(cells: &[u8], stride: usize, rows: usize, subpass: Subpass) -> Vec<u8> {
        let mut result = cells.to_vec();

        for y in 1 .. rows - 1 {
            for x in 1 .. stride - 1 {
                let index = y * stride + x;
                let pattern = cells[index - stride - 1]
                    | cells[index - stride] << 1
                    | cells[index - stride + 1] << 2
                    | cells[index + 1] << 3
                    | cells[index + stride + 1] << 4
                    | cells[index + stride] << 5
                    | cells[index + stride - 1] << 6
                    | cells[index - 1] << 7;

                if cells[index] == 1 && subpass.deletes(DeletionClass::of(pattern)) {
                    result[index] = 0;
                }
            }
        }

        result
    }

    #[test]
    fn row_windows_visit_every_interior_cell() {
        let sizes = [(1, 1), (1, 6), (6, 1), (2, 2), (5, 3), (9, 7)];

        for &(width, height) in sizes.iter() {
            for &subpass in Subpass::ALL.iter() {
                let bytes = byte_image(width, height, |x, y| (x * 7 + y * 3) % 5 != 0);
                let image = BinaryByteImage::from_slice(width, height, &bytes).unwrap();
                let mut grid = WorkingGrid::from_image(&image);

                let expected = subpass_by_index(&grid.cells, grid.stride, grid.rows, subpass);
                let deleted = grid.run_subpass(subpass);

                assert_eq!(grid.cells, expected, "{}x{} {:?}", width, height, subpass);
                assert_eq!(grid.commit, grid.cells);

                let removed = bytes.iter().filter(|&&byte| byte == 255).count()
                    - grid.cells.iter().filter(|&&cell| cell == 1).count();
                assert_eq!(deleted, removed);
            }
        }
    }

    #[test]
    fn compute_uses_default_config() {
        let bytes = byte_image(12, 8, block(2, 1, 9, 6));
        let image = BinaryByteImage::from_slice(12, 8, &bytes).unwrap();

        let configured = Skeleton::compute_with_config(&image, &ThinningConfig::default()).unwrap();
        assert_eq!(Skeleton::compute(&image), configured);
        assert_eq!(configured.foreground(), 255);
    }

    #[test]
    fn skeleton_reads_its_own_foreground() {
        let bytes = byte_image(12, 8, block(2, 1, 9, 6));
        let image = BinaryByteImage::from_slice(12, 8, &bytes).unwrap();

        let config = ThinningConfig { foreground: 7, .. ThinningConfig::default() };
        let skeleton = Skeleton::compute_with_config(&image, &config).unwrap();
        assert_eq!(skeleton.foreground(), 7);

        let background = (0 .. skeleton.height)
            .flat_map(|y| (0 .. skeleton.width).map(move |x| (x, y)))
            .filter(|&(x, y)| skeleton.get(x, y) == 0);

        for (x, y) in background {
            assert!(!skeleton.is_foreground(x, y));
        }

        let rethinned = Skeleton::compute(&skeleton);
        assert_eq!(rethinned.stats.deleted_pixels, 0);
        assert_eq!(rethinned.foreground_count(), skeleton.foreground_count());
    }

    #[test]
    fn working_grid_has_background_border() {
        let bytes = vec![255_u8; 3 * 2];
        let image = BinaryByteImage::from_slice(3, 2, &bytes).unwrap();
        let grid = WorkingGrid::from_image(&image);

        assert_eq!((grid.stride, grid.rows), (5, 4));
        assert_eq!(grid.cells, vec![
            0, 0, 0, 0, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 0, 0, 0, 0,
        ]);
        assert_eq!(grid.commit, grid.cells);
        assert_eq!(grid.crop(255), bytes);
    }

    #[test]
    fn synchronous_update_differs_from_in_place_deletion() {
        let bytes = byte_image(5, 5, block(1, 1, 3, 3));

        let image = BinaryByteImage::from_slice(5, 5, &bytes).unwrap();
        let skeleton = Skeleton::compute(&image);

        assert_eq!(skeleton.pixels, byte_image(5, 5, |x, y| (x, y) == (2, 1) || (x, y) == (1, 2)));
        assert_ne!(skeleton.pixels, thin_in_place(5, 5, &bytes));
    }

    #[test]
    fn statistics_of_block() {
        let bytes = byte_image(5, 5, block(1, 1, 3, 3));
        let image = BinaryByteImage::from_slice(5, 5, &bytes).unwrap();

        let stats = Skeleton::compute(&image).stats();
        assert_eq!(stats, ThinningStats { iterations: 2, deleting_iterations: 1, deleted_pixels: 7 });
    }

    #[test]
    fn iteration_limit_stops_early() {
        let bytes = byte_image(12, 12, block(1, 1, 10, 10));
        let image = BinaryByteImage::from_slice(12, 12, &bytes).unwrap();

        let config = ThinningConfig { max_iterations: Some(1), .. ThinningConfig::default() };
        let partial = Skeleton::compute_with_config(&image, &config).unwrap();
        let complete = Skeleton::compute(&image);

        assert_eq!(partial.stats.iterations, 1);
        assert_eq!(partial.stats.deleting_iterations, 1);
        assert!(partial.foreground_count() > complete.foreground_count());
        assert!(partial.foreground_count() < 100);

        let resumed = Skeleton::compute(&partial);
        assert_eq!(resumed.pixels, complete.pixels);
    }

    #[test]
    fn zero_iteration_limit_copies_input() {
        let bytes = byte_image(6, 4, block(0, 0, 5, 3));
        let image = BinaryByteImage::from_slice(6, 4, &bytes).unwrap();

        let config = ThinningConfig { max_iterations: Some(0), .. ThinningConfig::default() };
        let skeleton = Skeleton::compute_with_config(&image, &config).unwrap();

        assert_eq!(skeleton.pixels, bytes);
        assert_eq!(skeleton.stats, ThinningStats::default());
    }

    #[test]
    fn custom_foreground_output() {
        let bytes = byte_image(9, 5, |x, y| y == 2 && x >= 1 && x <= 7);
        let image = BinaryByteImage::from_slice(9, 5, &bytes).unwrap();

        let config = ThinningConfig { foreground: 1, .. ThinningConfig::default() };
        let skeleton = Skeleton::compute_with_config(&image, &config).unwrap();

        assert!(skeleton.pixels().iter().all(|&pixel| pixel == 0 || pixel == 1));
        assert_eq!(skeleton.foreground_count(), 7);
        assert!(skeleton.is_foreground(4, 2));
    }

    #[test]
    fn rejects_zero_foreground_config() {
        let image = BinaryByteImage::from_slice(1, 1, &[255]).unwrap();
        let config = ThinningConfig { foreground: 0, .. ThinningConfig::default() };

        assert_eq!(Skeleton::compute_with_config(&image, &config), Err(ThinningError::ZeroForeground));
    }

    #[test]
    fn zero_sized_images() {
        for &(width, height) in [(0, 0), (0, 4), (7, 0)].iter() {
            let image = BinaryByteImage::from_slice(width, height, &[]).unwrap();
            let skeleton = Skeleton::compute(&image);

            assert_eq!((skeleton.width, skeleton.height), (width, height));
            assert!(skeleton.pixels.is_empty());
            assert_eq!(skeleton.stats.iterations, 1);
        }
    }
}
