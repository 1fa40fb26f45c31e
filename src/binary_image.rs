use crate::error::{Result, ThinningError};

/// The intensity of foreground pixels in byte images, unless specified otherwise.
pub const DEFAULT_FOREGROUND: u8 = 255;

/// Represents an image with each pixel being either foreground or background.
/// The thinning algorithm reads every pixel exactly once through this trait.
/// BinaryImages can be created from byte slices
/// or piston images if the feature `piston_image` is activated.
pub trait BinaryImage {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn is_foreground(&self, x: usize, y: usize) -> bool;
}

/// An image which is described by a slice of bytes with one byte per pixel.
/// A byte is foreground if it equals the foreground value, which is 255 by default.
/// Any other value is treated as background.
#[derive(Clone, Copy, Debug)]
pub struct BinaryByteImage<'b> {
    width: usize,
    height: usize,

    /// A row-major image vector with one byte per pixel.
    buffer: &'b [u8],

    foreground: u8,
}


impl<'b> BinaryByteImage<'b> {
    /// Create a binary byte image with 255 as the foreground value.
    pub fn from_slice(width: usize, height: usize, buffer: &'b [u8]) -> Result<Self> {
        Self::from_slice_with_foreground(width, height, buffer, DEFAULT_FOREGROUND)
    }

    /// Create a binary byte image from the buffer
    /// with all pixels equal to `foreground` being foreground.
    pub fn from_slice_with_foreground(
        width: usize, height: usize, buffer: &'b [u8], foreground: u8
    ) -> Result<Self> {
        if foreground == 0 {
            return Err(ThinningError::ZeroForeground);
        }

        let expected = width * height;
        if buffer.len() != expected {
            return Err(ThinningError::BufferSizeMismatch { expected, actual: buffer.len() });
        }

        Ok(BinaryByteImage { width, height, buffer, foreground })
    }

    pub fn foreground(&self) -> u8 {
        self.foreground
    }
}

impl BinaryImage for BinaryByteImage<'_> {
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
        self.buffer[self.width * y + x] == self.foreground
    }
}

/// Create binary images from piston images.
#[cfg(feature = "piston_image")]
pub mod piston_image {
    use image::{ImageBuffer, Luma, Primitive, GrayImage};
    use super::{BinaryImage, DEFAULT_FOREGROUND};
    use crate::error::{Result, ThinningError};

    /// Create a binary image from a grey-scale piston image
    /// with all pixels equal to 255 being foreground.
    pub fn of_gray_u8_image(image: &GrayImage) -> Result<WithForeground<'_, u8, Vec<u8>>> {
        of_gray_u8_image_with_foreground(image, DEFAULT_FOREGROUND)
    }

    /// Create a binary image from a grey-scale piston image
    /// with all pixels equal to `foreground` being foreground.
    /// Fails if `foreground` is zero.
    pub fn of_gray_u8_image_with_foreground(image: &GrayImage, foreground: u8)
        -> Result<WithForeground<'_, u8, Vec<u8>>>
    {
        WithForeground::of(image, foreground)
    }


    /// A binary image constructed from a grey-scale piston image
    pub struct WithForeground<'i, P: 'static + Primitive, Container> {
        image: &'i ImageBuffer<Luma<P>, Container>,
        foreground: P,
    }

    impl<'i, P, C> WithForeground<'i, P, C> where P: 'static + Primitive {
        /// Fails if `foreground` is zero, which is the background value.
        pub fn of(image: &'i ImageBuffer<Luma<P>, C>, foreground: P) -> Result<Self> {
            if foreground == P::zero() {
                return Err(ThinningError::ZeroForeground);
            }

            Ok(WithForeground { image, foreground })
        }
    }

    impl<'i, P, C> BinaryImage for WithForeground<'i, P, C>
        where P: 'static + Primitive, C: std::ops::Deref<Target = [P]>
    {
        fn width(&self) -> usize {
            self.image.width() as usize
        }

        fn height(&self) -> usize {
            self.image.height() as usize
        }

        fn is_foreground(&self, x: usize, y: usize) -> bool {
            self.image.get_pixel(x as u32, y as u32).0[0] == self.foreground
        }
    }

}
