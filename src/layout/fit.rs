/// Width and height of a placed box, in page units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSize {
    pub width: f64,
    pub height: f64,
}

/// Largest size inside `box_w` x `box_h` that keeps the aspect ratio of a
/// `width` x `height` image. One axis always equals the box.
pub fn fit_into_box(width: u32, height: u32, box_w: f64, box_h: f64) -> FitSize {
    if width == 0 || height == 0 {
        return FitSize {
            width: 0.0,
            height: 0.0,
        };
    }
    let aspect = f64::from(width) / f64::from(height);
    if box_w / aspect > box_h {
        FitSize {
            width: box_h * aspect,
            height: box_h,
        }
    } else {
        FitSize {
            width: box_w,
            height: box_w / aspect,
        }
    }
}
