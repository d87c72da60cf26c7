use image::{GrayImage, Rgb, RgbImage};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{InpaintEngine, InpaintMode};
use crate::error::InpaintError;

/// Arrival time assigned to pixels the front has not reached yet.
const MAX_DIST: f32 = 1.0e6;
const EPSILON: f32 = 1.0e-6;

const NEIGHBORS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flag {
    Known,
    Band,
    Inside,
}

/// Heap entry; ordered so that `BinaryHeap` pops the smallest arrival time.
#[derive(Clone, Copy, Debug)]
struct BandPixel {
    dist: f32,
    x: i64,
    y: i64,
}

impl PartialEq for BandPixel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandPixel {}

impl PartialOrd for BandPixel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BandPixel {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| (other.y, other.x).cmp(&(self.y, self.x)))
    }
}

struct Field {
    width: i64,
    height: i64,
    dists: Vec<f32>,
    flags: Vec<Flag>,
}

impl Field {
    fn new(mask: &GrayImage) -> Self {
        let flags: Vec<Flag> = mask
            .pixels()
            .map(|p| if p[0] > 0 { Flag::Inside } else { Flag::Known })
            .collect();
        let dists = flags
            .iter()
            .map(|flag| if *flag == Flag::Inside { MAX_DIST } else { 0.0 })
            .collect();

        Self {
            width: mask.width() as i64,
            height: mask.height() as i64,
            dists,
            flags,
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Known pixels touching the masked region form the initial front.
    fn initial_band(&mut self) -> BinaryHeap<BandPixel> {
        let mut band = BinaryHeap::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(idx) = self.index(x, y) else { continue };
                if self.flags[idx] != Flag::Inside {
                    continue;
                }
                for (dx, dy) in NEIGHBORS {
                    let (nx, ny) = (x + dx, y + dy);
                    let Some(nidx) = self.index(nx, ny) else { continue };
                    if self.flags[nidx] != Flag::Known {
                        continue;
                    }
                    self.flags[nidx] = Flag::Band;
                    self.dists[nidx] = 0.0;
                    band.push(BandPixel { dist: 0.0, x: nx, y: ny });
                }
            }
        }
        band
    }

    /// Marches outward from the band for `2 * radius` and stores negated
    /// distances on the known side, giving a signed distance field around
    /// the boundary.
    fn compute_outside_dists(&mut self, mut band: BinaryHeap<BandPixel>, radius: u32) {
        let mut flags: Vec<Flag> = self
            .flags
            .iter()
            .map(|flag| match flag {
                Flag::Known => Flag::Inside,
                Flag::Inside => Flag::Known,
                Flag::Band => Flag::Band,
            })
            .collect();
        let limit = 2.0 * radius as f32;
        let mut last_dist = 0.0;

        while let Some(pixel) = band.pop() {
            if last_dist >= limit {
                break;
            }
            if let Some(idx) = self.index(pixel.x, pixel.y) {
                flags[idx] = Flag::Known;
            }
            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (pixel.x + dx, pixel.y + dy);
                let Some(nidx) = self.index(nx, ny) else { continue };
                if flags[nidx] != Flag::Inside {
                    continue;
                }
                last_dist = self.arrival_time(&flags, nx, ny);
                self.dists[nidx] = last_dist;
                flags[nidx] = Flag::Band;
                band.push(BandPixel { dist: last_dist, x: nx, y: ny });
            }
        }

        for (dist, flag) in self.dists.iter_mut().zip(&self.flags) {
            if *flag == Flag::Known {
                *dist = -*dist;
            }
        }
    }

    fn arrival_time(&self, flags: &[Flag], x: i64, y: i64) -> f32 {
        [
            self.solve_eikonal(flags, (x, y - 1), (x - 1, y)),
            self.solve_eikonal(flags, (x, y + 1), (x + 1, y)),
            self.solve_eikonal(flags, (x, y - 1), (x + 1, y)),
            self.solve_eikonal(flags, (x, y + 1), (x - 1, y)),
        ]
        .into_iter()
        .fold(MAX_DIST, f32::min)
    }

    /// Band pixels already carry a final arrival time, so they count as
    /// solved alongside known ones.
    fn solve_eikonal(&self, flags: &[Flag], a: (i64, i64), b: (i64, i64)) -> f32 {
        let known = |p: (i64, i64)| {
            self.index(p.0, p.1)
                .filter(|&idx| flags[idx] != Flag::Inside)
                .map(|idx| self.dists[idx])
        };

        match (known(a), known(b)) {
            (Some(d1), Some(d2)) => {
                let d = 2.0 - (d1 - d2) * (d1 - d2);
                if d > 0.0 {
                    let r = d.sqrt();
                    let s = (d1 + d2 - r) / 2.0;
                    if s >= d1 && s >= d2 {
                        return s;
                    }
                    let s = s + r;
                    if s >= d1 && s >= d2 {
                        return s;
                    }
                }
                1.0 + d1.min(d2)
            }
            (Some(d1), None) => 1.0 + d1,
            (None, Some(d2)) => 1.0 + d2,
            (None, None) => MAX_DIST,
        }
    }

    fn gradient(&self, x: i64, y: i64, idx: usize) -> (f32, f32) {
        let value = self.dists[idx];
        let grad_x = self.axis_gradient(value, self.index(x - 1, y), self.index(x + 1, y));
        let grad_y = self.axis_gradient(value, self.index(x, y - 1), self.index(x, y + 1));
        (grad_x, grad_y)
    }

    fn axis_gradient(&self, value: f32, prev: Option<usize>, next: Option<usize>) -> f32 {
        let usable = |idx: Option<usize>| idx.filter(|&i| self.flags[i] != Flag::Inside);
        match (usable(prev), usable(next)) {
            (Some(p), Some(n)) => (self.dists[n] - self.dists[p]) / 2.0,
            (Some(p), None) => value - self.dists[p],
            (None, Some(n)) => self.dists[n] - value,
            (None, None) => 0.0,
        }
    }

    /// Weighted average of the already known pixels within `radius`, using
    /// Telea's direction, level-set and distance weights. The first-order
    /// image-gradient correction is not applied.
    fn fill_value(&self, pixels: &[[f32; 3]], x: i64, y: i64, idx: usize, radius: i64) -> [f32; 3] {
        let dist = self.dists[idx];
        let (grad_x, grad_y) = self.gradient(x, y, idx);
        let mut sum = [0.0f32; 3];
        let mut weight_sum = 0.0f32;

        for ny in (y - radius)..=(y + radius) {
            for nx in (x - radius)..=(x + radius) {
                let Some(nidx) = self.index(nx, ny) else { continue };
                if self.flags[nidx] == Flag::Inside {
                    continue;
                }
                let dx = (x - nx) as f32;
                let dy = (y - ny) as f32;
                let length_sq = dx * dx + dy * dy;
                let length = length_sq.sqrt();
                if length_sq == 0.0 || length > radius as f32 {
                    continue;
                }

                let mut direction = (dx * grad_x + dy * grad_y).abs();
                if direction == 0.0 {
                    direction = EPSILON;
                }
                let level = 1.0 / (1.0 + (self.dists[nidx] - dist).abs());
                let geometric = 1.0 / (length * length_sq);
                let weight = (direction * level * geometric).abs();

                for (acc, channel) in sum.iter_mut().zip(pixels[nidx]) {
                    *acc += weight * channel;
                }
                weight_sum += weight;
            }
        }

        if weight_sum <= 0.0 {
            return pixels[idx];
        }
        sum.map(|s| s / weight_sum)
    }
}

fn inpaint_telea(image: &RgbImage, mask: &GrayImage, radius: u32) -> RgbImage {
    let mut field = Field::new(mask);
    let mut band = field.initial_band();
    if band.is_empty() {
        return image.clone();
    }
    field.compute_outside_dists(band.clone(), radius);

    let mut pixels: Vec<[f32; 3]> = image
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();
    let radius = radius as i64;

    while let Some(pixel) = band.pop() {
        let Some(idx) = field.index(pixel.x, pixel.y) else { continue };
        field.flags[idx] = Flag::Known;

        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (pixel.x + dx, pixel.y + dy);
            let Some(nidx) = field.index(nx, ny) else { continue };
            if field.flags[nidx] != Flag::Inside {
                continue;
            }
            let dist = field.arrival_time(&field.flags, nx, ny);
            field.dists[nidx] = dist;
            let value = field.fill_value(&pixels, nx, ny, nidx, radius);
            pixels[nidx] = value;
            field.flags[nidx] = Flag::Band;
            band.push(BandPixel { dist, x: nx, y: ny });
        }
    }

    let mut output = image.clone();
    for (out, value) in output.pixels_mut().zip(pixels) {
        *out = Rgb(value.map(|c| c.round().clamp(0.0, 255.0) as u8));
    }
    output
}

/// Built-in engine: Telea-style fast marching with a weighted-average fill.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeleaEngine;

impl TeleaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl InpaintEngine for TeleaEngine {
    fn name(&self) -> &str {
        "telea"
    }

    fn inpaint(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        radius: u32,
        mode: InpaintMode,
    ) -> Result<RgbImage, InpaintError> {
        if image.dimensions() != mask.dimensions() {
            return Err(InpaintError::DimensionMismatch {
                image_width: image.width(),
                image_height: image.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
        if radius == 0 {
            return Err(InpaintError::InvalidRadius);
        }

        match mode {
            InpaintMode::FastMarching => Ok(inpaint_telea(image, mask, radius)),
        }
    }
}
