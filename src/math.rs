//! Plane geometry used by layout and bond geometry.
//!
//! All coordinates are `f64`. The y axis points down, as on a canvas, so a
//! positive rotation turns clockwise on screen.

use std::f64::consts::PI;

pub use glam::DVec2;

/// Tolerance for "close enough to collinear or identical" tests, in radians
/// for angles and in drawing units for distances.
pub const EPSILON: f64 = 0.1;

/// Plane operations on [`DVec2`] that glam leaves to the caller.
pub trait PlaneExt {
    /// Rotate around the origin by `angle` radians.
    fn rotated(self, angle: f64) -> DVec2;

    fn rotated_about(self, angle: f64, center: DVec2) -> DVec2;

    /// Rotate about `center` by `angle` in whichever direction ends up
    /// farther from `other`.
    fn rotated_away_from(self, other: DVec2, center: DVec2, angle: f64) -> DVec2;

    /// Whether `self` lies on the same side of the line through `a` and `b`
    /// as `reference`. Points on the line only match other points on the line.
    fn same_side_as(self, a: DVec2, b: DVec2, reference: DVec2) -> bool;

    /// Orientation of `other` relative to `self` around the origin:
    /// `-1` clockwise, `0` collinear, `1` counterclockwise.
    fn clockwise(self, other: DVec2) -> i8;

    /// Like [`PlaneExt::clockwise`], with both vectors taken relative to `center`.
    fn relative_clockwise(self, center: DVec2, other: DVec2) -> i8;
}

impl PlaneExt for DVec2 {
    fn rotated(self, angle: f64) -> DVec2 {
        DVec2::from_angle(angle).rotate(self)
    }

    fn rotated_about(self, angle: f64, center: DVec2) -> DVec2 {
        (self - center).rotated(angle) + center
    }

    fn rotated_away_from(self, other: DVec2, center: DVec2, angle: f64) -> DVec2 {
        let forward = self.rotated_about(angle, center);
        let backward = self.rotated_about(-angle, center);
        if forward.distance_squared(other) > backward.distance_squared(other) {
            forward
        } else {
            backward
        }
    }

    fn same_side_as(self, a: DVec2, b: DVec2, reference: DVec2) -> bool {
        let d = b - a;
        sign((self - a).perp_dot(d)) == sign((reference - a).perp_dot(d))
    }

    fn clockwise(self, other: DVec2) -> i8 {
        let a = self.y * other.x;
        let b = self.x * other.y;
        if a > b {
            -1
        } else if a == b {
            0
        } else {
            1
        }
    }

    fn relative_clockwise(self, center: DVec2, other: DVec2) -> i8 {
        (self - center).clockwise(other - center)
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// The two normals of the segment `a -> b`, not normalized.
pub fn normals(a: DVec2, b: DVec2) -> [DVec2; 2] {
    let n = (b - a).perp();
    [n, -n]
}

/// The two unit normals of the segment `a -> b`.
pub fn units(a: DVec2, b: DVec2) -> [DVec2; 2] {
    normals(a, b).map(DVec2::normalize_or_zero)
}

/// A bond line between two atom positions, carrying the element symbols and
/// stereocenter flags of both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: DVec2,
    pub to: DVec2,
    pub from_element: String,
    pub to_element: String,
    pub from_chiral: bool,
    pub to_chiral: bool,
}

impl Line {
    pub fn new(from: DVec2, to: DVec2, from_element: &str, to_element: &str) -> Self {
        Self {
            from,
            to,
            from_element: from_element.to_string(),
            to_element: to_element.to_string(),
            from_chiral: false,
            to_chiral: false,
        }
    }

    pub fn with_chirality(mut self, from_chiral: bool, to_chiral: bool) -> Self {
        self.from_chiral = from_chiral;
        self.to_chiral = to_chiral;
        self
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }

    /// Move both ends towards each other by `by / 2`.
    pub fn shorten(&mut self, by: f64) -> &mut Self {
        let f = (self.from - self.to).normalize_or_zero() * (by / 2.0);
        self.to += f;
        self.from -= f;
        self
    }

    /// The end with the smaller x coordinate.
    pub fn left(&self) -> DVec2 {
        if self.from.x < self.to.x {
            self.from
        } else {
            self.to
        }
    }

    /// The end with the larger x coordinate.
    pub fn right(&self) -> DVec2 {
        if self.from.x < self.to.x {
            self.to
        } else {
            self.from
        }
    }

    pub fn left_element(&self) -> &str {
        if self.from.x < self.to.x {
            &self.from_element
        } else {
            &self.to_element
        }
    }

    pub fn right_element(&self) -> &str {
        if self.from.x < self.to.x {
            &self.to_element
        } else {
            &self.from_element
        }
    }

    /// Whether the right end is a stereocenter.
    pub fn right_chiral(&self) -> bool {
        if self.from.x < self.to.x {
            self.to_chiral
        } else {
            self.from_chiral
        }
    }
}

pub fn to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Circumradius of a regular polygon with `n` sides of length `side`.
pub fn poly_circumradius(side: f64, n: usize) -> f64 {
    side / (2.0 * (PI / n as f64).sin())
}

/// Apothem of a regular polygon with circumradius `r` and `n` sides.
pub fn apothem(r: f64, n: usize) -> f64 {
    r * (PI / n as f64).cos()
}

pub fn apothem_from_side_length(side: f64, n: usize) -> f64 {
    apothem(poly_circumradius(side, n), n)
}

/// Angle subtended at the centre by one side of a regular `n`-gon.
pub fn central_angle(n: usize) -> f64 {
    to_rad(360.0 / n as f64)
}

/// Interior angle of a regular `n`-gon.
pub fn inner_angle(n: usize) -> f64 {
    to_rad((n as f64 - 2.0) * 180.0 / n as f64)
}

/// Parity of a permutation given as an index array: `1` even, `-1` odd.
pub fn permutation_parity(perm: &[usize]) -> i8 {
    let n = perm.len();
    let mut visited = vec![false; n];
    let mut even_cycles = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        if cycle_len % 2 == 0 {
            even_cycles += 1;
        }
    }
    if even_cycles % 2 == 1 {
        -1
    } else {
        1
    }
}
