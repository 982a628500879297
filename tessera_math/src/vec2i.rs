use std::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use glam::Vec2;

pub const fn v2i(x: i32, y: i32) -> Vec2i {
    Vec2i::new(x, y)
}

/// Integer screen-space position or offset. `y` grows downwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Self = Self::splat(0);
    pub const ONE: Self = Self::splat(1);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn splat(x: i32) -> Self {
        v2i(x, x)
    }

    pub fn min(self, v: Vec2i) -> Self {
        v2i(self.x.min(v.x), self.y.min(v.y))
    }

    pub fn max(self, v: Vec2i) -> Self {
        v2i(self.x.max(v.x), self.y.max(v.y))
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl Display for Vec2i {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl From<Vec2i> for (i32, i32) {
    fn from(v: Vec2i) -> Self {
        (v.x, v.y)
    }
}

impl From<(i32, i32)> for Vec2i {
    fn from((x, y): (i32, i32)) -> Self {
        v2i(x, y)
    }
}

impl From<[i32; 2]> for Vec2i {
    fn from(value: [i32; 2]) -> Self {
        v2i(value[0], value[1])
    }
}

impl Neg for Vec2i {
    type Output = Vec2i;

    fn neg(self) -> Self::Output {
        v2i(-self.x, -self.y)
    }
}

impl Mul<i32> for Vec2i {
    type Output = Vec2i;

    fn mul(self, s: i32) -> Self::Output {
        v2i(self.x * s, self.y * s)
    }
}

impl Add for Vec2i {
    type Output = Vec2i;

    fn add(self, v: Self) -> Self::Output {
        v2i(self.x + v.x, self.y + v.y)
    }
}

impl AddAssign for Vec2i {
    fn add_assign(&mut self, v: Self) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Sub for Vec2i {
    type Output = Vec2i;

    fn sub(self, v: Self) -> Self::Output {
        v2i(self.x - v.x, self.y - v.y)
    }
}

impl SubAssign for Vec2i {
    fn sub_assign(&mut self, v: Self) {
        self.x -= v.x;
        self.y -= v.y;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vec_defaults_to_zero() {
        assert_eq!(Vec2i::default(), Vec2i::ZERO);
    }

    #[test]
    fn vec_can_be_destructured() {
        assert_eq!((2, 3), v2i(2, 3).into());
    }

    #[test]
    fn vec_offsets_accumulate() {
        let mut position = v2i(128, 128);
        position += v2i(-8, 16);
        assert_eq!(v2i(120, 144), position);
        assert_eq!(v2i(0, 0), position - v2i(120, 144));
    }

    #[test]
    fn vec_componentwise_min_max() {
        let a = v2i(1, 9);
        let b = v2i(5, 2);
        assert_eq!(v2i(1, 2), a.min(b));
        assert_eq!(v2i(5, 9), a.max(b));
    }

    #[test]
    fn vec_negates_and_scales() {
        assert_eq!(v2i(-2, -6), -v2i(1, 3) * 2);
    }
}
