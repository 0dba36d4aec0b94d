use serde::{Deserialize, Serialize};

/// A 2D vector used for position, velocity, acceleration and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +x).
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. The zero vector normalizes to zero.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Same direction with magnitude capped at `max`.
    ///
    /// Vectors already within the cap are returned unchanged, as is the zero
    /// vector. A non-positive cap yields zero.
    pub fn clamped_length(&self, max: f32) -> Self {
        if max <= 0.0 {
            return Self::ZERO;
        }
        let len = self.length();
        if len > max {
            *self * (max / len)
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2) -> f32 {
        (*self - *other).length()
    }

    pub fn distance_squared(&self, other: &Vector2) -> f32 {
        (*self - *other).length_squared()
    }

    pub fn dot(&self, other: &Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product; positive when `other` lies
    /// counter-clockwise of `self`.
    pub fn cross(&self, other: &Vector2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Rotated a quarter turn counter-clockwise.
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Heading angle in radians; zero for the zero vector.
    pub fn angle(&self) -> f32 {
        if self.is_zero() {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::ops::Div<f32> for Vector2 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl std::ops::Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::ops::AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vector2_length() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.length_squared(), 25.0);
    }

    #[test]
    fn test_vector2_normalized() {
        let v = Vector2::new(3.0, 4.0);
        assert!((v.normalized().length() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_zero_normalizes_to_zero() {
        let n = Vector2::ZERO.normalized();
        assert_eq!(n, Vector2::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_vector2_operations() {
        let v1 = Vector2::new(1.0, 2.0);
        let v2 = Vector2::new(3.0, 4.0);

        assert_eq!(v1 + v2, Vector2::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vector2::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(v2 / 2.0, Vector2::new(1.5, 2.0));
        assert_eq!(-v1, Vector2::new(-1.0, -2.0));

        let mut acc = v1;
        acc += v2;
        acc -= v1;
        assert_eq!(acc, v2);
    }

    #[test]
    fn test_clamped_length_caps_magnitude() {
        let v = Vector2::new(30.0, 40.0).clamped_length(5.0);
        assert!((v.length() - 5.0).abs() < 0.0001);
        assert!((v.x - 3.0).abs() < 0.0001);
        assert!((v.y - 4.0).abs() < 0.0001);
    }

    #[test]
    fn test_clamped_length_zero_stays_zero() {
        assert_eq!(Vector2::ZERO.clamped_length(3.0), Vector2::ZERO);
        assert_eq!(Vector2::new(1.0, 1.0).clamped_length(0.0), Vector2::ZERO);
    }

    #[test]
    fn test_perpendicular_and_cross() {
        let v = Vector2::new(1.0, 0.0);
        assert_eq!(v.perpendicular(), Vector2::new(0.0, 1.0));
        assert!(v.cross(&Vector2::new(0.0, 1.0)) > 0.0);
        assert!(v.cross(&Vector2::new(0.0, -1.0)) < 0.0);
        assert_eq!(v.dot(&v.perpendicular()), 0.0);
    }

    #[test]
    fn test_from_angle() {
        let v = Vector2::from_angle(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 0.0001);
        assert!((v.y - 1.0).abs() < 0.0001);
        assert!((v.angle() - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
    }

    proptest! {
        #[test]
        fn clamped_length_is_identity_below_cap(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            slack in 0.0f32..50.0,
        ) {
            let v = Vector2::new(x, y);
            let max = v.length() + slack;
            prop_assume!(max > 0.0);
            prop_assert_eq!(v.clamped_length(max), v);
        }

        #[test]
        fn clamped_length_never_exceeds_cap(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            max in 0.01f32..100.0,
        ) {
            let clamped = Vector2::new(x, y).clamped_length(max);
            prop_assert!(clamped.length() <= max * (1.0 + 1e-5));
        }
    }
}
