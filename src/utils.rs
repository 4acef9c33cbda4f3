use glam::Vec3;

/// coordinates of a block in world space
#[derive(Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct WorldCoord(pub i32, pub i32, pub i32);

impl WorldCoord {
    pub fn squared_distance(&self, other: &WorldCoord) -> i64 {
        (self.0 as i64 - other.0 as i64).pow(2) +
        (self.1 as i64 - other.1 as i64).pow(2) +
        (self.2 as i64 - other.2 as i64).pow(2)
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> WorldCoord {
        WorldCoord(self.0 + dx, self.1 + dy, self.2 + dz)
    }

    /// Block directly below this one
    pub fn below(&self) -> WorldCoord {
        self.offset(0, -1, 0)
    }

    /// Block directly above this one
    pub fn above(&self) -> WorldCoord {
        self.offset(0, 1, 0)
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.0 as f32, self.1 as f32, self.2 as f32)
    }

    /// Position of `self` relative to `origin`, in block units
    pub fn relative_to(&self, origin: &WorldCoord) -> Vec3 {
        self.as_vec3() - origin.as_vec3()
    }
}

impl From<(i32, i32, i32)> for WorldCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        WorldCoord(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_distance() {
        let a = WorldCoord(0, 1, 0);
        let b = WorldCoord(3, 1, -4);
        assert_eq!(a.squared_distance(&b), 25);
        assert_eq!(b.squared_distance(&a), 25);
        assert_eq!(a.squared_distance(&a), 0);
    }

    #[test]
    fn test_relative_position() {
        let player = WorldCoord(0, 1, 0);
        let block = WorldCoord(0, 0, 1);
        assert_eq!(block.relative_to(&player), Vec3::new(0.0, -1.0, 1.0));
    }
}
