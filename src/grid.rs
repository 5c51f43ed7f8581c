use rand::Rng;

/// Step length of the fixed-step march used by `ray_march`
pub const RAY_MARCH_STEP: f32 = 0.1;

/// Samples per world unit for line-of-sight marches
pub const SIGHT_STEPS_PER_UNIT: f32 = 10.0;

/// Variant reported for cells outside the map
pub const DEFAULT_WALL_VARIANT: i32 = 1;

/// Spawn point used when random spawn search runs out of attempts
pub const FALLBACK_SPAWN: (f32, f32) = (1.5, 1.5);

/// Grid map storing wall geometry
/// Cell values: 0=empty, >=1 wall variant
///
/// Grid coordinates are 1-indexed: grid cell (1, 1) spans world [0,1) x [0,1).
/// Every cell is exactly one world unit wide.
#[derive(Clone, Debug)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<i32>,
}

/// Result of a fixed-step march
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchHit {
    pub distance: f32,
    pub hit_x: f32,
    pub hit_y: f32,
    /// False when the march reached `max_distance` without touching a wall
    pub hit: bool,
}

impl GridMap {
    /// Create an empty map (no walls at all, only the implicit solid outside)
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        GridMap {
            width,
            height,
            cells: vec![0; (width * height) as usize],
        }
    }

    /// Create a map from row-major cell codes, first row is gy = 1
    pub fn from_rows(rows: &[Vec<i32>]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let mut map = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                map.set_cell(x as i32 + 1, y as i32 + 1, code);
            }
        }
        map
    }

    /// Parse a map from text rows
    /// Format:
    /// - `.` or space: empty cell (leading indentation is ignored)
    /// - `#`: wall variant 1
    /// - `1`..`9`: wall of that variant
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub fn from_ascii(text: &str) -> Self {
        let rows: Vec<Vec<i32>> = text
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.trim_start()
                    .chars()
                    .map(|ch| match ch {
                        '#' => 1,
                        d if d.is_ascii_digit() => d.to_digit(10).map(|v| v as i32).unwrap_or(0),
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    /// Render the map as text, placing `markers` (world positions) over cells
    pub fn to_ascii(&self, markers: &[(f32, f32, char)]) -> String {
        let mut result = String::new();
        for gy in 1..=self.height {
            for gx in 1..=self.width {
                let marker = markers
                    .iter()
                    .find(|(x, y, _)| self.world_to_grid(*x, *y) == (gx, gy))
                    .map(|(_, _, ch)| *ch);
                let symbol = match marker {
                    Some(ch) => ch,
                    None => match self.get_cell(gx, gy) {
                        0 => '.',
                        v if (1..=9).contains(&v) => char::from_digit(v as u32, 10).unwrap_or('#'),
                        _ => '#',
                    },
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }

    /// Check if a grid cell is inside the map
    pub fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        gx >= 1 && gx <= self.width && gy >= 1 && gy <= self.height
    }

    fn get_id(&self, gx: i32, gy: i32) -> usize {
        ((gx - 1) + (gy - 1) * self.width) as usize
    }

    /// Get raw cell code at (gx, gy), 0 when out of bounds
    pub fn get_cell(&self, gx: i32, gy: i32) -> i32 {
        if !self.in_bounds(gx, gy) {
            return 0;
        }
        self.cells[self.get_id(gx, gy)]
    }

    /// Set cell code at (gx, gy); ignored out of bounds. Only used while building a level.
    pub fn set_cell(&mut self, gx: i32, gy: i32, value: i32) {
        if self.in_bounds(gx, gy) {
            let id = self.get_id(gx, gy);
            self.cells[id] = value;
        }
    }

    /// Check if a cell is solid
    pub fn is_wall(&self, gx: i32, gy: i32) -> bool {
        if !self.in_bounds(gx, gy) {
            return true; // Out of bounds is considered solid
        }
        self.cells[self.get_id(gx, gy)] != 0
    }

    /// Wall variant of a cell, `DEFAULT_WALL_VARIANT` outside the map
    pub fn wall_variant(&self, gx: i32, gy: i32) -> i32 {
        if !self.in_bounds(gx, gy) {
            return DEFAULT_WALL_VARIANT;
        }
        self.cells[self.get_id(gx, gy)]
    }

    /// Convert world coordinates to grid coordinates
    pub fn world_to_grid(&self, x: f32, y: f32) -> (i32, i32) {
        (x.floor() as i32 + 1, y.floor() as i32 + 1)
    }

    /// Convert grid coordinates to the world position of the cell center
    pub fn grid_to_world(&self, gx: i32, gy: i32) -> (f32, f32) {
        (gx as f32 - 0.5, gy as f32 - 0.5)
    }

    /// Check if a world point lies in a solid cell
    pub fn check_collision(&self, x: f32, y: f32) -> bool {
        let (gx, gy) = self.world_to_grid(x, y);
        self.is_wall(gx, gy)
    }

    /// Check the 4 corners of the square of half-size `radius` centered at (x, y).
    ///
    /// Known limitation: only the corners are sampled, so a body moving far
    /// enough in one step can pass a wall thinner than its own width near a
    /// corner. Callers keep per-step displacement small instead.
    pub fn check_rect_collision(&self, x: f32, y: f32, radius: f32) -> bool {
        let corners = [
            (x - radius, y - radius),
            (x + radius, y - radius),
            (x - radius, y + radius),
            (x + radius, y + radius),
        ];
        corners.iter().any(|&(cx, cy)| self.check_collision(cx, cy))
    }

    pub fn is_valid_spawn(&self, x: f32, y: f32, radius: f32) -> bool {
        !self.check_rect_collision(x, y, radius)
    }

    /// Rejection-sample a free position inside [1.5, W-0.5) x [1.5, H-0.5).
    /// Falls back to `FALLBACK_SPAWN` when every attempt collides.
    pub fn find_random_spawn<R: Rng>(
        &self,
        radius: f32,
        max_attempts: u32,
        rng: &mut R,
    ) -> (f32, f32) {
        let max_x = self.width as f32 - 0.5;
        let max_y = self.height as f32 - 0.5;
        if max_x <= 1.5 || max_y <= 1.5 {
            return FALLBACK_SPAWN;
        }

        for _ in 0..max_attempts {
            let x = rng.gen_range(1.5..max_x);
            let y = rng.gen_range(1.5..max_y);
            if self.is_valid_spawn(x, y, radius) {
                return (x, y);
            }
        }

        log::warn!(
            "no free spawn found in {} attempts, using fallback {:?}",
            max_attempts,
            FALLBACK_SPAWN
        );
        FALLBACK_SPAWN
    }

    /// Fixed-step linear march from (x, y) along (dir_x, dir_y).
    /// Used for simple visibility queries, not for screen rendering.
    pub fn ray_march(&self, x: f32, y: f32, dir_x: f32, dir_y: f32, max_distance: f32) -> MarchHit {
        let mut distance = 0.0;
        while distance < max_distance {
            let px = x + dir_x * distance;
            let py = y + dir_y * distance;
            if self.check_collision(px, py) {
                return MarchHit {
                    distance,
                    hit_x: px,
                    hit_y: py,
                    hit: true,
                };
            }
            distance += RAY_MARCH_STEP;
        }

        MarchHit {
            distance: max_distance,
            hit_x: x + dir_x * max_distance,
            hit_y: y + dir_y * max_distance,
            hit: false,
        }
    }

    /// Check that no solid cell lies on the straight segment between two points.
    /// Samples `SIGHT_STEPS_PER_UNIT` points per unit of distance; endpoints are not tested.
    pub fn has_line_of_sight(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let distance = (dx * dx + dy * dy).sqrt();
        let steps = (distance * SIGHT_STEPS_PER_UNIT).ceil() as i32;

        for i in 1..steps {
            let t = i as f32 / steps as f32;
            if self.check_collision(x0 + dx * t, y0 + dy * t) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bordered(width: i32, height: i32) -> GridMap {
        let mut map = GridMap::new(width, height);
        for gx in 1..=width {
            map.set_cell(gx, 1, 1);
            map.set_cell(gx, height, 1);
        }
        for gy in 1..=height {
            map.set_cell(1, gy, 1);
            map.set_cell(width, gy, 1);
        }
        map
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let map = GridMap::new(4, 4);
        assert!(map.is_wall(0, 1));
        assert!(map.is_wall(1, 0));
        assert!(map.is_wall(5, 2));
        assert!(map.is_wall(2, 5));
        assert!(!map.is_wall(2, 2));
        assert_eq!(map.wall_variant(0, 0), DEFAULT_WALL_VARIANT);
    }

    #[test]
    fn test_world_to_grid_is_one_indexed() {
        let map = GridMap::new(4, 4);
        assert_eq!(map.world_to_grid(0.0, 0.0), (1, 1));
        assert_eq!(map.world_to_grid(0.99, 1.0), (1, 2));
        assert_eq!(map.world_to_grid(-0.1, 3.5), (0, 4));
    }

    #[test]
    fn test_grid_to_world_returns_cell_center() {
        let map = GridMap::new(8, 8);
        let (gx, gy) = map.world_to_grid(3.2, 5.9);
        assert_eq!(map.grid_to_world(gx, gy), (3.5, 5.5));

        let (cx, cy) = map.grid_to_world(gx, gy);
        assert_eq!(map.world_to_grid(cx, cy), (gx, gy));
    }

    #[test]
    fn test_rect_collision_open_interior() {
        let map = bordered(12, 12);
        assert!(!map.check_rect_collision(6.0, 6.0, 0.3));
        assert!(map.check_rect_collision(0.0, 0.0, 0.3));
        // Corner just reaches the border wall
        assert!(map.check_rect_collision(1.2, 6.0, 0.3));
        assert!(map.is_valid_spawn(1.5, 1.5, 0.3));
    }

    #[test]
    fn test_random_spawn_is_valid() {
        let map = bordered(12, 12);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let (x, y) = map.find_random_spawn(0.3, 100, &mut rng);
            assert!(map.is_valid_spawn(x, y, 0.3));
            assert!(x >= 1.5 && x < 11.5);
            assert!(y >= 1.5 && y < 11.5);
        }
    }

    #[test]
    fn test_random_spawn_falls_back() {
        let mut map = GridMap::new(6, 6);
        for gy in 1..=6 {
            for gx in 1..=6 {
                map.set_cell(gx, gy, 2);
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(map.find_random_spawn(0.3, 20, &mut rng), FALLBACK_SPAWN);
    }

    #[test]
    fn test_ray_march_hits_border() {
        let map = bordered(12, 12);
        let hit = map.ray_march(1.5, 1.5, 1.0, 0.0, 20.0);
        assert!(hit.hit);
        // Border column 12 starts at world x = 11
        assert!((hit.distance - 9.5).abs() < RAY_MARCH_STEP + 1e-3);
        assert!(hit.hit_x >= 11.0);
    }

    #[test]
    fn test_ray_march_no_hit_within_range() {
        let map = bordered(12, 12);
        let hit = map.ray_march(1.5, 1.5, 1.0, 0.0, 3.0);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 3.0);
    }

    #[test]
    fn test_line_of_sight() {
        let mut map = bordered(12, 12);
        assert!(map.has_line_of_sight(2.5, 5.5, 9.5, 5.5));
        map.set_cell(6, 6, 3);
        assert!(!map.has_line_of_sight(2.5, 5.5, 9.5, 5.5));
        assert!(map.has_line_of_sight(2.5, 2.5, 9.5, 2.5));
    }

    #[test]
    fn test_ascii_round_trip() {
        let map = GridMap::from_ascii(
            "####\n\
             #.2#\n\
             ####",
        );
        assert_eq!(map.width, 4);
        assert_eq!(map.height, 3);
        assert_eq!(map.get_cell(3, 2), 2);
        assert!(!map.is_wall(2, 2));
        assert_eq!(map.to_ascii(&[(1.5, 1.5, 'P')]), "1111\n1P21\n1111\n");
    }
}
