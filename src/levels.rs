use crate::GridMap;

/// Default playable level. Digits are wall variants, `.` is floor.
const DEFAULT_LEVEL: &str = "
1111111111111111
1..............1
1..22....3.....1
1..2.....3.....1
1........3..44.1
1..............1
1.....1111.....1
1..............1
1.33.......2...1
1..3.......2...1
1..3...........1
1.......444....1
1..............1
1..2......3....1
1..2......3....1
1111111111111111
";

/// Build the default level
pub fn default_level() -> GridMap {
    GridMap::from_ascii(DEFAULT_LEVEL)
}

/// Build a `width` x `height` arena: wall variant 1 on the border, empty inside
pub fn open_arena(width: i32, height: i32) -> GridMap {
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
