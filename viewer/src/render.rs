use msgs::box_data::{BoxId, BoxState, DEPTH, HEIGHT, WIDTH};
use msgs::camera::{CameraPreset, ColorMode};

/// The terminal stand-in for the 3D scene: the latest snapshot plus the
/// camera preset and color mode the server has relayed to us.
pub struct Scene {
    boxes: Vec<BoxState>,
    preset: CameraPreset,
    mode: ColorMode,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            boxes: Vec::new(),
            preset: CameraPreset::Front,
            mode: ColorMode::Light,
        }
    }

    pub fn update_state(&mut self, boxes: Vec<BoxState>) {
        self.boxes = boxes;
    }

    pub fn set_camera_preset(&mut self, preset: CameraPreset) {
        self.preset = preset;
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    /// Projects the snapshot onto the plane the camera preset looks at.
    /// Top looks down and keeps the highest box per column; front keeps
    /// the box nearest the viewer (lowest y); back mirrors x and keeps
    /// the highest y. Empty cells read 0.
    fn projection(&self) -> Vec<Vec<BoxId>> {
        match self.preset {
            CameraPreset::Top => {
                let mut grid = vec![vec![0; WIDTH as usize]; DEPTH as usize];
                let mut heights = vec![vec![-1; WIDTH as usize]; DEPTH as usize];
                for &(box_id, x, y, z) in &self.boxes {
                    let row = (DEPTH - 1 - y) as usize;
                    let col = x as usize;
                    if z > heights[row][col] {
                        heights[row][col] = z;
                        grid[row][col] = box_id;
                    }
                }
                grid
            }
            CameraPreset::Front => {
                let mut grid = vec![vec![0; WIDTH as usize]; HEIGHT as usize];
                let mut depths = vec![vec![DEPTH; WIDTH as usize]; HEIGHT as usize];
                for &(box_id, x, y, z) in &self.boxes {
                    let row = (HEIGHT - 1 - z) as usize;
                    let col = x as usize;
                    if y < depths[row][col] {
                        depths[row][col] = y;
                        grid[row][col] = box_id;
                    }
                }
                grid
            }
            CameraPreset::Back => {
                let mut grid = vec![vec![0; WIDTH as usize]; HEIGHT as usize];
                let mut depths = vec![vec![-1; WIDTH as usize]; HEIGHT as usize];
                for &(box_id, x, y, z) in &self.boxes {
                    let row = (HEIGHT - 1 - z) as usize;
                    let col = (WIDTH - 1 - x) as usize;
                    if y > depths[row][col] {
                        depths[row][col] = y;
                        grid[row][col] = box_id;
                    }
                }
                grid
            }
        }
    }

    pub fn render(&self) {
        let grid = self.projection();

        let widest = self
            .boxes
            .iter()
            .map(|(box_id, _, _, _)| box_id.to_string().len())
            .max()
            .unwrap_or(1);
        let cell_width = widest + 1;

        // Clear the terminal and redraw from the top left.
        print!("\x1b[2J\x1b[H");
        if self.mode == ColorMode::Dark {
            print!("\x1b[7m");
        }

        println!(
            "warehouse - {} perspective - {} boxes",
            self.preset.as_str(),
            self.boxes.len()
        );
        for row in grid {
            let mut line = String::new();
            for value in row {
                let value = value.to_string();
                line.push_str(&value);
                line.push_str(&" ".repeat(cell_width - value.len()));
            }
            println!("{line}");
        }

        if self.mode == ColorMode::Dark {
            print!("\x1b[0m");
        }
    }
}
