use crate::game::SnakeGame;
use crate::grid::TileKind;
use crate::pos::{Dir, Pos};

/// Side length of one grid tile in pixels.
pub const TILE: u32 = 20;

/// Software renderer for the `pixels` RGBA frame buffer.
pub struct Renderer {
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(grid_width: i32, grid_height: i32) -> Self {
        Self {
            width: grid_width as u32 * TILE,
            height: grid_height as u32 * TILE,
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn draw(&self, game: &SnakeGame, frame: &mut [u8], show_cycle: bool) {
        // Clear screen with dark background
        self.clear_rgba(frame, 20, 20, 30, 255);

        // Checkerboard so the tiles read at a glance
        for y in 0..game.grid.height {
            for x in 0..game.grid.width {
                if (x + y) % 2 == 0 {
                    self.fill_cell_rgba(frame, x as u32, y as u32, 25, 25, 35, 255);
                }
            }
        }

        if show_cycle {
            self.draw_cycle(game, frame);
        }

        // Apple (red)
        let apple = game.apple.pos;
        self.fill_cell_rgba(frame, apple.x as u32, apple.y as u32, 220, 50, 50, 255);

        // Snake, head bright with a gradient fading down the body
        for (i, &pos) in game.snake.body.iter().enumerate() {
            if i == 0 {
                self.fill_cell_rgba(frame, pos.x as u32, pos.y as u32, 100, 255, 100, 255);
                self.draw_eyes(frame, pos, game.snake.dir);
            } else {
                let brightness = 200 - (i * 10).min(100) as u8;
                self.fill_cell_rgba(frame, pos.x as u32, pos.y as u32, 50, brightness, 50, 255);
            }
        }

        if game.game_over() {
            if !game.won {
                self.draw_death_wash(game, frame);
            }
            let (title, col) = if game.won {
                ("YOU WIN", (100, 255, 150, 255))
            } else {
                ("GAME OVER", (255, 100, 100, 255))
            };
            let cx = self.width / 2;
            let cy = self.height / 2;
            self.draw_text(frame, title, cx.saturating_sub(80), cy.saturating_sub(20), 2, col);
            self.draw_text(
                frame,
                &format!("SCORE: {}", game.score),
                cx.saturating_sub(70),
                cy + 20,
                2,
                (255, 255, 255, 255),
            );
            self.draw_text(
                frame,
                "PRESS R TO RESTART",
                cx.saturating_sub(130),
                cy + 60,
                2,
                (200, 200, 200, 255),
            );
        } else if game.paused {
            self.draw_text(
                frame,
                "PAUSED",
                self.width / 2 - 50,
                self.height / 2,
                2,
                (255, 255, 100, 255),
            );
        }

        self.draw_hud(game, frame);
    }

    fn draw_hud(&self, game: &SnakeGame, frame: &mut [u8]) {
        self.fill_rect_rgba(frame, 4, 4, 216, 58, 0, 0, 0, 140);
        self.draw_text(
            frame,
            &format!("SCORE: {}", game.score),
            10,
            8,
            2,
            (230, 230, 230, 255),
        );
        self.draw_text(
            frame,
            &format!("LIVES: {}", game.snake.lives),
            10,
            26,
            2,
            (200, 200, 200, 255),
        );
        let pilot = if game.autopilot { "PILOT: ON  SPACE" } else { "PILOT: OFF SPACE" };
        self.draw_text(frame, pilot, 10, 44, 2, (180, 220, 255, 255));
    }

    /// Traces the Hamiltonian cycle as dim segments between tile centers.
    fn draw_cycle(&self, game: &SnakeGame, frame: &mut [u8]) {
        let half = TILE / 2;
        for (a, b) in game.cycle.edges() {
            let ax = a.x as u32 * TILE + half;
            let ay = a.y as u32 * TILE + half;
            let bx = b.x as u32 * TILE + half;
            let by = b.y as u32 * TILE + half;
            let (x, y, w, h) = if ay == by {
                (ax.min(bx), ay - 1, ax.abs_diff(bx), 2)
            } else {
                (ax - 1, ay.min(by), 2, ay.abs_diff(by))
            };
            self.fill_rect_rgba(frame, x, y, w, h, 120, 120, 200, 90);
        }
    }

    /// Grayscale wash radiating out from the head of the dead snake.
    fn draw_death_wash(&self, game: &SnakeGame, frame: &mut [u8]) {
        let head = game
            .snake
            .body
            .front()
            .copied()
            .unwrap_or(Pos::new(game.grid.width / 2, game.grid.height / 2));
        for y in 0..game.grid.height {
            for x in 0..game.grid.width {
                if game.grid.kind(Pos::new(x, y)) != TileKind::Empty {
                    continue;
                }
                let dist = (x - head.x).abs().max((y - head.y).abs()) as u32;
                let shade = 90u8.saturating_sub((dist * 6).min(80) as u8);
                self.fill_cell_rgba(frame, x as u32, y as u32, shade, shade, shade, 110);
            }
        }
    }

    fn draw_eyes(&self, frame: &mut [u8], pos: Pos, dir: Dir) {
        let base_x = pos.x as u32 * TILE;
        let base_y = pos.y as u32 * TILE;

        let (eye1_x, eye1_y, eye2_x, eye2_y) = match dir {
            Dir::Right => (base_x + 12, base_y + 5, base_x + 12, base_y + 12),
            Dir::Left => (base_x + 5, base_y + 5, base_x + 5, base_y + 12),
            Dir::Up => (base_x + 5, base_y + 5, base_x + 12, base_y + 5),
            Dir::Down => (base_x + 5, base_y + 12, base_x + 12, base_y + 12),
        };

        self.blend_pixel(frame, eye1_x, eye1_y, 0, 0, 0, 255);
        self.blend_pixel(frame, eye2_x, eye2_y, 0, 0, 0, 255);
    }

    fn clear_rgba(&self, frame: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
        for px in frame.chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = a;
        }
    }

    fn blend_pixel(&self, frame: &mut [u8], x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 3 >= frame.len() {
            return;
        }
        let ar = a as u16;
        let iar = (255 - a) as u16;
        let dr = frame[idx] as u16;
        let dg = frame[idx + 1] as u16;
        let db = frame[idx + 2] as u16;
        frame[idx] = (((r as u16) * ar + dr * iar) / 255) as u8;
        frame[idx + 1] = (((g as u16) * ar + dg * iar) / 255) as u8;
        frame[idx + 2] = (((b as u16) * ar + db * iar) / 255) as u8;
        frame[idx + 3] = 255;
    }

    fn fill_rect_rgba(&self, frame: &mut [u8], x: u32, y: u32, w: u32, h: u32, r: u8, g: u8, b: u8, a: u8) {
        let x2 = (x + w).min(self.width);
        let y2 = (y + h).min(self.height);
        for py in y..y2 {
            for px in x..x2 {
                self.blend_pixel(frame, px, py, r, g, b, a);
            }
        }
    }

    fn fill_cell_rgba(&self, frame: &mut [u8], grid_x: u32, grid_y: u32, r: u8, g: u8, b: u8, a: u8) {
        self.fill_rect_rgba(frame, grid_x * TILE, grid_y * TILE, TILE, TILE, r, g, b, a);
    }

    fn draw_char(&self, frame: &mut [u8], ch: char, x: u32, y: u32, scale: u32, col: (u8, u8, u8, u8)) -> u32 {
        if let Some(rows) = glyph_5x7(ch) {
            for (ry, row) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (row >> (4 - rx)) & 1 == 1 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.blend_pixel(
                                    frame,
                                    x + rx as u32 * scale + sx,
                                    y + ry as u32 * scale + sy,
                                    col.0,
                                    col.1,
                                    col.2,
                                    col.3,
                                );
                            }
                        }
                    }
                }
            }
        }
        5 * scale + scale
    }

    fn draw_text(&self, frame: &mut [u8], text: &str, x: u32, y: u32, scale: u32, col: (u8, u8, u8, u8)) {
        let mut cx = x;
        for ch in text.chars() {
            cx += self.draw_char(frame, ch, cx, y, scale, col);
        }
    }
}

fn glyph_5x7(ch: char) -> Option<[u8; 7]> {
    let c = ch.to_ascii_uppercase();
    Some(match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        _ => return None,
    })
}
