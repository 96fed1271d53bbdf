use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use opencv::core::{Mat, Vec3b};
use opencv::prelude::*;

use crate::pose::{KeypointIndex, Pose};
use crate::render::skeleton::{ACTIVE_JOINT_COLOR, JOINT_COLOR, MISSING_COLOR, SKELETON_COLOR, SKELETON_CONNECTIONS};

/// キー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Select(char),
}

/// minifbを使用したトレーナー画面
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// 今回押されたキーをコマンドに変換
    pub fn poll_commands(&self) -> Vec<Command> {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(command_for_key)
            .collect()
    }

    /// BGR Mat をバッファにコピー（はみ出す部分は切り捨て）
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<Vec3b>(y as i32, x as i32)?;
                let (b, g, r) = (pixel[0] as u32, pixel[1] as u32, pixel[2] as u32);
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }
        Ok(())
    }

    /// 骨格を描画。`active` の関節は強調し、閾値未満は赤
    pub fn draw_pose(&mut self, pose: &Pose, active: &[KeypointIndex], confidence_threshold: f32) {
        let w = self.width as u32;
        let h = self.height as u32;

        for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
            let start = pose.get(*start_idx);
            let end = pose.get(*end_idx);
            if start.is_valid(confidence_threshold) && end.is_valid(confidence_threshold) {
                let (x1, y1) = start.to_pixel(w, h);
                let (x2, y2) = end.to_pixel(w, h);
                self.draw_line(x1, y1, x2, y2, SKELETON_COLOR);
            }
        }

        for &idx in &KeypointIndex::ALL[KeypointIndex::LeftShoulder as usize..] {
            let kp = pose.get(idx);
            let (px, py) = kp.to_pixel(w, h);
            let color = if !kp.is_valid(confidence_threshold) {
                MISSING_COLOR
            } else if active.contains(&idx) {
                ACTIVE_JOINT_COLOR
            } else {
                JOINT_COLOR
            };
            self.draw_circle(px, py, 4, color);
        }
    }

    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenham
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

fn command_for_key(key: Key) -> Option<Command> {
    let c = match key {
        Key::Escape | Key::Q => return Some(Command::Quit),
        Key::S => 's',
        Key::P => 'p',
        Key::B => 'b',
        Key::L => 'l',
        Key::O => 'o',
        Key::U => 'u',
        Key::T => 't',
        Key::R => 'r',
        Key::G => 'g',
        Key::C => 'c',
        Key::H => 'h',
        _ => return None,
    };
    Some(Command::Select(c))
}
