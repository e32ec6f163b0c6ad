use crate::{Error, Result, SCREEN_WIDTH};

use super::super::GameBoyBus;
use super::{
    LcdControl, BGP_ADDR, OBP0_ADDR, OBP1_ADDR, SCX_ADDR, SCY_ADDR, WX_ADDR, WY_ADDR,
};

const OAM_BASE: usize = 0xFE00;
const OAM_ENTRIES: usize = 40;
const MAX_SPRITES_PER_LINE: usize = 10;

const ATTR_PRIORITY: u8 = 0x80;
const ATTR_FLIP_Y: u8 = 0x40;
const ATTR_FLIP_X: u8 = 0x20;
const ATTR_PALETTE: u8 = 0x10;

#[derive(Clone, Copy)]
struct Sprite {
    /// Screen-space top edge (OAM Y - 16).
    y: i16,
    /// Screen-space left edge (OAM X - 8).
    x: i16,
    tile: u8,
    attrs: u8,
    oam_index: usize,
}

/// Map a 2-bit color index through a DMG palette register.
#[inline]
fn palette_shade(palette: u8, color_index: u8) -> u8 {
    (palette >> (color_index * 2)) & 0x03
}

impl GameBoyBus {
    /// Render scanline `LY` into the frame buffer.
    pub(super) fn render_line(&mut self) -> Result<()> {
        let lcdc = self.lcdc();
        if lcdc.contains(LcdControl::OBJ_ENABLE | LcdControl::OBJ_TALL) {
            return Err(Error::UnsupportedSpriteMode);
        }

        let ly = self.ppu.ly;
        let mut bg_index = [0u8; SCREEN_WIDTH];
        let mut line = [0u8; SCREEN_WIDTH];

        if lcdc.contains(LcdControl::BG_WINDOW_ENABLE) {
            self.render_background(ly, &mut bg_index);
            if self.render_window(ly, &mut bg_index) {
                self.ppu.window_line = self.ppu.window_line.wrapping_add(1);
            }
            let bgp = self.memory[BGP_ADDR as usize];
            for (shade, &index) in line.iter_mut().zip(bg_index.iter()) {
                *shade = palette_shade(bgp, index);
            }
        }

        if lcdc.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprites(ly, &bg_index, &mut line);
        }

        let start = ly as usize * SCREEN_WIDTH;
        self.ppu.frame[start..start + SCREEN_WIDTH].copy_from_slice(&line);
        Ok(())
    }

    /// Color index of one pixel of a tile row.
    fn tile_pixel(&self, tile_addr: u16, row: u8, col: u8) -> u8 {
        let row_addr = tile_addr.wrapping_add(row as u16 * 2) as usize;
        let lo = self.memory[row_addr];
        let hi = self.memory[row_addr + 1];
        let bit = 7 - col;
        (((hi >> bit) & 0x01) << 1) | ((lo >> bit) & 0x01)
    }

    /// Address of a BG/window tile given its map index.
    fn bg_tile_addr(&self, tile_index: u8) -> u16 {
        if self.lcdc().contains(LcdControl::TILE_DATA_UNSIGNED) {
            0x8000 + tile_index as u16 * 16
        } else {
            // Indices 0..127 live at 0x9000, 128..255 at 0x8800.
            let index = if tile_index < 128 {
                tile_index as u16 + 256
            } else {
                tile_index as u16
            };
            0x8000 + index * 16
        }
    }

    fn render_background(&self, ly: u8, bg_index: &mut [u8; SCREEN_WIDTH]) {
        let map_base: u16 = if self.lcdc().contains(LcdControl::BG_TILE_MAP) {
            0x9C00
        } else {
            0x9800
        };
        let scx = self.memory[SCX_ADDR as usize];
        let scy = self.memory[SCY_ADDR as usize];
        let bg_y = ly.wrapping_add(scy);

        for (x, index) in bg_index.iter_mut().enumerate() {
            let bg_x = (x as u8).wrapping_add(scx);
            let map_addr = map_base + (bg_y / 8) as u16 * 32 + (bg_x / 8) as u16;
            let tile_addr = self.bg_tile_addr(self.memory[map_addr as usize]);
            *index = self.tile_pixel(tile_addr, bg_y & 7, bg_x & 7);
        }
    }

    /// Overlay the window on this line. Returns whether any of it was drawn.
    fn render_window(&self, ly: u8, bg_index: &mut [u8; SCREEN_WIDTH]) -> bool {
        let lcdc = self.lcdc();
        let wy = self.memory[WY_ADDR as usize];
        let wx = self.memory[WX_ADDR as usize];
        if !lcdc.contains(LcdControl::WINDOW_ENABLE) || ly < wy || wx > 166 {
            return false;
        }

        let map_base: u16 = if lcdc.contains(LcdControl::WINDOW_TILE_MAP) {
            0x9C00
        } else {
            0x9800
        };
        let win_y = self.ppu.window_line;

        for (x, index) in bg_index.iter_mut().enumerate() {
            // Window X is offset by 7.
            let Some(win_x) = (x + 7).checked_sub(wx as usize) else {
                continue;
            };
            let win_x = win_x as u8;
            let map_addr = map_base + (win_y / 8) as u16 * 32 + (win_x / 8) as u16;
            let tile_addr = self.bg_tile_addr(self.memory[map_addr as usize]);
            *index = self.tile_pixel(tile_addr, win_y & 7, win_x & 7);
        }
        true
    }

    /// Select up to ten sprites covering `ly`, in OAM order.
    fn sprites_on_line(&self, ly: u8) -> Vec<Sprite> {
        let line = ly as i16;
        let mut sprites: Vec<Sprite> = (0..OAM_ENTRIES)
            .map(|i| {
                let base = OAM_BASE + i * 4;
                Sprite {
                    y: self.memory[base] as i16 - 16,
                    x: self.memory[base + 1] as i16 - 8,
                    tile: self.memory[base + 2],
                    attrs: self.memory[base + 3],
                    oam_index: i,
                }
            })
            .filter(|s| line >= s.y && line < s.y + 8)
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        // Lower X wins; ties go to the earlier OAM entry.
        sprites.sort_by_key(|s| (s.x, s.oam_index));
        sprites
    }

    fn render_sprites(&self, ly: u8, bg_index: &[u8; SCREEN_WIDTH], line: &mut [u8; SCREEN_WIDTH]) {
        let obp0 = self.memory[OBP0_ADDR as usize];
        let obp1 = self.memory[OBP1_ADDR as usize];
        let sprites = self.sprites_on_line(ly);
        let mut owned = [false; SCREEN_WIDTH];

        for sprite in &sprites {
            let mut row = (ly as i16 - sprite.y) as u8;
            if sprite.attrs & ATTR_FLIP_Y != 0 {
                row = 7 - row;
            }
            let tile_addr = 0x8000 + sprite.tile as u16 * 16;
            let palette = if sprite.attrs & ATTR_PALETTE != 0 { obp1 } else { obp0 };

            for col in 0..8u8 {
                let screen_x = sprite.x + col as i16;
                if !(0..SCREEN_WIDTH as i16).contains(&screen_x) {
                    continue;
                }
                let x = screen_x as usize;
                if owned[x] {
                    continue;
                }
                let src_col = if sprite.attrs & ATTR_FLIP_X != 0 { 7 - col } else { col };
                let color_index = self.tile_pixel(tile_addr, row, src_col);
                // Color 0 is transparent.
                if color_index == 0 {
                    continue;
                }
                // The pixel belongs to this sprite even when the BG hides it.
                owned[x] = true;
                if sprite.attrs & ATTR_PRIORITY == 0 || bg_index[x] == 0 {
                    line[x] = palette_shade(palette, color_index);
                }
            }
        }
    }
}
