use super::{CartridgeKind, GameBoy};
use crate::cpu::{Bus, CpuStatus};
use crate::{Error, MachineConfig, SCREEN_WIDTH};

const IF_ADDR: u16 = 0xFF0F;
const LINE: u32 = 114;

/// Cartridge image of `2 << rom_code` banks with the three header fields
/// the bus looks at.
fn cartridge(kind: u8, rom_code: u8, ram_code: u8) -> Vec<u8> {
    let mut rom = vec![0u8; (2usize << rom_code) * 0x4000];
    rom[0x147] = kind;
    rom[0x148] = rom_code;
    rom[0x149] = ram_code;
    rom
}

/// ROM-only cartridge with `program` at the entry point.
fn program_rom(program: &[u8]) -> Vec<u8> {
    let mut rom = cartridge(0x00, 0, 0);
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn zeroed_ram() -> MachineConfig {
    MachineConfig::builder().seed_internal_ram(false).build()
}

/// Post-boot machine spinning on `JR -2` at 0x0100.
fn idle_machine() -> GameBoy {
    GameBoy::with_config(zeroed_ram(), &program_rom(&[0x18, 0xFE])).unwrap()
}

fn tick(gb: &mut GameBoy, mcycles: u32) {
    for _ in 0..mcycles {
        gb.bus.tick_mcycle().unwrap();
    }
}

fn clear_if(gb: &mut GameBoy) {
    gb.bus.write8(IF_ADDR, 0x00);
}

fn if_bits(gb: &mut GameBoy) -> u8 {
    gb.bus.read8(IF_ADDR) & 0x1F
}

// --- Power-on state -------------------------------------------------------

#[test]
fn post_boot_state_matches_dmg() {
    let mut gb = idle_machine();
    let regs = gb.registers();
    assert_eq!((regs.a, regs.f), (0x01, 0xB0));
    assert_eq!((regs.bc(), regs.de(), regs.hl()), (0x0013, 0x00D8, 0x014D));
    assert_eq!((regs.sp, regs.pc), (0xFFFE, 0x0100));

    assert_eq!(gb.bus.read8(0xFF04), 0xAB); // DIV
    assert_eq!(gb.bus.read8(0xFF40), 0x91); // LCDC
    assert_eq!(gb.bus.read8(0xFF47), 0xFC); // BGP
    assert_eq!(gb.bus.read8(IF_ADDR), 0xE1);
    assert_eq!(gb.bus.read8(0xFF44), 0x00);
    assert_eq!(gb.cartridge_kind(), CartridgeKind::RomOnly);
    assert_eq!(gb.cpu_status(), CpuStatus::Okay);
}

#[test]
fn internal_ram_seeding_is_deterministic() {
    let rom = program_rom(&[0x18, 0xFE]);
    let a = GameBoy::new(&rom).unwrap();
    let b = GameBoy::new(&rom).unwrap();
    let wram = a.dump(0xC000..=0xDFFF);
    assert_eq!(wram, b.dump(0xC000..=0xDFFF));
    assert!(wram.iter().any(|&byte| byte != 0));

    let zeroed = idle_machine();
    assert!(zeroed.dump(0xC000..=0xDFFF).iter().all(|&byte| byte == 0));
    assert!(zeroed.dump(0xFF80..=0xFFFE).iter().all(|&byte| byte == 0));
}

// --- Cartridge loading and MBC1 --------------------------------------------

#[test]
fn unsupported_cartridge_is_rejected_before_running() {
    let rom = cartridge(0x13, 0, 0); // MBC3
    assert!(matches!(
        GameBoy::new(&rom),
        Err(Error::UnsupportedCartridge(0x13))
    ));
}

#[test]
fn truncated_rom_is_rejected() {
    assert!(matches!(
        GameBoy::new(&[0u8; 0x100]),
        Err(Error::TruncatedRom(0x100))
    ));
}

/// 64-bank MBC1 image where each bank starts with its own number.
fn numbered_mbc1() -> GameBoy {
    let mut rom = cartridge(0x01, 0x05, 0x00);
    for bank in 0..64 {
        rom[bank * 0x4000] = bank as u8;
    }
    GameBoy::with_config(zeroed_ram(), &rom).unwrap()
}

#[test]
fn mbc1_rom_banking_in_both_modes() {
    let mut gb = numbered_mbc1();
    assert_eq!(gb.cartridge_kind(), CartridgeKind::Mbc1);

    assert_eq!(gb.bus.read8(0x4000), 1);
    // Bank 0 in the primary register selects bank 1.
    gb.bus.write8(0x2000, 0x00);
    assert_eq!(gb.bus.read8(0x4000), 1);
    gb.bus.write8(0x2000, 0x05);
    assert_eq!(gb.bus.read8(0x4000), 5);
    // Only five bits are kept; 0x20 behaves like 0.
    gb.bus.write8(0x2000, 0x20);
    assert_eq!(gb.bus.read8(0x4000), 1);

    gb.bus.write8(0x2000, 0x05);
    gb.bus.write8(0x4000, 0x01);
    assert_eq!(gb.bus.read8(0x4000), 0x25);
    // Mode 0: the fixed window stays on bank 0.
    assert_eq!(gb.bus.read8(0x0000), 0);

    // Mode 1: the secondary register also drives the fixed window.
    gb.bus.write8(0x6000, 0x01);
    assert_eq!(gb.bus.read8(0x0000), 0x20);
    assert_eq!(gb.bus.read8(0x4000), 0x25);

    gb.bus.write8(0x6000, 0x00);
    assert_eq!(gb.bus.read8(0x0000), 0);
}

#[test]
fn mbc1_bank_number_wraps_to_rom_size() {
    let mut rom = cartridge(0x01, 0x01, 0x00); // 4 banks
    for bank in 0..4 {
        rom[bank * 0x4000 + 0x10] = 0xB0 | bank as u8;
    }
    let mut gb = GameBoy::with_config(zeroed_ram(), &rom).unwrap();
    gb.bus.write8(0x2000, 0x06);
    assert_eq!(gb.bus.read8(0x4010), 0xB2);
}

#[test]
fn mbc1_reads_past_image_are_open_bus() {
    // Header claims 4 banks but only 2 are present.
    let mut rom = cartridge(0x01, 0x01, 0x00);
    rom.truncate(0x8000);
    let mut gb = GameBoy::with_config(zeroed_ram(), &rom).unwrap();
    gb.bus.write8(0x2000, 0x03);
    assert_eq!(gb.bus.read8(0x4000), 0xFF);
}

#[test]
fn mbc1_ram_enable_and_banking() {
    let rom = cartridge(0x03, 0x00, 0x03); // MBC1+RAM+BATTERY, 32 KiB RAM
    let mut gb = GameBoy::with_config(zeroed_ram(), &rom).unwrap();
    assert_eq!(gb.cartridge_kind(), CartridgeKind::Mbc1Ram);

    // Disabled RAM reads 0xFF and ignores writes.
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);

    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x11);
    assert_eq!(gb.bus.read8(0xA000), 0x11);

    // Mode 1 with secondary bank 2 selects RAM bank 2.
    gb.bus.write8(0x6000, 0x01);
    gb.bus.write8(0x4000, 0x02);
    assert_ne!(gb.bus.read8(0xA000), 0x11);
    gb.bus.write8(0xA000, 0x22);
    assert_eq!(gb.bus.read8(0xA000), 0x22);

    // Back in mode 0 RAM bank 0 is visible again.
    gb.bus.write8(0x6000, 0x00);
    assert_eq!(gb.bus.read8(0xA000), 0x11);

    gb.bus.write8(0x0000, 0x00);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
    // Only the low nibble matters.
    gb.bus.write8(0x0000, 0x1A);
    assert_eq!(gb.bus.read8(0xA000), 0x11);
}

// --- Address decode ----------------------------------------------------------

#[test]
fn echo_ram_mirrors_wram() {
    let mut gb = idle_machine();
    gb.bus.write8(0xE010, 0x77);
    assert_eq!(gb.bus.read8(0xC010), 0x77);
    gb.bus.write8(0xC020, 0x66);
    assert_eq!(gb.bus.read8(0xE020), 0x66);
    assert_eq!(gb.bus.read8(0xFEA0), 0xFF);
    assert_eq!(gb.bus.read8(0xFF50), 0xFF);
}

#[test]
fn boot_rom_overlay_unmaps_on_ff50_write() {
    let mut boot = vec![0u8; 0x100];
    // LD A,$01 ; LDH ($50),A
    boot[..4].copy_from_slice(&[0x3E, 0x01, 0xE0, 0x50]);
    let mut rom = program_rom(&[]);
    rom[0x0000] = 0xC3;
    rom[0x0004] = 0x00; // NOP

    let config = MachineConfig::builder()
        .boot_rom(boot)
        .seed_internal_ram(false)
        .build();
    let mut gb = GameBoy::with_config(config, &rom).unwrap();
    assert_eq!(gb.registers().pc, 0x0000);
    assert_eq!(gb.registers().a, 0x00);
    assert_eq!(gb.peek(0x0000), 0x3E);
    assert_eq!(gb.bus.read8(0xFF40), 0x00);

    gb.step().unwrap();
    gb.step().unwrap();
    assert_eq!(gb.peek(0x0000), 0xC3);

    // The next fetch comes from the cartridge.
    assert_eq!(gb.step(), Ok(1));
    assert_eq!(gb.registers().pc, 0x0005);
    assert_eq!(gb.registers().a, 0x01);
}

#[test]
fn boot_rom_must_be_256_bytes() {
    let config = MachineConfig::builder().boot_rom(vec![0u8; 10]).build();
    assert!(matches!(
        GameBoy::with_config(config, &program_rom(&[])),
        Err(Error::InvalidBootRom(10))
    ));
}

// --- Timer -------------------------------------------------------------------

#[test]
fn div_write_resets_divider() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF04, 0x5A);
    assert_eq!(gb.bus.read8(0xFF04), 0x00);
    tick(&mut gb, 63);
    assert_eq!(gb.bus.read8(0xFF04), 0x00);
    tick(&mut gb, 1);
    assert_eq!(gb.bus.read8(0xFF04), 0x01);
}

/// Arm TIMA one step from overflow on the fastest rate (every 4 cycles)
/// with the counter freshly reset.
fn timer_about_to_overflow() -> GameBoy {
    let mut gb = idle_machine();
    clear_if(&mut gb);
    gb.bus.write8(0xFF06, 0x42); // TMA
    gb.bus.write8(0xFF05, 0xFF); // TIMA
    gb.bus.write8(0xFF07, 0x05); // enabled, counter bit 1
    gb.bus.write8(0xFF04, 0x00);
    gb
}

#[test]
fn tima_overflow_reads_zero_for_one_cycle_then_reloads() {
    let mut gb = timer_about_to_overflow();
    tick(&mut gb, 4);
    assert_eq!(gb.bus.read8(0xFF05), 0x00);
    assert_eq!(if_bits(&mut gb) & 0x04, 0);

    tick(&mut gb, 1);
    assert_eq!(gb.bus.read8(0xFF05), 0x42);
    assert_eq!(if_bits(&mut gb) & 0x04, 0x04);
}

#[test]
fn tima_write_during_overflow_cycle_cancels_reload() {
    let mut gb = timer_about_to_overflow();
    tick(&mut gb, 4);
    gb.bus.write8(0xFF05, 0x10);
    tick(&mut gb, 1);
    assert_eq!(gb.bus.read8(0xFF05), 0x10);
    assert_eq!(if_bits(&mut gb) & 0x04, 0);
}

#[test]
fn reload_cycle_ignores_tima_write_and_forwards_tma_write() {
    let mut gb = timer_about_to_overflow();
    tick(&mut gb, 5);
    gb.bus.write8(0xFF05, 0x10);
    assert_eq!(gb.bus.read8(0xFF05), 0x42);
    gb.bus.write8(0xFF06, 0x77);
    assert_eq!(gb.bus.read8(0xFF05), 0x77);
}

#[test]
fn disabling_timer_with_input_high_increments_tima() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF05, 0x00);
    gb.bus.write8(0xFF07, 0x05);
    gb.bus.write8(0xFF04, 0x00);
    tick(&mut gb, 2); // counter bit 1 now high
    assert_eq!(gb.bus.read8(0xFF05), 0x00);
    gb.bus.write8(0xFF07, 0x01);
    assert_eq!(gb.bus.read8(0xFF05), 0x01);
    assert_eq!(gb.bus.read8(0xFF07), 0xF9);
}

// --- PPU timing --------------------------------------------------------------

#[test]
fn ly_never_exceeds_153_and_vblank_starts_at_144() {
    let mut gb = idle_machine();
    clear_if(&mut gb);
    let mut max_ly = 0;
    for cycle in 1..=(LINE * 154 * 2) {
        gb.bus.tick_mcycle().unwrap();
        let ly = gb.bus.read8(0xFF44);
        max_ly = max_ly.max(ly);
        if cycle == LINE * 144 {
            assert_eq!(ly, 144);
            assert_eq!(gb.bus.read8(0xFF41) & 0x03, 1);
            assert_eq!(if_bits(&mut gb) & 0x01, 0x01);
            assert_eq!(gb.frame_count(), 1);
        }
    }
    assert_eq!(max_ly, 153);
    assert_eq!(gb.bus.read8(0xFF44), 0);
    assert_eq!(gb.frame_count(), 2);
}

#[test]
fn visible_line_walks_modes_2_3_0() {
    let mut gb = idle_machine();
    let mode = |gb: &mut GameBoy| gb.bus.read8(0xFF41) & 0x03;
    assert_eq!(mode(&mut gb), 2);
    tick(&mut gb, 10);
    assert_eq!(mode(&mut gb), 2);
    assert_eq!(gb.bus.read8(0x8000), 0x00);
    tick(&mut gb, 1);
    assert_eq!(mode(&mut gb), 3);
    assert_eq!(gb.bus.read8(0x8000), 0xFF);
    tick(&mut gb, 43);
    assert_eq!(mode(&mut gb), 0);
    tick(&mut gb, 60);
    assert_eq!(mode(&mut gb), 2);
    assert_eq!(gb.bus.read8(0xFF44), 1);
}

#[test]
fn lyc_stat_interrupt_fires_once_per_match() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF45, 2);
    gb.bus.write8(0xFF41, 0x40);
    clear_if(&mut gb);

    tick(&mut gb, 2 * LINE - 1);
    assert_eq!(if_bits(&mut gb) & 0x02, 0);
    tick(&mut gb, 1);
    assert_eq!(if_bits(&mut gb) & 0x02, 0x02);
    assert_eq!(gb.bus.read8(0xFF41) & 0x04, 0x04);

    clear_if(&mut gb);
    tick(&mut gb, LINE - 1);
    assert_eq!(if_bits(&mut gb) & 0x02, 0);
}

#[test]
fn stat_sources_share_one_edge_triggered_line() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF45, 2);
    gb.bus.write8(0xFF41, 0x48); // LYC and HBlank sources
    clear_if(&mut gb);

    let mut stat_irq_at = Vec::new();
    for cycle in 1..=(4 * LINE) {
        gb.bus.tick_mcycle().unwrap();
        if if_bits(&mut gb) & 0x02 != 0 {
            stat_irq_at.push(cycle);
            clear_if(&mut gb);
        }
    }
    // HBlank on lines 0, 1 and 3, LYC on line 2. HBlank on line 2 is
    // hidden because the line is already high.
    assert_eq!(stat_irq_at, vec![54, LINE + 54, 2 * LINE, 3 * LINE + 54]);
}

#[test]
fn lcd_off_parks_ppu_and_ignores_ly_writes() {
    let mut gb = idle_machine();
    tick(&mut gb, 2 * LINE + 30);
    assert_eq!(gb.bus.read8(0xFF44), 2);
    gb.bus.write8(0xFF44, 0x50);
    assert_eq!(gb.bus.read8(0xFF44), 2);

    gb.bus.write8(0xFF40, 0x11);
    assert_eq!(gb.bus.read8(0xFF44), 0);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 0);
    tick(&mut gb, 1000);
    assert_eq!(gb.bus.read8(0xFF44), 0);

    gb.bus.write8(0xFF40, 0x91);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 2);
    tick(&mut gb, LINE);
    assert_eq!(gb.bus.read8(0xFF44), 1);
}

#[test]
fn vram_and_oam_are_blocked_by_ppu_modes() {
    let mut gb = idle_machine();
    gb.bus.write8(0x8000, 0x12);
    assert_eq!(gb.bus.read8(0x8000), 0x12);
    // Mode 2: OAM blocked.
    assert_eq!(gb.bus.read8(0xFE00), 0xFF);

    tick(&mut gb, 11); // mode 3
    assert_eq!(gb.bus.read8(0x8000), 0xFF);
    gb.bus.write8(0x8000, 0x34);
    gb.bus.write8(0xFE00, 0x56);

    tick(&mut gb, 43); // mode 0
    assert_eq!(gb.bus.read8(0x8000), 0x12);
    assert_eq!(gb.bus.read8(0xFE00), 0x00);
    gb.bus.write8(0xFE00, 0x56);
    assert_eq!(gb.bus.read8(0xFE00), 0x56);

    gb.bus.write8(0xFF40, 0x00);
    gb.bus.write8(0x8000, 0x34);
    assert_eq!(gb.bus.read8(0x8000), 0x34);
}

// --- PPU rendering -----------------------------------------------------------

/// Idle machine with the LCD off so VRAM/OAM can be filled freely.
fn blank_lcd() -> GameBoy {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF40, 0x00);
    gb.bus.write8(0xFF47, 0xE4); // identity palette
    gb.bus.write8(0xFF48, 0xE4);
    gb
}

fn write_tile_row(gb: &mut GameBoy, tile_addr: u16, row: u16, lo: u8, hi: u8) {
    gb.bus.write8(tile_addr + row * 2, lo);
    gb.bus.write8(tile_addr + row * 2 + 1, hi);
}

fn set_sprite(gb: &mut GameBoy, index: u16, y: u8, x: u8, tile: u8, attrs: u8) {
    let base = 0xFE00 + index * 4;
    gb.bus.write8(base, y);
    gb.bus.write8(base + 1, x);
    gb.bus.write8(base + 2, tile);
    gb.bus.write8(base + 3, attrs);
}

/// Turn the LCD on with `lcdc` and run up to the start of VBlank.
fn render_frame(gb: &mut GameBoy, lcdc: u8) {
    gb.bus.write8(0xFF40, lcdc);
    tick(gb, LINE * 144);
}

fn row(gb: &GameBoy, y: usize) -> Vec<u8> {
    gb.frame_buffer()[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH].to_vec()
}

const STRIPES: [u8; 8] = [0, 1, 2, 3, 0, 1, 2, 3];

fn striped_bg() -> GameBoy {
    let mut gb = blank_lcd();
    // Tile 0, row 0: color indices 0,1,2,3,0,1,2,3.
    write_tile_row(&mut gb, 0x8000, 0, 0x55, 0x33);
    gb
}

#[test]
fn background_golden_row() {
    let mut gb = striped_bg();
    render_frame(&mut gb, 0x91);
    assert_eq!(gb.frame_count(), 1);

    let expected: Vec<u8> = STRIPES.iter().copied().cycle().take(SCREEN_WIDTH).collect();
    assert_eq!(row(&gb, 0), expected);
    assert!(row(&gb, 1).iter().all(|&shade| shade == 0));
    // Row 8 starts the next tile row, whose row 0 is striped again.
    assert_eq!(row(&gb, 8), expected);
}

#[test]
fn background_scroll_and_palette() {
    let mut gb = striped_bg();
    gb.bus.write8(0xFF43, 2); // SCX
    gb.bus.write8(0xFF42, 1); // SCY
    gb.bus.write8(0xFF47, 0x1B); // inverted palette
    render_frame(&mut gb, 0x91);

    // With SCY=1, screen row 7 shows BG row 8.
    assert_eq!(&row(&gb, 7)[..4], &[1, 0, 3, 2]);
    assert!(row(&gb, 0).iter().all(|&shade| shade == 3));
}

#[test]
fn signed_tile_addressing_uses_0x9000_base() {
    let mut gb = blank_lcd();
    write_tile_row(&mut gb, 0x9000, 0, 0xFF, 0x00);
    write_tile_row(&mut gb, 0x8000, 0, 0x00, 0xFF);
    render_frame(&mut gb, 0x81);
    assert!(row(&gb, 0).iter().all(|&shade| shade == 1));
}

#[test]
fn disabled_background_renders_color_zero() {
    let mut gb = striped_bg();
    gb.bus.write8(0xFF47, 0xFF);
    render_frame(&mut gb, 0x90);
    assert!(row(&gb, 0).iter().all(|&shade| shade == 0));
}

#[test]
fn window_overlays_from_wx_minus_7_with_own_line_counter() {
    let mut gb = blank_lcd();
    // Tile 1 row 0 is solid color 3; row 1 is blank.
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF);
    for offset in 0..0x400 {
        gb.bus.write8(0x9C00 + offset, 0x01);
    }
    gb.bus.write8(0xFF4A, 4); // WY
    gb.bus.write8(0xFF4B, 87); // WX: window from x=80
    gb.bus.write8(0xFF42, 3); // SCY does not move the window
    render_frame(&mut gb, 0x91 | 0x20 | 0x40);

    assert!(row(&gb, 3).iter().all(|&shade| shade == 0));
    let line4 = row(&gb, 4);
    assert!(line4[..80].iter().all(|&shade| shade == 0));
    assert!(line4[80..].iter().all(|&shade| shade == 3));
    assert!(row(&gb, 5).iter().all(|&shade| shade == 0));
}

#[test]
fn window_past_wx_166_is_not_drawn() {
    let mut gb = blank_lcd();
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF);
    for offset in 0..0x400 {
        gb.bus.write8(0x9C00 + offset, 0x01);
    }
    gb.bus.write8(0xFF4A, 0);
    gb.bus.write8(0xFF4B, 167);
    render_frame(&mut gb, 0x91 | 0x20 | 0x40);
    assert!(row(&gb, 0).iter().all(|&shade| shade == 0));
}

#[test]
fn sprite_overlays_background() {
    let mut gb = blank_lcd();
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF);
    set_sprite(&mut gb, 0, 16, 8, 1, 0x00);
    render_frame(&mut gb, 0x93);

    let line0 = row(&gb, 0);
    assert!(line0[..8].iter().all(|&shade| shade == 3));
    assert!(line0[8..].iter().all(|&shade| shade == 0));
    assert!(row(&gb, 1).iter().all(|&shade| shade == 0));
}

#[test]
fn sprite_behind_background_shows_only_over_color_zero() {
    let mut gb = striped_bg();
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF);
    set_sprite(&mut gb, 0, 16, 8, 1, 0x80);
    render_frame(&mut gb, 0x93);
    assert_eq!(&row(&gb, 0)[..8], &[3, 1, 2, 3, 3, 1, 2, 3]);
}

#[test]
fn sprite_flips_and_obp1() {
    let mut gb = blank_lcd();
    gb.bus.write8(0xFF49, 0x1B);
    // Tile 2: only row 7, column 0 is set (color 1).
    write_tile_row(&mut gb, 0x8020, 7, 0x80, 0x00);
    set_sprite(&mut gb, 0, 16, 8, 2, 0x60); // X and Y flip
    set_sprite(&mut gb, 1, 16, 16, 2, 0x70); // flips + OBP1
    render_frame(&mut gb, 0x93);

    let line0 = row(&gb, 0);
    let lit: Vec<(usize, u8)> = line0
        .iter()
        .enumerate()
        .filter(|&(_, &shade)| shade != 0)
        .map(|(x, &shade)| (x, shade))
        .collect();
    assert_eq!(lit, vec![(7, 1), (15, 2)]);
}

#[test]
fn lower_x_sprite_wins_overlap() {
    let mut gb = blank_lcd();
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF); // color 3
    write_tile_row(&mut gb, 0x8020, 0, 0xFF, 0x00); // color 1
    set_sprite(&mut gb, 0, 16, 12, 2, 0x00);
    set_sprite(&mut gb, 1, 16, 8, 1, 0x00);
    render_frame(&mut gb, 0x93);

    let line0 = row(&gb, 0);
    assert!(line0[..8].iter().all(|&shade| shade == 3));
    assert!(line0[8..12].iter().all(|&shade| shade == 1));
}

#[test]
fn only_ten_sprites_per_line() {
    let mut gb = blank_lcd();
    write_tile_row(&mut gb, 0x8010, 0, 0xFF, 0xFF);
    for i in 0..11u16 {
        set_sprite(&mut gb, i, 16, 8 + 8 * i as u8, 1, 0x00);
    }
    render_frame(&mut gb, 0x93);

    let line0 = row(&gb, 0);
    assert!(line0[..80].iter().all(|&shade| shade == 3));
    assert!(line0[80..88].iter().all(|&shade| shade == 0));
}

#[test]
fn tall_sprites_are_a_hard_error() {
    let mut gb = blank_lcd();
    gb.bus.write8(0xFF40, 0x97);
    let err = (0..LINE).find_map(|_| gb.bus.tick_mcycle().err());
    assert_eq!(err, Some(Error::UnsupportedSpriteMode));
    // The fault sticks, even after the LCD is switched off.
    assert_eq!(gb.bus.tick_mcycle(), Err(Error::UnsupportedSpriteMode));
    gb.bus.write8(0xFF40, 0x00);
    assert_eq!(gb.bus.tick_mcycle(), Err(Error::UnsupportedSpriteMode));

    // Tall mode with objects disabled renders normally.
    let mut gb = blank_lcd();
    render_frame(&mut gb, 0x95);
    assert_eq!(gb.frame_count(), 1);
}

#[test]
fn tall_sprite_error_surfaces_through_step() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF40, 0x97);
    assert_eq!(gb.step_frame(), Err(Error::UnsupportedSpriteMode));
    assert_eq!(gb.step(), Err(Error::UnsupportedSpriteMode));
}

// --- OAM DMA -----------------------------------------------------------------

fn dma_source_machine() -> GameBoy {
    let mut gb = blank_lcd();
    for i in 0..0xA0u16 {
        gb.bus.write8(0xC000 + i, (i as u8) ^ 0x5A);
    }
    gb
}

#[test]
fn dma_copies_160_bytes_one_per_cycle() {
    let mut gb = dma_source_machine();
    gb.bus.write8(0xFF46, 0xC0);
    tick(&mut gb, 1);
    assert_eq!(gb.peek(0xFE00), 0x5A);
    assert_eq!(gb.peek(0xFE01), 0x00);

    tick(&mut gb, 159);
    assert_eq!(gb.dump(0xFE00..=0xFE9F), gb.dump(0xC000..=0xC09F));
    // Transfer over: reads are normal again.
    assert_eq!(gb.bus.read8(0xC005), 0x05 ^ 0x5A);
    assert_eq!(gb.bus.read8(0xFE10), 0x10 ^ 0x5A);
}

#[test]
fn dma_bus_conflicts_on_source_bus() {
    let mut gb = dma_source_machine();
    gb.bus.write8(0x8000, 0x99);
    gb.bus.write8(0xFF80, 0x77);
    gb.bus.write8(0xFF46, 0xC0);
    tick(&mut gb, 1);

    // WRAM and cartridge space share the external bus with the source.
    assert_eq!(gb.bus.read8(0xC123), 0x5A);
    assert_eq!(gb.bus.read8(0x0150), 0x5A);
    // OAM is on neither bus: it reads what has been copied so far.
    assert_eq!(gb.bus.read8(0xFE00), 0x5A);
    assert_eq!(gb.bus.read8(0xFE50), 0x00);
    // VRAM is on a different bus; HRAM and I/O are never affected.
    assert_eq!(gb.bus.read8(0x8000), 0x99);
    assert_eq!(gb.bus.read8(0xFF80), 0x77);
    assert_eq!(gb.bus.read8(0xFF40), 0x00);

    tick(&mut gb, 1);
    assert_eq!(gb.bus.read8(0xD000), 0x01 ^ 0x5A);
}

#[test]
fn cpu_reads_first_oam_byte_right_after_starting_dma() {
    let mut gb = GameBoy::with_config(zeroed_ram(), &program_rom(&[0xC3, 0x80, 0xFF])).unwrap();
    gb.bus.write8(0xFF40, 0x00);
    gb.bus.write8(0xC000, 0xA7);
    gb.bus.write8(0xC001, 0x3C);
    gb.bus.write8(0xFE00, 0x11);
    // LD HL,$FE00 ; LD A,$C0 ; LDH ($46),A ; LD A,(HL)
    let program = [0x21, 0x00, 0xFE, 0x3E, 0xC0, 0xE0, 0x46, 0x7E];
    for (offset, &byte) in program.iter().enumerate() {
        gb.bus.write8(0xFF80 + offset as u16, byte);
    }

    for _ in 0..5 {
        gb.step().unwrap();
    }
    assert_eq!(gb.registers().pc, 0xFF88);
    assert_eq!(gb.registers().a, 0xA7);
}

#[test]
fn dma_from_vram_conflicts_on_video_bus() {
    let mut gb = blank_lcd();
    gb.bus.write8(0x8000, 0xAB);
    gb.bus.write8(0xC000, 0xCD);
    gb.bus.write8(0xFF46, 0x80);
    tick(&mut gb, 1);
    assert_eq!(gb.bus.read8(0x9F00), 0xAB);
    assert_eq!(gb.bus.read8(0xC000), 0xCD);
}

#[test]
fn dma_drops_cpu_oam_writes() {
    let mut gb = dma_source_machine();
    gb.bus.write8(0xFF46, 0xC0);
    tick(&mut gb, 1);
    gb.bus.write8(0xFE9F, 0x11);
    assert_eq!(gb.peek(0xFE9F), 0x00);
}

#[test]
fn dma_source_in_echo_range_folds_onto_wram() {
    let mut gb = dma_source_machine();
    gb.bus.write8(0xFF46, 0xE0);
    tick(&mut gb, 0xA0);
    assert_eq!(gb.dump(0xFE00..=0xFE9F), gb.dump(0xC000..=0xC09F));
}

// --- Sound, joypad, serial -------------------------------------------------

#[test]
fn nr52_power_off_clears_and_locks_sound_registers() {
    let mut gb = idle_machine();
    assert_eq!(gb.bus.read8(0xFF26), 0xF1);
    assert_eq!(gb.bus.read8(0xFF11), 0xBF);

    gb.bus.write8(0xFF24, 0x55);
    assert_eq!(gb.bus.read8(0xFF24), 0x55);

    gb.bus.write8(0xFF26, 0x00);
    assert_eq!(gb.bus.read8(0xFF24), 0x00);
    assert_eq!(gb.bus.read8(0xFF26), 0x70);
    gb.bus.write8(0xFF24, 0x33);
    assert_eq!(gb.bus.read8(0xFF24), 0x00);

    // Wave RAM stays writable.
    gb.bus.write8(0xFF30, 0xAB);
    assert_eq!(gb.bus.read8(0xFF30), 0xAB);

    gb.bus.write8(0xFF26, 0x80);
    gb.bus.write8(0xFF24, 0x33);
    assert_eq!(gb.bus.read8(0xFF24), 0x33);
}

#[test]
fn joypad_matrix_and_interrupt() {
    let mut gb = idle_machine();
    clear_if(&mut gb);
    gb.bus.write8(0xFF00, 0x20); // select d-pad
    assert_eq!(gb.bus.read8(0xFF00), 0xEF);

    gb.set_keys(0xFE & 0x7F); // Right + Start
    assert_eq!(if_bits(&mut gb) & 0x10, 0x10);
    assert_eq!(gb.bus.read8(0xFF00), 0xEE);
    gb.bus.write8(0xFF00, 0x10); // select buttons
    assert_eq!(gb.bus.read8(0xFF00), 0xD7);

    // Releasing keys does not request the interrupt.
    clear_if(&mut gb);
    gb.set_keys(0xFF);
    assert_eq!(if_bits(&mut gb) & 0x10, 0);
}

#[test]
fn key_press_wakes_halt() {
    // HALT ; NOP
    let mut gb = GameBoy::with_config(zeroed_ram(), &program_rom(&[0x76, 0x00])).unwrap();
    gb.bus.write8(0xFFFF, 0x10);
    gb.step().unwrap();
    assert_eq!(gb.cpu_status(), CpuStatus::Halt);
    gb.step().unwrap();
    assert_eq!(gb.cpu_status(), CpuStatus::Halt);

    gb.set_keys(0xEF);
    gb.step().unwrap();
    assert_eq!(gb.cpu_status(), CpuStatus::Okay);
    gb.step().unwrap();
    assert_eq!(gb.registers().pc, 0x0102);
}

#[test]
fn serial_transfer_is_captured() {
    let program = [
        0x3E, b'H', // LD A,'H'
        0xE0, 0x01, // LDH ($01),A
        0x3E, 0x81, // LD A,$81
        0xE0, 0x02, // LDH ($02),A
        0x18, 0xFE, // JR -2
    ];
    let mut gb = GameBoy::with_config(zeroed_ram(), &program_rom(&program)).unwrap();
    clear_if(&mut gb);
    gb.run_mcycles(40).unwrap();
    assert_eq!(gb.serial_output(), b"H");
    assert_eq!(gb.bus.read8(0xFF01), 0xFF);
    assert_eq!(gb.bus.read8(0xFF02), 0x7F);
    assert_eq!(if_bits(&mut gb) & 0x08, 0x08);
}

// --- Whole machine -----------------------------------------------------------

#[test]
fn vblank_interrupt_runs_handler() {
    let program = [
        0xAF, // XOR A
        0xE0, 0x0F, // LDH ($0F),A
        0x3C, // INC A
        0xE0, 0xFF, // LDH ($FF),A
        0xFB, // EI
        0x18, 0xFE, // JR -2
    ];
    let mut rom = program_rom(&program);
    // LD A,$42 ; LDH ($80),A ; JR -2
    rom[0x40..0x46].copy_from_slice(&[0x3E, 0x42, 0xE0, 0x80, 0x18, 0xFE]);
    let mut gb = GameBoy::with_config(zeroed_ram(), &rom).unwrap();

    gb.step_frame().unwrap();
    assert_eq!(gb.peek(0xFF80), 0x00);
    gb.step_frame().unwrap();
    assert_eq!(gb.peek(0xFF80), 0x42);
    assert_eq!(gb.registers().sp, 0xFFFC);
    assert_eq!(gb.registers().pc, 0x0044);
    assert_eq!(gb.frame_count(), 2);
}

#[test]
fn step_frame_with_lcd_off_runs_one_frame_of_cycles() {
    let mut gb = idle_machine();
    gb.bus.write8(0xFF40, 0x00);
    let elapsed = gb.step_frame().unwrap();
    assert!(elapsed >= u64::from(super::MCYCLES_PER_FRAME));
    assert!(elapsed < u64::from(super::MCYCLES_PER_FRAME) + 4);
    assert_eq!(gb.frame_count(), 0);
}

#[test]
fn run_mcycles_tracks_total_cycles() {
    let mut gb = idle_machine();
    let ran = gb.run_mcycles(1000).unwrap();
    assert!(ran >= 1000);
    assert_eq!(gb.cycles(), ran);
}

#[test]
fn invalid_opcode_hangs_machine() {
    let mut gb = GameBoy::with_config(zeroed_ram(), &program_rom(&[0x00, 0xD3])).unwrap();
    gb.step().unwrap();
    let err = Error::InvalidOpcode {
        opcode: 0xD3,
        pc: 0x0101,
    };
    assert_eq!(gb.step(), Err(err.clone()));
    assert_eq!(gb.cpu_status(), CpuStatus::Hung);
    let cycles = gb.cycles();
    assert_eq!(gb.step_frame(), Err(err));
    assert_eq!(gb.cycles(), cycles);
}
