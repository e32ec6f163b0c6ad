use typed_builder::TypedBuilder;

/// Power-on configuration for a [`GameBoy`](crate::GameBoy).
///
/// ```
/// use dmgboy_core::MachineConfig;
///
/// let config = MachineConfig::builder().seed_internal_ram(false).build();
/// assert!(config.boot_rom.is_none());
/// ```
#[derive(Clone, Debug, TypedBuilder)]
pub struct MachineConfig {
    /// Optional 256-byte boot ROM. When present the machine starts at
    /// PC=0x0000 with the boot ROM mapped over the cartridge header area;
    /// otherwise it starts from the documented post-boot register state.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,

    /// Fill WRAM/HRAM with a fixed-seed pseudo-random pattern at power-on.
    /// When false both regions start zeroed.
    #[builder(default = true)]
    pub seed_internal_ram: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
