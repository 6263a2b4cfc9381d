#[derive(Debug, Clone, Copy)]
pub struct SketchConfig {
    pub width: u32,
    pub depth: u32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            width: 2048,
            depth: 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdmissionConfig {
    pub enable: bool,
    pub sketch: SketchConfig,
    /// Accesses recorded before the sketch window is cleared.
    pub sample_window: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        AdmissionConfig {
            enable: true,
            sketch: SketchConfig::default(),
            sample_window: 100_000,
        }
    }
}
