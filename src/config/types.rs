use serde::{Deserialize, Serialize};

/// Packer configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input frames or glob patterns, in animation order
    pub input: Vec<String>,
    /// Atlas image path; defaults to atl_<first input> beside the first input
    pub output: Option<String>,
    /// Preload format: "int" or "float"
    pub preload: String,
    /// Total animation frames, 0 for one per input
    pub frames: usize,
    /// Tail policy: "cycle", "reverse" or "last"
    #[serde(rename = "loop")]
    pub loop_mode: String,
    /// Transparent pixels between frames
    pub padding: u32,
    /// Semi-transparent bleed around 32-bit frames
    #[serde(alias = "color_padding")]
    pub colour_padding: u32,
    /// Power-of-two canvas sizes
    pub power_of_two: bool,
    /// 8-bit greyscale atlas from the red channel
    #[serde(alias = "grayscale")]
    pub greyscale: bool,
    /// Only zero alpha counts as empty when trimming
    pub alpha_trim: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output: None,
            preload: "float".to_string(),
            frames: 0,
            loop_mode: "last".to_string(),
            padding: 0,
            colour_padding: 2,
            power_of_two: true,
            greyscale: false,
            alpha_trim: true,
        }
    }
}
