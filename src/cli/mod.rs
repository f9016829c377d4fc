mod args;

pub use args::{CliArgs, Command, LoopMode, PackArgs, PreloadVersion};
