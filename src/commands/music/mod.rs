/// Submodule defining the `/lyrics` command.
pub mod lyrics;
pub mod utils;
