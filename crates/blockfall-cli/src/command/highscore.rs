use std::path::PathBuf;

use crate::store::Store;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighscoreArg {
    /// File holding the high score
    #[clap(long, default_value = "highscore.txt")]
    highscore_file: PathBuf,
}

pub(crate) fn run(arg: &HighscoreArg) {
    let HighscoreArg { highscore_file } = arg;
    println!("{}", Store::read_highscore(highscore_file));
}
