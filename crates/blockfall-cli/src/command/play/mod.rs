use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use blockfall_engine::{PieceSeed, Randomizer};
use blockfall_tui::{Runtime, ScreenStack};

use crate::{skin::Skin, store::Store};

use self::screens::MenuScreen;

mod screens;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum RandomizerArg {
    /// Every piece is drawn independently
    #[default]
    Uniform,
    /// Each run of seven pieces contains every shape once
    Bag,
}

impl From<RandomizerArg> for Randomizer {
    fn from(arg: RandomizerArg) -> Self {
        match arg {
            RandomizerArg::Uniform => Randomizer::Uniform,
            RandomizerArg::Bag => Randomizer::Bag,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Visual theme
    #[clap(long, value_enum, default_value_t)]
    skin: Skin,
    /// File the session is saved to on quit and resumed from
    #[clap(long, default_value = "savegame.json")]
    save_file: PathBuf,
    /// File holding the high score
    #[clap(long, default_value = "highscore.txt")]
    highscore_file: PathBuf,
    /// How the next piece is chosen
    #[clap(long, value_enum, default_value_t)]
    randomizer: RandomizerArg,
    /// Ignore the save file for the first game
    #[clap(long)]
    fresh: bool,
    /// Piece sequence seed as 32 hex digits; random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
}

/// Everything a game screen needs to start a session.
#[derive(Debug, Clone)]
pub(crate) struct PlayConfig {
    skin: Skin,
    store: Store,
    randomizer: Randomizer,
    seed: Option<PieceSeed>,
}

/// Messages for the player that can only be printed once the terminal is
/// back to normal.
#[derive(Debug, Clone, Default)]
pub(crate) struct Notices(Rc<RefCell<Vec<String>>>);

impl Notices {
    pub(crate) fn push(&self, message: impl Into<String>) {
        self.0.borrow_mut().push(message.into());
    }

    pub(crate) fn take(&self) -> Vec<String> {
        self.0.take()
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        skin,
        save_file,
        highscore_file,
        randomizer,
        fresh,
        seed,
    } = arg;

    let config = PlayConfig {
        skin: *skin,
        store: Store::new(save_file.clone(), highscore_file.clone()),
        randomizer: (*randomizer).into(),
        seed: *seed,
    };
    let notices = Notices::default();

    let mut screens = ScreenStack::new(Box::new(MenuScreen::new(
        config,
        notices.clone(),
        !*fresh,
    )));
    let result = Runtime::new()
        .run(&mut screens)
        .context("Terminal session failed");

    for notice in notices.take() {
        eprintln!("{notice}");
    }
    result
}
