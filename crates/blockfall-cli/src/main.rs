mod command;
mod skin;
mod store;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
