mod app;
mod cli;

use app::BlockfallApp;
use cli::Opt;

use log::error;
use rand::rngs::OsRng;
use rand::Rng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::process;
use structopt::StructOpt;
use structopt_flags::LogLevel;

fn main() {
    let opt: Opt = Opt::from_args();

    if let Some(shell) = opt.completions {
        Opt::clap().gen_completions_to("blockfall", shell, &mut std::io::stdout());
        return;
    }

    if let Err(e) = TermLogger::init(
        opt.verbose.get_level_filter(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = match opt.to_app_config(OsRng.gen()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = BlockfallApp::new(config).run() {
        error!("{}", e);
        process::exit(1);
    }
}
