use blockfall::{GameConfig, PieceCatalog, Style, TickMode};
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_catalog(s: &str) -> Result<PieceCatalog, String> {
    PieceCatalog::load(PathBuf::from(s)).map_err(|e| e.to_string())
}

#[derive(Debug)]
pub enum SheetSource {
    /// `<dir>/<style>.png` files
    Directory(PathBuf),
    /// Generated flat-colored sheets with the given tile size
    Palette(u32),
}

#[derive(Debug)]
pub struct RendererConfig {
    pub style: Style,
    pub cell_size: u32,
    pub margin: u32,
    pub output_path: Option<PathBuf>,
    pub debug: bool,
}

#[derive(Debug)]
pub struct AppConfig {
    pub sheets: SheetSource,
    pub catalog: PieceCatalog,
    pub game: GameConfig,
    pub ticks: u64,
    pub renderer: RendererConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Block Fall",
    about = "Run the falling-block core headless and render the board"
)]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(parse(from_os_str), help = "Output image")]
    output: Option<PathBuf>,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "style1",
        help = "Tile style: style1, style2 or style3"
    )]
    style: Style,

    #[structopt(
        parse(from_os_str),
        short,
        long,
        help = "Directory holding <style>.png sheets; generated sheets are used if omitted"
    )]
    assets: Option<PathBuf>,

    #[structopt(long, default_value = "32", help = "Tile size of generated sheets")]
    tile_size: u32,

    #[structopt(short, long, default_value = "32", help = "Rendered cell size in pixels")]
    cell_size: u32,

    #[structopt(long, default_value = "0", help = "Border around the playfield in pixels")]
    margin: u32,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "falling",
        help = "Tick behavior: falling or pattern"
    )]
    mode: TickMode,

    #[structopt(short, long, default_value = "500", help = "Number of ticks to run")]
    ticks: u64,

    #[structopt(parse(try_from_str), long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(
        parse(try_from_str = load_catalog),
        long,
        conflicts_with = "minimal",
        help = "JSON piece catalog"
    )]
    catalog: Option<PieceCatalog>,

    #[structopt(long, help = "Use the single-orientation piece set")]
    minimal: bool,

    #[structopt(long, help = "Log board stats every tick")]
    debug: bool,

    #[structopt(long, possible_values = &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self, fallback_seed: u64) -> Result<AppConfig, &'static str> {
        if self.cell_size == 0 {
            Err("Cell size must be positive")?
        }

        let catalog = match (self.catalog, self.minimal) {
            (Some(catalog), _) => catalog,
            (None, true) => PieceCatalog::minimal(),
            (None, false) => PieceCatalog::standard(),
        };

        let sheets = match self.assets {
            Some(dir) => SheetSource::Directory(dir),
            None => SheetSource::Palette(self.tile_size),
        };

        Ok(AppConfig {
            sheets,
            catalog,
            game: GameConfig {
                mode: self.mode,
                seed: self.seed.unwrap_or(fallback_seed),
                ..GameConfig::default()
            },
            ticks: self.ticks,
            renderer: RendererConfig {
                style: self.style,
                cell_size: self.cell_size,
                margin: self.margin,
                output_path: self.output,
                debug: self.debug,
            },
        })
    }
}
