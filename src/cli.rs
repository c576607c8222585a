use camino::Utf8PathBuf as PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Measurements file to aggregate
    #[clap(value_name = "MEASUREMENTS")]
    pub file: PathBuf,

    /// Number of ranges to split the file into, one worker per range
    #[clap(short, long, env, default_value_t = 1)]
    pub parallel: usize,

    /// Write a JSON profile of the run to `FILE`
    #[clap(long, env, value_name = "FILE")]
    pub profile: Option<PathBuf>,
}
